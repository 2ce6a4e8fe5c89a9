//! The cascade controller: `computeFun`.
//!
//! # State machine
//!
//! | State | Outcome | Next |
//! |-------|---------|------|
//! | First | value | done |
//! | First | any escalation request | Second |
//! | First | fault | Third |
//! | Second | value | done |
//! | Second | request or fault | Third |
//! | Third | value | done (terminal) |
//!
//! Every transition is reported to the sink and kept in the returned
//! [`Evaluation`]; neither affects the computed value.

use std::fmt;

use crate::algorithm1::algorithm1;
use crate::algorithm2::algorithm2;
use crate::algorithm3::algorithm3;
use crate::context::Context;
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::error::{Algorithm, LevelError};
use crate::shared::SharedTable;
use crate::table::TableSource;

/// Why the controller left an algorithm.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Cause {
    /// The level asked for another algorithm.
    Escalation {
        /// Algorithm the level asked for.
        requested: Algorithm,
    },
    /// The level failed in a way it did not classify.
    Fault {
        /// Rendered error.
        message: String,
    },
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Escalation { requested } => write!(f, "switch to {requested}"),
            Cause::Fault { message } => write!(f, "unexpected error: {message}"),
        }
    }
}

impl From<&LevelError> for Cause {
    fn from(err: &LevelError) -> Self {
        match err {
            LevelError::Escalate(requested) => Cause::Escalation {
                requested: *requested,
            },
            LevelError::Fault(e) => Cause::Fault {
                message: e.to_string(),
            },
        }
    }
}

/// One move of the state machine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    /// Algorithm that did not produce a value.
    pub from: Algorithm,
    /// Algorithm tried next.
    pub to: Algorithm,
    /// Why.
    pub cause: Cause,
}

/// Result of one `fun(x, y, z)` evaluation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    /// Input x.
    pub x: f64,
    /// Input y.
    pub y: f64,
    /// Input z.
    pub z: f64,
    /// Computed value.
    pub value: f64,
    /// Algorithm that produced `value`.
    pub algorithm: Algorithm,
    /// Transitions taken before `algorithm` succeeded, in order.
    pub transitions: Vec<Transition>,
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fun({}, {}, {}) = {}", self.x, self.y, self.z, self.value)
    }
}

/// Next state after `current` failed with `err`.
///
/// Algorithm 1 always hands an escalation to Algorithm 2, whatever target it
/// named; the request is still kept in the transition's [`Cause`].
pub fn next_algorithm(current: Algorithm, err: &LevelError) -> Algorithm {
    match (current, err) {
        (Algorithm::First, LevelError::Escalate(_)) => Algorithm::Second,
        _ => Algorithm::Third,
    }
}

/// Evaluates `fun(x, y, z)`, falling back through the three algorithms.
///
/// Never fails: Algorithm 3 terminates the cascade unconditionally.
pub fn compute_fun(ctx: &Context<'_>, x: f64, y: f64, z: f64) -> Evaluation {
    let mut transitions = Vec::new();
    let mut current = Algorithm::First;

    loop {
        ctx.report(Diagnostic::Attempt { algorithm: current });
        let outcome = match current {
            Algorithm::First => algorithm1(ctx, x, y, z),
            Algorithm::Second => algorithm2(ctx, x, y, z),
            Algorithm::Third => Ok(algorithm3(x, y, z)),
        };

        match outcome {
            Ok(value) => {
                return Evaluation {
                    x,
                    y,
                    z,
                    value,
                    algorithm: current,
                    transitions,
                }
            }
            Err(err) => {
                let next = next_algorithm(current, &err);
                let cause = Cause::from(&err);
                ctx.report(Diagnostic::Transition {
                    from: current,
                    to: next,
                    reason: cause.to_string(),
                });
                transitions.push(Transition {
                    from: current,
                    to: next,
                    cause,
                });
                current = next;
            }
        }
    }
}

/// A table handle and a sink, owned together.
///
/// ```
/// use fun_cascade::{Algorithm, Cascade, Recorder, TableSource};
///
/// let data = "-10 23.5\n-5 12.4\n0 10.1\n5 6.87\n10 1.21";
/// let cascade = Cascade::new(TableSource::inline(data), Recorder::new());
///
/// let eval = cascade.compute(15.0, 2.0, 3.0);
/// assert_eq!(eval.algorithm, Algorithm::Second);
/// assert_eq!(eval.value, 1.5);
/// ```
#[derive(Debug)]
pub struct Cascade<S = TracingSink> {
    table: SharedTable,
    sink: S,
}

impl<S: DiagnosticSink> Cascade<S> {
    /// Creates a cascade; the table is loaded on first use.
    pub fn new(source: TableSource, sink: S) -> Self {
        Self {
            table: SharedTable::new(source),
            sink,
        }
    }

    /// The shared table handle.
    pub fn table(&self) -> &SharedTable {
        &self.table
    }

    /// The diagnostics sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Evaluates `fun(x, y, z)`.
    pub fn compute(&self, x: f64, y: f64, z: f64) -> Evaluation {
        compute_fun(&Context::new(&self.table, &self.sink), x, y, z)
    }
}
