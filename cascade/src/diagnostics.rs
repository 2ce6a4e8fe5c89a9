//! Warning-then-continue reporting.
//!
//! Local recoveries (a near-zero divisor, a degenerate norm, an out-of-domain
//! entry into Algorithm 2) and every cascade transition produce a
//! [`Diagnostic`]. Levels hand them to an injected [`DiagnosticSink`]; nothing
//! in the computation reads them back, so they never affect values.

use std::cell::RefCell;
use std::fmt;

use tracing::{info, warn};

use crate::error::Algorithm;

/// Function that absorbed a near-zero divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Site {
    /// Floor-based kernel of Algorithm 1.
    Krl,
    /// Continuous kernel of Algorithm 2.
    Kr12,
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Site::Krl => write!(f, "Krl"),
            Site::Kr12 => write!(f, "Kr12"),
        }
    }
}

/// One observable event during an evaluation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Diagnostic {
    /// The controller is about to run an algorithm.
    Attempt {
        /// Algorithm being tried.
        algorithm: Algorithm,
    },
    /// A divisor below tolerance was replaced by a substitute result.
    DivideByZero {
        /// Where it happened.
        site: Site,
        /// Value returned instead.
        substitute: f64,
    },
    /// `Nr12` saw a zero-length vector and returned its sentinel.
    DegenerateNorm {
        /// Sentinel returned.
        substitute: f64,
    },
    /// Algorithm 2 was entered with x outside its domain.
    DomainFallback {
        /// Offending x.
        x: f64,
        /// `|x| / 10`.
        substitute: f64,
    },
    /// The controller moved to another algorithm.
    Transition {
        /// Algorithm that did not produce a value.
        from: Algorithm,
        /// Algorithm tried next.
        to: Algorithm,
        /// Why the level stopped.
        reason: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Attempt { algorithm } => write!(f, "trying {algorithm}"),
            Diagnostic::DivideByZero { site, substitute } => write!(
                f,
                "division by zero in {site}, using alternative value {substitute}"
            ),
            Diagnostic::DegenerateNorm { substitute } => {
                write!(f, "division by zero in Nr12, using {substitute}")
            }
            Diagnostic::DomainFallback { x, substitute } => {
                write!(f, "x = {x} out of range, using |x|/10 = {substitute}")
            }
            Diagnostic::Transition { from, to, reason } => {
                write!(f, "{from} -> {to}: {reason}")
            }
        }
    }
}

/// Receives diagnostics from the algorithm levels.
pub trait DiagnosticSink {
    /// Records one diagnostic.
    fn record(&self, diagnostic: &Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn record(&self, diagnostic: &Diagnostic) {
        (**self).record(diagnostic);
    }
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::Attempt { algorithm } => {
                info!(algorithm = algorithm.index(), "{diagnostic}");
            }
            Diagnostic::Transition { from, to, .. } => {
                info!(from = from.index(), to = to.index(), "{diagnostic}");
            }
            Diagnostic::DivideByZero { site, substitute } => {
                warn!(%site, substitute, "{diagnostic}");
            }
            Diagnostic::DegenerateNorm { substitute } => {
                warn!(substitute, "{diagnostic}");
            }
            Diagnostic::DomainFallback { x, substitute } => {
                warn!(x, substitute, "{diagnostic}");
            }
        }
    }
}

/// Collects diagnostics in memory, in arrival order.
#[derive(Debug, Default)]
pub struct Recorder {
    events: RefCell<Vec<Diagnostic>>,
}

impl Recorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.borrow().clone()
    }

    /// Drains everything recorded so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Number of divide-by-zero recoveries recorded at `site`.
    pub fn divide_by_zero_count(&self, site: Site) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|d| matches!(d, Diagnostic::DivideByZero { site: s, .. } if *s == site))
            .count()
    }
}

impl DiagnosticSink for Recorder {
    fn record(&self, diagnostic: &Diagnostic) {
        self.events.borrow_mut().push(diagnostic.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_keeps_order_and_drains() {
        let recorder = Recorder::new();
        recorder.record(&Diagnostic::Attempt {
            algorithm: Algorithm::First,
        });
        recorder.record(&Diagnostic::DivideByZero {
            site: Site::Krl,
            substitute: 2.0,
        });
        assert_eq!(recorder.divide_by_zero_count(Site::Krl), 1);
        assert_eq!(recorder.divide_by_zero_count(Site::Kr12), 0);

        let drained = recorder.take();
        assert_eq!(drained.len(), 2);
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn transition_message_names_both_algorithms() {
        let d = Diagnostic::Transition {
            from: Algorithm::First,
            to: Algorithm::Second,
            reason: "switch to Algorithm 2".to_string(),
        };
        assert_eq!(d.to_string(), "Algorithm 1 -> Algorithm 2: switch to Algorithm 2");
    }
}
