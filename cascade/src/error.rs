//! Failure taxonomy for table access and for the algorithm levels.
//!
//! Two layers of error exist:
//!
//! - [`TableError`] is raised by the lookup table and by the bound-check
//!   wrapper. It never leaves an algorithm with its original meaning.
//! - [`LevelError`] is what an algorithm level hands to the cascade
//!   controller: either a deliberate request to switch algorithm, or an
//!   unclassified fault.
//!
//! A near-zero divisor is not represented here at all. It is absorbed where
//! it occurs and reported through [`crate::diagnostics`].

use std::fmt;
use std::io;

use thiserror::Error;

/// The three algorithms of the cascade, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Algorithm {
    /// Floor-based layered computation (`Krl` → `Nrl` → `Grl`).
    First,
    /// Continuous-valued variant (`Kr12` → `Nr12` → `Gr12`).
    Second,
    /// Closed-form fallback that cannot fail.
    Third,
}

impl Algorithm {
    /// One-based index of the algorithm (1, 2 or 3).
    pub fn index(self) -> u8 {
        match self {
            Algorithm::First => 1,
            Algorithm::Second => 2,
            Algorithm::Third => 3,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Algorithm {}", self.index())
    }
}

/// Failures raised while loading or querying the lookup table.
#[derive(Debug, Error)]
pub enum TableError {
    /// The table source could not be opened or read.
    #[error("file error: {name}: {source}")]
    Load {
        /// Human-readable name of the source (usually a path).
        name: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The query lies outside the sampled span or outside the `Tbl` domain.
    #[error("value {0} out of range")]
    Range(f64),

    /// The table loaded without a single sample.
    #[error("no data loaded")]
    Empty,

    /// The query lies inside the sampled span but no adjacent pair of
    /// samples brackets it, which only happens when x-values are not ascending.
    #[error("interpolation failed at {0}: table x-values are not ascending")]
    Unsorted(f64),
}

impl TableError {
    /// Returns true for a source that could not be opened or read.
    pub fn is_load(&self) -> bool {
        matches!(self, TableError::Load { .. })
    }

    /// Returns true for a range violation.
    pub fn is_range(&self) -> bool {
        matches!(self, TableError::Range(_))
    }
}

/// Outcome of an algorithm level that did not produce a value.
#[derive(Debug, Error)]
pub enum LevelError {
    /// Deliberate abort: the controller should continue with the target.
    #[error("switch to {0}")]
    Escalate(Algorithm),

    /// Anything the level did not classify. The controller falls back to
    /// [`Algorithm::Third`].
    #[error(transparent)]
    Fault(#[from] TableError),
}

impl LevelError {
    /// Target algorithm of an escalation request, if this is one.
    pub fn target(&self) -> Option<Algorithm> {
        match self {
            LevelError::Escalate(target) => Some(*target),
            LevelError::Fault(_) => None,
        }
    }
}
