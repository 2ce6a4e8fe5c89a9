//! `fun-cascade` — evaluates `fun(x, y, z)` through a cascade of three
//! fallback algorithms backed by a piecewise-linear lookup table.
//!
//! # Cascade
//!
//! | Algorithm | Chain | Leaves the level when |
//! |-----------|-------|-----------------------|
//! | 1 | `algorithm1 → Grl → Nrl → Krl → Tbl` | x out of domain, `floor(x+y) == floor(z)`, range or load failure (always to 2) |
//! | 2 | `algorithm2 → Gr12 → Nr12 → Kr12 → Tbl` | load failure (or an unclassified fault) |
//! | 3 | closed form | never |
//!
//! Divide-by-zero is always absorbed where it happens and reported through a
//! [`DiagnosticSink`]. Range and load failures are translated into escalation
//! requests as they cross an algorithm's outer boundary. Only the controller
//! turns failures into a final answer, and Algorithm 3 guarantees there is one.
//!
//! # Entry Point
//!
//! ```
//! use fun_cascade::{Algorithm, Cascade, Recorder, TableSource};
//!
//! let data = "-10 23.5\n-5 12.4\n0 10.1\n5 6.87\n10 1.21";
//! let cascade = Cascade::new(TableSource::inline(data), Recorder::new());
//!
//! let eval = cascade.compute(1.0, 1.0, 1.0);
//! assert_eq!(eval.algorithm, Algorithm::First);
//! assert!(eval.transitions.is_empty());
//! assert!((eval.value - 14.1).abs() < 1e-9);
//! ```
//!
//! The table is loaded once, on first use, and shared read-only by every
//! level through [`SharedTable`]. Pass a [`Context`] to call individual
//! levels directly.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod algorithm1;
pub mod algorithm2;
pub mod algorithm3;
pub mod context;
pub mod controller;
pub mod diagnostics;
pub mod error;
pub mod shared;
pub mod table;

pub use context::Context;
pub use controller::{compute_fun, Cascade, Cause, Evaluation, Transition};
pub use diagnostics::{Diagnostic, DiagnosticSink, Recorder, Site, TracingSink};
pub use error::{Algorithm, LevelError, TableError};
pub use shared::SharedTable;
pub use table::{LookupTable, Sample, TableSource};
