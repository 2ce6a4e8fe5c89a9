//! Collaborators threaded through every algorithm level.

use crate::diagnostics::{Diagnostic, DiagnosticSink, Site};
use crate::error::TableError;
use crate::shared::{SharedTable, TBL_DOMAIN};

/// Divisors with a magnitude below this are treated as zero.
pub const DIVISOR_TOLERANCE: f64 = 1e-9;

/// Borrowed handle to the shared table and the diagnostics sink.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    table: &'a SharedTable,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> Context<'a> {
    /// Bundles a table handle and a sink.
    pub fn new(table: &'a SharedTable, sink: &'a dyn DiagnosticSink) -> Self {
        Self { table, sink }
    }

    /// `Tbl(x)`.
    ///
    /// # Errors
    ///
    /// See [`SharedTable::tbl`].
    pub fn tbl(&self, x: f64) -> Result<f64, TableError> {
        self.table.tbl(x)
    }

    /// Sends a diagnostic to the sink.
    pub fn report(&self, diagnostic: Diagnostic) {
        self.sink.record(&diagnostic);
    }

    /// Reports a near-zero divisor at `site` and returns the substitute value.
    pub(crate) fn recover_divide_by_zero(&self, site: Site, x: f64, y: f64, z: f64) -> f64 {
        let substitute = divide_by_zero_substitute(x, y, z);
        self.report(Diagnostic::DivideByZero { site, substitute });
        substitute
    }
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

/// Value substituted for a kernel whose divisor vanished.
///
/// `floor(y + z)` when x is zero, otherwise `x + 1`.
pub fn divide_by_zero_substitute(x: f64, y: f64, z: f64) -> f64 {
    if x.abs() < DIVISOR_TOLERANCE {
        (y + z).floor()
    } else {
        x + 1.0
    }
}

/// True when `x` lies in `[-10, 10)`, the entry domain of both table-backed algorithms.
pub fn in_domain(x: f64) -> bool {
    TBL_DOMAIN.contains(&x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitute_depends_on_x_only_for_branch_choice() {
        assert_eq!(divide_by_zero_substitute(0.0, 2.5, 4.0), 6.0);
        assert_eq!(divide_by_zero_substitute(1e-12, -0.5, 0.0), -1.0);
        assert_eq!(divide_by_zero_substitute(1.0, 0.5, 0.0), 2.0);
        assert_eq!(divide_by_zero_substitute(-3.5, 100.0, 100.0), -2.5);
    }

    #[test]
    fn domain_is_half_open() {
        assert!(in_domain(-10.0));
        assert!(in_domain(9.999));
        assert!(!in_domain(10.0));
        assert!(!in_domain(-10.5));
        assert!(!in_domain(f64::NAN));
    }
}
