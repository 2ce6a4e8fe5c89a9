//! Property-based tests for the cascade.
//!
//! Uses proptest to check that the controller is total and that local
//! recoveries never surface as failures.

#![allow(clippy::unwrap_used)]

use fun_cascade::algorithm1::krl;
use fun_cascade::algorithm2::kr12;
use fun_cascade::{
    compute_fun, Algorithm, Context, LookupTable, Recorder, SharedTable, Site, TableSource,
};
use proptest::prelude::*;

const SAMPLE_DATA: &str = "-10 23.5\n-5 12.4\n0 10.1\n5 6.87\n10 1.21";

fn shared() -> SharedTable {
    SharedTable::new(TableSource::inline(SAMPLE_DATA))
}

// =============================================================================
// Totality
// =============================================================================

proptest! {
    /// compute_fun returns a finite value for inputs in `[-100, 100)`.
    ///
    /// Not a guarantee for arbitrary finite inputs: products such as
    /// `x·y·z` in Algorithm 2 overflow near `1e200`, and so does Algorithm 3.
    #[test]
    fn prop_compute_fun_is_finite(
        x in -100.0f64..100.0,
        y in -100.0f64..100.0,
        z in -100.0f64..100.0,
    ) {
        let table = shared();
        let recorder = Recorder::new();
        let eval = compute_fun(&Context::new(&table, &recorder), x, y, z);
        prop_assert!(eval.value.is_finite(), "fun({}, {}, {}) = {}", x, y, z, eval.value);
    }

    /// Without a table, every input still ends in Algorithm 3 or in
    /// Algorithm 2's local answers, never in a failure, and always passes
    /// through Algorithm 2.
    #[test]
    fn prop_missing_table_is_total(
        x in -20.0f64..20.0,
        y in -20.0f64..20.0,
        z in -20.0f64..20.0,
    ) {
        let table = SharedTable::new(TableSource::file("/nonexistent/fun-cascade.dat"));
        let recorder = Recorder::new();
        let eval = compute_fun(&Context::new(&table, &recorder), x, y, z);
        prop_assert!(eval.value.is_finite());
        prop_assert!(eval.algorithm != Algorithm::First);
        // Every request from Algorithm 1 is handed to Algorithm 2.
        prop_assert_eq!(eval.transitions[0].to, Algorithm::Second);
    }

    /// Transitions only move forward and end at the reporting algorithm.
    #[test]
    fn prop_transitions_are_monotone(
        x in -15.0f64..15.0,
        y in -15.0f64..15.0,
        z in -15.0f64..15.0,
    ) {
        let table = shared();
        let recorder = Recorder::new();
        let eval = compute_fun(&Context::new(&table, &recorder), x, y, z);

        let mut current = Algorithm::First;
        for t in &eval.transitions {
            prop_assert_eq!(t.from, current);
            prop_assert!(t.to > t.from);
            current = t.to;
        }
        prop_assert_eq!(current, eval.algorithm);
    }
}

// =============================================================================
// Local recovery
// =============================================================================

proptest! {
    /// A vanishing divisor in Krl yields the substitute, never an error.
    #[test]
    fn prop_krl_zero_divisor_is_recovered(x in 1e-3f64..9.0, y in -9.0f64..1.0) {
        let table = shared();
        let recorder = Recorder::new();
        let ctx = Context::new(&table, &recorder);

        // x > 0 and y <= 1 selects the branch dividing by z.
        prop_assert_eq!(krl(&ctx, x, y, 0.0).unwrap(), x + 1.0);
        prop_assert_eq!(recorder.divide_by_zero_count(Site::Krl), 1);
    }

    /// Kr12 with x == 0 and y > 1 matches no branch and recovers.
    #[test]
    fn prop_kr12_unmatched_is_recovered(y in 1.001f64..9.0, z in -9.0f64..9.0) {
        let table = shared();
        let recorder = Recorder::new();
        let ctx = Context::new(&table, &recorder);

        prop_assert_eq!(kr12(&ctx, 0.0, y, z).unwrap(), (y + z).floor());
        prop_assert_eq!(recorder.divide_by_zero_count(Site::Kr12), 1);
    }
}

// =============================================================================
// Table
// =============================================================================

proptest! {
    /// Queries inside the sampled span stay between the bracketing ordinates.
    #[test]
    fn prop_query_is_bracketed(x in -10.0f64..=10.0) {
        let table = LookupTable::load(&TableSource::inline(SAMPLE_DATA)).unwrap();
        let y = table.query(x).unwrap();

        let pair = table
            .samples()
            .windows(2)
            .find(|w| w[0].x <= x && x <= w[1].x)
            .unwrap();
        let (lo, hi) = if pair[0].y <= pair[1].y {
            (pair[0].y, pair[1].y)
        } else {
            (pair[1].y, pair[0].y)
        };
        prop_assert!(y >= lo - 1e-12 && y <= hi + 1e-12);
    }

    /// Queries outside the sampled span always fail with a range violation.
    #[test]
    fn prop_query_outside_span_fails(offset in 1e-6f64..1e6, above in any::<bool>()) {
        let table = LookupTable::load(&TableSource::inline(SAMPLE_DATA)).unwrap();
        let x = if above { 10.0 + offset } else { -10.0 - offset };
        prop_assert!(table.query(x).unwrap_err().is_range());
    }
}
