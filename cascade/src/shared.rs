//! The process-wide table handle and the `Tbl` bound-check wrapper.
//!
//! A [`SharedTable`] is created once from a [`TableSource`] and handed by
//! reference to every algorithm level. The first query loads the table; later
//! queries reuse it. A failed load is not remembered, so the next query tries
//! the source again.

use std::ops::Range;

use once_cell::sync::OnceCell;
use tracing::info;

use crate::error::TableError;
use crate::table::{LookupTable, TableSource};

/// Domain accepted by [`SharedTable::tbl`], independent of the table span.
pub const TBL_DOMAIN: Range<f64> = -10.0..10.0;

/// Lazily loaded, read-only lookup table shared by all algorithm levels.
#[derive(Debug)]
pub struct SharedTable {
    source: TableSource,
    table: OnceCell<LookupTable>,
}

impl SharedTable {
    /// Creates a handle; nothing is read until the first query.
    pub fn new(source: TableSource) -> Self {
        Self {
            source,
            table: OnceCell::new(),
        }
    }

    /// True once the table has been loaded successfully.
    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    /// Returns the table, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Load`] if the source cannot be opened or read.
    pub fn table(&self) -> Result<&LookupTable, TableError> {
        self.table.get_or_try_init(|| {
            let table = LookupTable::load(&self.source)?;
            info!(source = %self.source, samples = table.len(), "table initialised");
            Ok(table)
        })
    }

    /// `Tbl(x)`: rejects `x` outside [`TBL_DOMAIN`], then queries the table.
    ///
    /// The domain check runs before the table is touched, so an out-of-domain
    /// query never triggers a load.
    ///
    /// # Errors
    ///
    /// - [`TableError::Range`] for `x` outside `[-10, 10)` (including NaN) or
    ///   outside the sampled span.
    /// - [`TableError::Load`] if the table cannot be loaded.
    /// - [`TableError::Empty`] / [`TableError::Unsorted`] from the query.
    pub fn tbl(&self, x: f64) -> Result<f64, TableError> {
        if !TBL_DOMAIN.contains(&x) {
            return Err(TableError::Range(x));
        }
        self.table()?.query(x)
    }
}
