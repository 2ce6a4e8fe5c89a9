//! Piecewise-linear lookup table over `(x, y)` samples.
//!
//! # Source format
//!
//! ```text
//! -10 23.5
//! -5  12.4
//! 0   10.1
//! ```
//!
//! Whitespace-separated floats, read pairwise until the text is exhausted.
//! Reading stops early at the first token that is not a float, and an
//! unpaired trailing value is dropped. No header, no delimiter beyond
//! whitespace.
//!
//! # Query order
//!
//! 1. Exact match (within [`EXACT_MATCH_TOLERANCE`]) returns the stored `y`.
//! 2. An empty table fails with [`TableError::Empty`].
//! 3. A query outside `[min x, max x]` fails with [`TableError::Range`].
//! 4. Otherwise the two bracketing samples are interpolated linearly.
//!
//! # Example
//!
//! ```
//! use fun_cascade::table::{LookupTable, TableSource};
//!
//! let source = TableSource::inline("-10 23.5\n-5 12.4\n0 10.1\n5 6.87\n10 1.21");
//! let table = LookupTable::load(&source)?;
//! assert_eq!(table.query(0.0)?, 10.1);
//! assert!((table.query(2.5)? - 8.485).abs() < 1e-12);
//! # Ok::<(), fun_cascade::TableError>(())
//! ```

use std::fmt;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::TableError;

/// Two x-values closer than this are treated as the same sample point.
pub const EXACT_MATCH_TOLERANCE: f64 = 1e-9;

/// One immutable `(x, y)` sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// Abscissa.
    pub x: f64,
    /// Ordinate.
    pub y: f64,
}

impl Sample {
    /// Creates a sample.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Where table data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    /// A text file on disk.
    File(PathBuf),
    /// Text held in memory.
    Inline(String),
}

impl TableSource {
    /// Source backed by a file path.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        TableSource::File(path.into())
    }

    /// Source backed by in-memory text.
    pub fn inline(text: impl Into<String>) -> Self {
        TableSource::Inline(text.into())
    }

    /// Reads the whole source as text.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Load`] if the file cannot be opened or read.
    pub fn read(&self) -> Result<String, TableError> {
        match self {
            TableSource::File(path) => {
                fs::read_to_string(path).map_err(|source| TableError::Load {
                    name: path.display().to_string(),
                    source,
                })
            }
            TableSource::Inline(text) => Ok(text.clone()),
        }
    }
}

impl fmt::Display for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableSource::File(path) => write!(f, "{}", path.display()),
            TableSource::Inline(_) => write!(f, "<inline>"),
        }
    }
}

/// Parses whitespace-separated pairs, stopping at the first bad token.
///
/// Returns the samples read and the token that stopped reading, if any.
pub fn parse_samples(text: &str) -> (Vec<Sample>, Option<String>) {
    let mut samples = Vec::new();
    let mut tokens = text.split_whitespace();

    loop {
        let Some(first) = tokens.next() else {
            return (samples, None);
        };
        let Ok(x) = first.parse::<f64>() else {
            return (samples, Some(first.to_string()));
        };
        let Some(second) = tokens.next() else {
            return (samples, None);
        };
        let Ok(y) = second.parse::<f64>() else {
            return (samples, Some(second.to_string()));
        };
        samples.push(Sample::new(x, y));
    }
}

/// `(x, y)` samples, expected ascending in x, answering point and interpolated queries.
///
/// The table is never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    samples: Vec<Sample>,
    bounds: Option<(f64, f64)>,
}

impl LookupTable {
    /// Builds a table from samples as given. Ordering is not changed.
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        let bounds = samples.iter().fold(None, |acc: Option<(f64, f64)>, s| {
            Some(match acc {
                Some((lo, hi)) => (lo.min(s.x), hi.max(s.x)),
                None => (s.x, s.x),
            })
        });
        Self { samples, bounds }
    }

    /// Loads a table from `source`.
    ///
    /// Neither emptiness nor ordering is rejected here; both surface at
    /// query time. A non-ascending table is reported as a warning.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Load`] if the source cannot be opened or read.
    pub fn load(source: &TableSource) -> Result<Self, TableError> {
        let text = source.read()?;
        let (samples, stopped_at) = parse_samples(&text);

        if let Some(token) = stopped_at {
            warn!(%source, %token, read = samples.len(), "table read stopped at non-numeric token");
        }

        let table = Self::from_samples(samples);
        if !table.is_ascending() {
            warn!(%source, "table x-values are not strictly ascending");
        }
        debug!(%source, samples = table.len(), "lookup table loaded");
        Ok(table)
    }

    /// All samples in load order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no sample was loaded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Smallest and largest stored x, or `None` for an empty table.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.bounds
    }

    /// True when x-values are strictly increasing.
    pub fn is_ascending(&self) -> bool {
        self.samples.windows(2).all(|w| w[0].x < w[1].x)
    }

    /// Looks up `x`, interpolating between bracketing samples.
    ///
    /// # Errors
    ///
    /// - [`TableError::Empty`] if the table holds no samples.
    /// - [`TableError::Range`] if `x` lies outside `[min x, max x]`.
    /// - [`TableError::Unsorted`] if no adjacent pair brackets `x`.
    pub fn query(&self, x: f64) -> Result<f64, TableError> {
        if let Some(hit) = self
            .samples
            .iter()
            .find(|s| (s.x - x).abs() < EXACT_MATCH_TOLERANCE)
        {
            return Ok(hit.y);
        }

        let (lo, hi) = self.bounds.ok_or(TableError::Empty)?;
        if x < lo || x > hi {
            return Err(TableError::Range(x));
        }

        self.samples
            .windows(2)
            .find(|w| w[0].x <= x && x <= w[1].x)
            .map(|w| {
                let (a, b) = (w[0], w[1]);
                a.y + (b.y - a.y) * (x - a.x) / (b.x - a.x)
            })
            .ok_or(TableError::Unsorted(x))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn table() -> LookupTable {
        LookupTable::from_samples(vec![
            Sample::new(-10.0, 23.5),
            Sample::new(-5.0, 12.4),
            Sample::new(0.0, 10.1),
            Sample::new(5.0, 6.87),
            Sample::new(10.0, 1.21),
        ])
    }

    #[test]
    fn parse_stops_at_bad_token() {
        let (samples, stop) = parse_samples("1 2\n3 4\nfive 6\n7 8");
        assert_eq!(samples, vec![Sample::new(1.0, 2.0), Sample::new(3.0, 4.0)]);
        assert_eq!(stop.as_deref(), Some("five"));
    }

    #[test]
    fn parse_drops_unpaired_value() {
        let (samples, stop) = parse_samples("1 2 3");
        assert_eq!(samples, vec![Sample::new(1.0, 2.0)]);
        assert!(stop.is_none());
    }

    #[test]
    fn exact_match_wins_before_interpolation() {
        let t = table();
        assert_eq!(t.query(-5.0).unwrap(), 12.4);
        assert_eq!(t.query(5.0 + 1e-10).unwrap(), 6.87);
    }

    #[test]
    fn endpoints_are_inside_the_span() {
        let t = table();
        assert_eq!(t.query(-10.0).unwrap(), 23.5);
        assert_eq!(t.query(10.0).unwrap(), 1.21);
    }

    #[test]
    fn outside_span_is_a_range_violation() {
        let t = table();
        assert!(matches!(t.query(10.5), Err(TableError::Range(x)) if x == 10.5));
        assert!(matches!(t.query(-11.0), Err(TableError::Range(_))));
    }

    #[test]
    fn empty_table_fails_with_empty() {
        let t = LookupTable::from_samples(Vec::new());
        assert!(t.bounds().is_none());
        assert!(matches!(t.query(0.0), Err(TableError::Empty)));
    }

    #[test]
    fn unsorted_table_reports_missing_bracket() {
        let t = LookupTable::from_samples(vec![
            Sample::new(10.0, 1.0),
            Sample::new(0.0, 0.0),
            Sample::new(4.0, 0.0),
        ]);
        assert!(!t.is_ascending());
        assert_eq!(t.bounds(), Some((0.0, 10.0)));
        assert!((t.query(2.0).unwrap() - 0.0).abs() < 1e-12);
        assert!(matches!(t.query(7.0), Err(TableError::Unsorted(x)) if x == 7.0));
    }

    #[test]
    fn missing_file_is_a_load_failure() {
        let source = TableSource::file("/nonexistent/fun-cascade/table.dat");
        let err = LookupTable::load(&source).unwrap_err();
        assert!(err.is_load());
    }
}
