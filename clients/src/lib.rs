//! Driver support for the `fun-cascade` binary.
//!
//! Everything here sits at the process edge: seeding the sample table on
//! disk, reading whitespace-separated triples from a stream, rendering
//! evaluations, and installing the tracing subscriber.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::collections::VecDeque;
use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context as _, Result};
use fun_cascade::{Diagnostic, DiagnosticSink, Evaluation, Recorder, TracingSink};
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Sample table written at startup unless the caller supplies its own file.
pub const SAMPLE_TABLE: &str = "-10 23.5\n-5 12.4\n0 10.1\n5 6.87\n10 1.21";

/// Triples evaluated before interactive mode.
pub const DEMO_VECTORS: [(f64, f64, f64); 4] = [
    (0.0, 2.0, 3.0),
    (15.0, 2.0, 3.0),
    (1.0, 0.5, 0.0),
    (-20.0, 1.0, 1.0),
];

/// Value of x that ends interactive input.
pub const EXIT_SENTINEL: f64 = -1.0;

static TRACING: OnceLock<()> = OnceLock::new();

/// Installs a stderr fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// Calling it more than once is harmless.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);
        if let Err(err) = Registry::default().with(filter).with(fmt_layer).try_init() {
            eprintln!("failed to initialise tracing subscriber: {err}");
        }
    });
}

/// A table file written by [`seed_table`]; removed again on drop.
#[derive(Debug)]
pub struct SeededTable {
    path: PathBuf,
}

impl SeededTable {
    /// Location of the written file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SeededTable {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed seeded table"),
            Err(err) => warn!(path = %self.path.display(), %err, "could not remove seeded table"),
        }
    }
}

/// Writes [`SAMPLE_TABLE`] to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn seed_table(path: &Path) -> Result<SeededTable> {
    fs::write(path, SAMPLE_TABLE)
        .with_context(|| format!("writing sample table to {}", path.display()))?;
    debug!(path = %path.display(), "seeded sample table");
    Ok(SeededTable {
        path: path.to_path_buf(),
    })
}

/// Reads `x y z` triples from a token stream.
///
/// Input ends at end of stream, at a token that is not a float, or when x
/// equals [`EXIT_SENTINEL`]. Lines are pulled only when more tokens are
/// needed, so the reader works with an interactive terminal.
pub struct TripleReader<R> {
    input: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> TripleReader<R> {
    /// Wraps a buffered reader.
    pub fn new(input: R) -> Self {
        Self {
            input,
            pending: VecDeque::new(),
        }
    }

    fn next_token(&mut self) -> Result<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.input.read_line(&mut line).context("reading input")? == 0 {
                return Ok(None);
            }
            self.pending.extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.pending.pop_front())
    }

    fn next_number(&mut self) -> Result<Option<f64>> {
        Ok(self.next_token()?.and_then(|t| t.parse::<f64>().ok()))
    }

    /// Next triple, or `None` once input has ended.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reader fails.
    pub fn next_triple(&mut self) -> Result<Option<(f64, f64, f64)>> {
        let Some(x) = self.next_number()? else {
            return Ok(None);
        };
        if x == EXIT_SENTINEL {
            return Ok(None);
        }
        let Some(y) = self.next_number()? else {
            return Ok(None);
        };
        let Some(z) = self.next_number()? else {
            return Ok(None);
        };
        Ok(Some((x, y, z)))
    }
}

/// Sink that logs through `tracing` and also keeps a copy of each diagnostic.
#[derive(Debug, Default)]
pub struct TeeSink {
    recorder: Recorder,
}

impl TeeSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains the diagnostics kept since the last call.
    pub fn take(&self) -> Vec<Diagnostic> {
        self.recorder.take()
    }
}

impl DiagnosticSink for TeeSink {
    fn record(&self, diagnostic: &Diagnostic) {
        TracingSink.record(diagnostic);
        self.recorder.record(diagnostic);
    }
}

/// One JSON output line.
#[derive(Debug, Serialize)]
pub struct Record<'a> {
    /// The evaluation.
    #[serde(flatten)]
    pub evaluation: &'a Evaluation,
    /// Diagnostics emitted while computing it.
    pub diagnostics: &'a [Diagnostic],
}

/// Renders an evaluation as a single JSON line.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(evaluation: &Evaluation, diagnostics: &[Diagnostic]) -> Result<String> {
    serde_json::to_string(&Record {
        evaluation,
        diagnostics,
    })
    .context("serializing evaluation")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use fun_cascade::{Algorithm, Cascade, TableSource};

    fn read_all(text: &str) -> Vec<(f64, f64, f64)> {
        let mut reader = TripleReader::new(text.as_bytes());
        let mut out = Vec::new();
        while let Some(t) = reader.next_triple().unwrap() {
            out.push(t);
        }
        out
    }

    #[test]
    fn reads_triples_across_lines() {
        assert_eq!(
            read_all("1 2 3\n4\n5 6\n"),
            vec![(1.0, 2.0, 3.0), (4.0, 5.0, 6.0)]
        );
    }

    #[test]
    fn sentinel_ends_input() {
        assert_eq!(read_all("1 2 3\n-1\n4 5 6\n"), vec![(1.0, 2.0, 3.0)]);
        // -1 only ends input in the x position.
        assert_eq!(read_all("2 -1 -1\n"), vec![(2.0, -1.0, -1.0)]);
    }

    #[test]
    fn bad_token_or_eof_ends_input() {
        assert_eq!(read_all("1 2 3 quit 4 5 6"), vec![(1.0, 2.0, 3.0)]);
        assert_eq!(read_all("1 2"), Vec::new());
        assert_eq!(read_all(""), Vec::new());
    }

    #[test]
    fn seeded_table_is_removed_on_drop() {
        let path = std::env::temp_dir()
            .join(format!("fun-cascade-seed-{}.dat", std::process::id()));
        {
            let seeded = seed_table(&path).unwrap();
            assert_eq!(fs::read_to_string(seeded.path()).unwrap(), SAMPLE_TABLE);

            let cascade = Cascade::new(TableSource::file(seeded.path()), Recorder::new());
            assert_eq!(cascade.compute(15.0, 2.0, 3.0).algorithm, Algorithm::Second);
            assert_eq!(cascade.table().tbl(0.0).unwrap(), 10.1);
        }
        assert!(!path.exists());
    }

    #[test]
    fn json_line_carries_algorithm_and_diagnostics() {
        let cascade = Cascade::new(TableSource::inline(SAMPLE_TABLE), TeeSink::new());
        let eval = cascade.compute(15.0, 2.0, 3.0);
        let diagnostics = cascade.sink().take();
        let line = render_json(&eval, &diagnostics).unwrap();

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["algorithm"], "second");
        assert_eq!(value["value"], 1.5);
        assert_eq!(value["transitions"][0]["cause"]["kind"], "escalation");
        assert_eq!(value["diagnostics"][3]["kind"], "domain_fallback");
    }
}
