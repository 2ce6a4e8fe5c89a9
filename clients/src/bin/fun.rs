//! `fun-cascade` — evaluates `fun(x, y, z)` through the fallback cascade.
//!
//! Writes the sample table, runs the built-in test vectors, then reads
//! `x y z` triples from stdin until x is -1 or input ends.
//!
//! **Usage:**
//! ```text
//! fun-cascade [--table <path>] [--no-seed] [--skip-demo] [--json]
//! ```
//!
//! Exits zero unless stdout cannot be written. `RUST_LOG` controls the
//! diagnostics written to stderr.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fun_cascade::{Cascade, Evaluation, TableSource};
use fun_cascade_clients::{
    init_tracing, render_json, seed_table, TeeSink, TripleReader, DEMO_VECTORS,
};
use tracing::{error, info};

/// Evaluate fun(x, y, z) with a three-level fallback cascade.
#[derive(Parser)]
#[command(
    name = "fun-cascade",
    about = "Evaluate fun(x, y, z) with a three-level fallback cascade"
)]
struct Args {
    /// Path of the two-column table file (default: dat_1.dat).
    #[arg(long, default_value = "dat_1.dat")]
    table: PathBuf,

    /// Use the existing table file instead of writing the sample table.
    #[arg(long)]
    no_seed: bool,

    /// Skip the built-in test vectors.
    #[arg(long)]
    skip_demo: bool,

    /// Print one JSON object per evaluation instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    // Held until the end of main so the file outlives every evaluation.
    let _seeded = if args.no_seed {
        None
    } else {
        match seed_table(&args.table) {
            Ok(seeded) => Some(seeded),
            Err(err) => {
                error!("{err:#}");
                None
            }
        }
    };

    let cascade = Cascade::new(TableSource::file(&args.table), TeeSink::new());
    let mut stdout = io::stdout();

    if !args.json {
        println!("=== fun(x, y, z) fallback cascade ===");
    }

    if !args.skip_demo {
        for (x, y, z) in DEMO_VECTORS {
            if !args.json {
                println!();
                println!("--- Test: x={x}, y={y}, z={z} ---");
            }
            let eval = cascade.compute(x, y, z);
            emit(&mut stdout, &cascade, &eval, args.json, true)?;
        }
    }

    if !args.json {
        println!();
        println!("=== Interactive Mode ===");
    }

    let mut reader = TripleReader::new(io::stdin().lock());
    loop {
        if !args.json {
            print!("Enter x y z (or -1 to exit): ");
            stdout.flush()?;
        }
        let triple = match reader.next_triple() {
            Ok(Some(triple)) => triple,
            Ok(None) => break,
            Err(err) => {
                error!("{err:#}");
                break;
            }
        };
        let (x, y, z) = triple;
        let eval = cascade.compute(x, y, z);
        emit(&mut stdout, &cascade, &eval, args.json, false)?;
    }

    if !args.json {
        println!();
        println!("Program finished.");
    }
    info!(table = %args.table.display(), "done");
    Ok(())
}

/// Prints one evaluation and drains its diagnostics.
fn emit(
    out: &mut impl Write,
    cascade: &Cascade<TeeSink>,
    eval: &Evaluation,
    json: bool,
    demo: bool,
) -> Result<()> {
    let diagnostics = cascade.sink().take();
    if json {
        writeln!(out, "{}", render_json(eval, &diagnostics)?)?;
    } else if demo {
        writeln!(out, "Result: {} ({})", eval.value, eval.algorithm)?;
    } else {
        writeln!(out, "{eval}")?;
    }
    Ok(())
}
