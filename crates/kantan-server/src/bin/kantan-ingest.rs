//! Load a scraped directory bundle into the provider database.
//!
//! ```text
//! kantan-ingest --input bundle.json --database kantan.db
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use kantan_core::ingest::{load_bundle, normalize_bundle, write_snapshot, DEFAULT_COUNTRY};
use kantan_core::Database;
use kantan_server::logging;

#[derive(Parser, Debug)]
#[command(name = "kantan-ingest", version, about = "Normalize and load the provider directory")]
struct Args {
    /// JSON bundle of scraped hospitals, doctors and problem mappings
    #[arg(short, long)]
    input: PathBuf,

    /// SQLite database to replace the directory in
    #[arg(short, long, default_value = "kantan.db")]
    database: PathBuf,

    /// Country recorded on every location
    #[arg(long, default_value = DEFAULT_COUNTRY)]
    country: String,

    /// Normalize and report without writing
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    logging::init_simple_logging();
    let args = Args::parse();

    let bundle = load_bundle(&args.input)
        .with_context(|| format!("Failed to read bundle {}", args.input.display()))?;

    let (snapshot, report) =
        normalize_bundle(&bundle, &args.country).context("Failed to normalize bundle")?;

    println!("{}", report);

    if args.dry_run {
        println!("Dry run: database not modified");
        return Ok(());
    }

    let mut db = Database::open(&args.database)
        .with_context(|| format!("Failed to open database {}", args.database.display()))?;
    let counts = write_snapshot(&mut db, &snapshot).context("Failed to write directory")?;

    println!(
        "Wrote {} locations, {} hospitals, {} doctors, {} problem mappings to {}",
        counts.locations,
        counts.hospitals,
        counts.doctors,
        counts.problem_mappings,
        args.database.display()
    );
    Ok(())
}
