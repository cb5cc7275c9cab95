//! Command-line interface for colgen
//!
//! ```bash
//! colgen --json dataset.json --output data/parquet/out.parquet --seed 42
//! ```
//!
//! `RUST_LOG=info` shows progress and completion metrics.

use clap::Parser;
use colgen::run_generate;
use colgen_parquet::ParquetGenerateArgs;

#[derive(Parser)]
#[command(name = "colgen")]
#[command(about = "Generate Parquet test data with controlled cardinality, distribution and nulls")]
#[command(long_about = None)]
struct Cli {
    #[command(flatten)]
    args: ParquetGenerateArgs,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(-1);
    }
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    run_generate(cli.args)?;
    Ok(())
}
