//! CLI argument definitions for the Parquet generator.

use clap::Args;
use colgen_core::DatasetSpec;
use colgen_generator::DEFAULT_SEED;
use std::path::PathBuf;

/// Generation arguments that do not depend on the output format.
#[derive(Args, Clone, Debug, Default)]
pub struct CommonGenerateArgs {
    /// Random seed for deterministic generation (overrides the seed in the JSON file)
    #[arg(long, env = "COLGEN_SEED")]
    pub seed: Option<u64>,

    /// Maximum number of rows per Parquet row group
    #[arg(long)]
    pub row_group_size: Option<usize>,

    /// Generate top-level columns in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Dry-run mode: validate and generate without writing a file
    #[arg(long)]
    pub dry_run: bool,

    /// Log row, null and distinct counts for every column
    #[arg(long)]
    pub summary: bool,
}

impl CommonGenerateArgs {
    /// Seed to use: the flag, then the dataset's own seed, then [`DEFAULT_SEED`].
    pub fn resolve_seed(&self, dataset: &DatasetSpec) -> u64 {
        self.seed.or(dataset.seed()).unwrap_or(DEFAULT_SEED)
    }
}

/// Parquet generation arguments.
#[derive(Args, Clone, Debug)]
pub struct ParquetGenerateArgs {
    /// Path to the dataset JSON file
    #[arg(long, short = 'j')]
    pub json: PathBuf,

    /// Output Parquet file (default: data/parquet/<timestamp>.parquet)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonGenerateArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use colgen_core::{ColumnSpec, DataType};

    fn dataset() -> DatasetSpec {
        DatasetSpec::new(
            10,
            vec![ColumnSpec::builder("a", DataType::Integer).build().unwrap()],
        )
        .unwrap()
    }

    #[test]
    fn test_seed_precedence() {
        let args = CommonGenerateArgs::default();
        assert_eq!(args.resolve_seed(&dataset()), DEFAULT_SEED);
        assert_eq!(args.resolve_seed(&dataset().with_seed(7)), 7);

        let args = CommonGenerateArgs {
            seed: Some(99),
            ..Default::default()
        };
        assert_eq!(args.resolve_seed(&dataset().with_seed(7)), 99);
    }
}
