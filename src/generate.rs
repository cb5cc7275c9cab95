//! Generate command handler.

use anyhow::Context;
use chrono::{DateTime, Local};
use colgen_core::DatasetSpec;
use colgen_parquet::{ParquetGenerateArgs, ParquetPopulator, PopulateMetrics};
use std::path::PathBuf;

/// Directory used when no output path is given.
pub const DEFAULT_OUTPUT_DIR: &str = "data/parquet";

/// Default output path: `data/parquet/<YYYYmmddHHMMSS>.parquet`.
pub fn default_output_path(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR).join(format!("{}.parquet", now.format("%Y%m%d%H%M%S")))
}

/// Run the generate command.
pub fn run_generate(args: ParquetGenerateArgs) -> anyhow::Result<PopulateMetrics> {
    let dataset = DatasetSpec::from_file(&args.json)
        .with_context(|| format!("Failed to load dataset from {:?}", args.json))?;
    let seed = args.common.resolve_seed(&dataset);

    tracing::info!(
        "Generating {} rows for {} columns (seed={})",
        dataset.size(),
        dataset.columns().len(),
        seed
    );

    let populator = ParquetPopulator::new(dataset, seed)
        .with_row_group_size(args.common.row_group_size)
        .with_parallel(args.common.parallel)
        .with_summary(args.common.summary);

    let metrics = if args.common.dry_run {
        populator
            .dry_run()
            .with_context(|| format!("Dry run failed for {:?}", args.json))?
    } else {
        let output_path = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(Local::now()));
        let metrics = populator
            .populate(&output_path)
            .with_context(|| format!("Failed to generate Parquet file {output_path:?}"))?;

        tracing::info!(
            "Generated {:?}: {} rows in {:?}",
            output_path,
            metrics.rows_written,
            metrics.total_duration
        );
        metrics
    };

    if args.common.summary {
        for summary in &metrics.column_summaries {
            tracing::info!("{}", summary);
        }
        let json = serde_json::to_string_pretty(&metrics.column_summaries)
            .context("Failed to serialize column summaries")?;
        println!("{json}");
    }

    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_output_path() {
        let now = Local.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(
            default_output_path(now),
            PathBuf::from("data/parquet/20240305070809.parquet")
        );
    }
}
