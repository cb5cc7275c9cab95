//! Parquet populator: generate a dataset and write it as one Parquet file.

use crate::arrays::record_batch;
use crate::error::ParquetPopulatorError;
use crate::plan::WritePlan;
use crate::schema::SchemaBinder;
use arrow::datatypes::SchemaRef;
use colgen_core::{ColumnSummary, DatasetSpec, GeneratedColumn};
use colgen_generator::DataGenerator;
use parquet::arrow::ArrowWriter;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default buffer size for Parquet writing.
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Metrics from a populate operation.
#[derive(Debug, Clone, Default)]
pub struct PopulateMetrics {
    /// Number of rows written.
    pub rows_written: u64,
    /// Number of top-level columns.
    pub columns: usize,
    /// Total time taken.
    pub total_duration: Duration,
    /// Time spent generating data.
    pub generation_duration: Duration,
    /// Time spent building arrays and writing the file.
    pub write_duration: Duration,
    /// Output file size in bytes, 0 on a dry run.
    pub file_size_bytes: u64,
    /// Per-column counts, filled when summaries are requested.
    pub column_summaries: Vec<ColumnSummary>,
}

impl PopulateMetrics {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.rows_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Calculate bytes per second.
    pub fn bytes_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.file_size_bytes as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Parquet populator that generates a dataset file.
pub struct ParquetPopulator {
    dataset: DatasetSpec,
    generator: DataGenerator,
    binder: SchemaBinder,
    row_group_size: Option<usize>,
    parallel: bool,
    summary: bool,
}

impl ParquetPopulator {
    /// Create a new Parquet populator.
    ///
    /// # Arguments
    ///
    /// * `dataset` - Validated dataset description
    /// * `seed` - Random seed for deterministic generation
    pub fn new(dataset: DatasetSpec, seed: u64) -> Self {
        let binder = SchemaBinder::bind(dataset.columns());
        Self {
            dataset,
            generator: DataGenerator::new(seed),
            binder,
            row_group_size: None,
            parallel: false,
            summary: false,
        }
    }

    /// Limit the number of rows per row group.
    pub fn with_row_group_size(mut self, row_group_size: Option<usize>) -> Self {
        self.row_group_size = row_group_size;
        self
    }

    /// Generate top-level columns on the rayon pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Collect per-column summaries into the metrics.
    pub fn with_summary(mut self, summary: bool) -> Self {
        self.summary = summary;
        self
    }

    pub fn dataset(&self) -> &DatasetSpec {
        &self.dataset
    }

    pub fn seed(&self) -> u64 {
        self.generator.seed()
    }

    /// Arrow schema of the output file.
    pub fn schema(&self) -> SchemaRef {
        self.binder.schema()
    }

    pub fn write_plan(&self) -> &WritePlan {
        self.binder.plan()
    }

    /// Generate every column of the dataset.
    pub fn generate_columns(&self) -> Result<Vec<GeneratedColumn>, ParquetPopulatorError> {
        let columns = if self.parallel {
            self.generator.generate_parallel(&self.dataset)?
        } else {
            self.generator.generate(&self.dataset)?
        };
        Ok(columns)
    }

    /// Write already generated columns to `output_path`.
    ///
    /// The file is written next to the target with an `.inprogress` extension
    /// and renamed once the writer is closed, so a failure leaves no file at
    /// `output_path`. Returns the final file size.
    pub fn write_columns<P: AsRef<Path>>(
        &self,
        columns: &[GeneratedColumn],
        output_path: P,
    ) -> Result<u64, ParquetPopulatorError> {
        let output_path = output_path.as_ref();
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let temp_path = in_progress_path(output_path);
        if let Err(e) = self.write_file(columns, &temp_path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e);
        }
        std::fs::rename(&temp_path, output_path)?;

        Ok(std::fs::metadata(output_path)?.len())
    }

    fn write_file(
        &self,
        columns: &[GeneratedColumn],
        path: &Path,
    ) -> Result<(), ParquetPopulatorError> {
        let batch = record_batch(self.schema(), columns)?;
        let props = self.binder.writer_properties(self.row_group_size);

        let file = File::create(path)?;
        let writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut writer = ArrowWriter::try_new(writer, self.schema(), Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        debug!("Wrote {} rows to '{}'", batch.num_rows(), path.display());
        Ok(())
    }

    /// Generate the dataset and write it to `output_path`.
    pub fn populate<P: AsRef<Path>>(
        &self,
        output_path: P,
    ) -> Result<PopulateMetrics, ParquetPopulatorError> {
        let output_path = output_path.as_ref();
        info!(
            "Generating Parquet file '{}' with {} rows and {} columns",
            output_path.display(),
            self.dataset.size(),
            self.dataset.columns().len()
        );

        let start_time = Instant::now();
        let columns = self.generate_columns()?;
        let generation_duration = start_time.elapsed();

        let write_start = Instant::now();
        let file_size_bytes = self.write_columns(&columns, output_path)?;
        let write_duration = write_start.elapsed();

        let metrics = self.metrics(
            &columns,
            start_time,
            generation_duration,
            write_duration,
            file_size_bytes,
        );

        info!(
            "Parquet generation complete: {} rows, {} bytes in {:?} ({:.2} rows/sec, {:.2} bytes/sec)",
            metrics.rows_written,
            metrics.file_size_bytes,
            metrics.total_duration,
            metrics.rows_per_second(),
            metrics.bytes_per_second()
        );

        Ok(metrics)
    }

    /// Validate, generate and bind without writing a file.
    pub fn dry_run(&self) -> Result<PopulateMetrics, ParquetPopulatorError> {
        info!(
            "Dry run: generating {} rows and {} columns without writing",
            self.dataset.size(),
            self.dataset.columns().len()
        );

        let start_time = Instant::now();
        let columns = self.generate_columns()?;
        let generation_duration = start_time.elapsed();

        let write_start = Instant::now();
        let batch = record_batch(self.schema(), &columns)?;
        let write_duration = write_start.elapsed();
        debug!("Dry run built a batch of {} rows", batch.num_rows());

        let metrics = self.metrics(&columns, start_time, generation_duration, write_duration, 0);

        info!(
            "Dry run complete: {} rows in {:?}",
            metrics.rows_written, metrics.total_duration
        );

        Ok(metrics)
    }

    fn metrics(
        &self,
        columns: &[GeneratedColumn],
        start_time: Instant,
        generation_duration: Duration,
        write_duration: Duration,
        file_size_bytes: u64,
    ) -> PopulateMetrics {
        let column_summaries = if self.summary {
            columns.iter().map(GeneratedColumn::summary).collect()
        } else {
            Vec::new()
        };

        PopulateMetrics {
            rows_written: self.dataset.size() as u64,
            columns: columns.len(),
            total_duration: start_time.elapsed(),
            generation_duration,
            write_duration,
            file_size_bytes,
            column_summaries,
        }
    }
}

fn in_progress_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".inprogress");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::DataType as ArrowDataType;
    use colgen_core::{ColumnSpec, Compression, DataType, Distribution, Encoding};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use parquet::basic::{Compression as ParquetCompression, Encoding as ParquetEncoding};
    use tempfile::TempDir;

    fn test_dataset() -> DatasetSpec {
        let json = r#"{
            "size": 100,
            "columns": [
                {"name": "id", "dtype": "int", "distribution": "unique",
                 "encoding": "DELTA_BINARY_PACKED", "compression": "SNAPPY"},
                {"name": "price", "dtype": "double", "num_null": 10,
                 "encoding": "BYTE_STREAM_SPLIT"},
                {"name": "tag", "dtype": "str", "cardinality": 5,
                 "distribution": "uniform", "encoding": "PLAIN_DICTIONARY",
                 "compression": "GZIP"},
                {"name": "point", "dtype": "struct", "fields": [
                    {"name": "x", "dtype": "int"},
                    {"name": "y", "dtype": "double", "num_null": 3}
                ]},
                {"name": "codes", "dtype": "int", "num_repeated": 3, "num_null": 4}
            ]
        }"#;
        DatasetSpec::from_json(json).unwrap()
    }

    #[test]
    fn test_metrics() {
        let metrics = PopulateMetrics {
            rows_written: 1000,
            columns: 3,
            total_duration: Duration::from_secs(10),
            generation_duration: Duration::from_secs(2),
            write_duration: Duration::from_secs(8),
            file_size_bytes: 100000,
            column_summaries: Vec::new(),
        };

        assert_eq!(metrics.rows_per_second(), 100.0);
        assert_eq!(metrics.bytes_per_second(), 10000.0);
        assert_eq!(PopulateMetrics::default().rows_per_second(), 0.0);
        assert_eq!(PopulateMetrics::default().bytes_per_second(), 0.0);
    }

    #[test]
    fn test_in_progress_path() {
        assert_eq!(
            in_progress_path(Path::new("out/data.parquet")),
            PathBuf::from("out/data.parquet.inprogress")
        );
    }

    #[test]
    fn test_populate_parquet() {
        let populator = ParquetPopulator::new(test_dataset(), 42);
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("nested/out.parquet");

        let metrics = populator.populate(&output_path).unwrap();

        assert_eq!(metrics.rows_written, 100);
        assert_eq!(metrics.columns, 5);
        assert!(metrics.file_size_bytes > 0);
        assert!(metrics.bytes_per_second() > 0.0);
        assert!(metrics.column_summaries.is_empty());
        assert!(output_path.exists());
        assert!(!in_progress_path(&output_path).exists());

        let file = File::open(&output_path).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let names: Vec<_> = builder.schema().fields().iter().map(|f| f.name().clone()).collect();
        assert_eq!(names, vec!["id", "price", "tag", "point", "codes"]);
        assert!(matches!(
            builder.schema().field_with_name("codes").unwrap().data_type(),
            ArrowDataType::List(_)
        ));

        let reader = builder.build().unwrap();
        let mut rows = 0;
        for batch in reader {
            let batch = batch.unwrap();
            rows += batch.num_rows();
            assert_eq!(batch.column(1).null_count(), 10);
        }
        assert_eq!(rows, 100);
    }

    #[test]
    fn test_column_chunk_settings() {
        let populator = ParquetPopulator::new(test_dataset(), 7);
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("out.parquet");
        populator.populate(&output_path).unwrap();

        let file = File::open(&output_path).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let row_group = builder.metadata().row_group(0);

        let chunk = |path: &str| {
            row_group
                .columns()
                .iter()
                .find(|c| c.column_path().string() == path)
                .unwrap()
                .clone()
        };

        let id = chunk("id");
        assert_eq!(id.compression(), ParquetCompression::SNAPPY);
        assert!(id.encodings().contains(&ParquetEncoding::DELTA_BINARY_PACKED));

        let price = chunk("price");
        assert!(price.encodings().contains(&ParquetEncoding::BYTE_STREAM_SPLIT));

        let tag = chunk("tag");
        assert!(matches!(tag.compression(), ParquetCompression::GZIP(_)));
        assert!(tag.dictionary_page_offset().is_some());

        let codes = chunk("codes.list.codes");
        assert_eq!(codes.compression(), ParquetCompression::UNCOMPRESSED);

        assert!(row_group.columns().iter().any(|c| c.column_path().string() == "point.y"));
    }

    #[test]
    fn test_row_group_size() {
        let populator = ParquetPopulator::new(test_dataset(), 42).with_row_group_size(Some(30));
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("out.parquet");
        populator.populate(&output_path).unwrap();

        let file = File::open(&output_path).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        assert_eq!(builder.metadata().num_row_groups(), 4);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let populator = ParquetPopulator::new(test_dataset(), 42).with_summary(true);

        let metrics = populator.dry_run().unwrap();

        assert_eq!(metrics.rows_written, 100);
        assert_eq!(metrics.file_size_bytes, 0);
        assert_eq!(metrics.column_summaries.len(), 5);
        assert_eq!(metrics.column_summaries[0].distinct, Some(100));
        assert_eq!(metrics.column_summaries[1].nulls, 10);
        assert_eq!(metrics.column_summaries[2].distinct, Some(5));
        assert_eq!(metrics.column_summaries[3].fields.len(), 2);
    }

    #[test]
    fn test_deterministic_generation() {
        let temp_dir = TempDir::new().unwrap();

        let path1 = temp_dir.path().join("test1.parquet");
        ParquetPopulator::new(test_dataset(), 42)
            .populate(&path1)
            .unwrap();

        let path2 = temp_dir.path().join("test2.parquet");
        ParquetPopulator::new(test_dataset(), 42)
            .with_parallel(true)
            .populate(&path2)
            .unwrap();

        let content1 = std::fs::read(&path1).unwrap();
        let content2 = std::fs::read(&path2).unwrap();
        assert_eq!(content1, content2);
    }

    #[test]
    fn test_failed_generation_leaves_no_file() {
        let columns = vec![ColumnSpec::builder("a", DataType::String)
            .distribution(Distribution::Unique)
            .string_length(1, 1)
            .compression(Compression::Lz4)
            .encoding(Encoding::Plain)
            .build()
            .unwrap()];
        let dataset = DatasetSpec::new(10, columns).unwrap();
        let populator = ParquetPopulator::new(dataset, 42);

        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("out.parquet");
        let columns = populator.generate_columns().unwrap();
        populator.write_columns(&columns, &output_path).unwrap();
        assert!(output_path.exists());

        let mismatched = vec![columns[0].clone(), columns[0].clone()];
        let other_path = temp_dir.path().join("other.parquet");
        let err = populator.write_columns(&mismatched, &other_path).unwrap_err();
        assert!(matches!(err, ParquetPopulatorError::ColumnMismatch { .. }));
        assert!(!other_path.exists());
        assert!(!in_progress_path(&other_path).exists());
    }
}
