//! colgen
//!
//! A columnar test-data generator. A JSON dataset description names each
//! column's type, cardinality, value distribution, null count, repetition and
//! Parquet compression/encoding; colgen generates the data and writes it as a
//! single Parquet file.
//!
//! # Crates
//!
//! - `colgen_core` - column specs, JSON input, generated value model, errors
//! - `colgen_generator` - seeded per-column generation with distribution shaping
//! - `colgen_parquet` - Arrow schema, per-leaf write plan and Parquet writer
//!
//! # CLI Usage
//!
//! ```bash
//! # Generate into data/parquet/<timestamp>.parquet
//! colgen -j dataset.json
//!
//! # Fixed output, seed and row group size
//! colgen -j dataset.json -o out.parquet --seed 7 --row-group-size 10000
//!
//! # Validate and generate only, printing column summaries
//! colgen -j dataset.json --dry-run --summary
//! ```

pub mod generate;

pub use generate::{default_output_path, run_generate};
