//! Parquet output for colgen datasets.
//!
//! This crate binds column specs to an Arrow schema and a per-leaf write plan,
//! turns generated columns into Arrow arrays and writes them with the
//! `parquet` Arrow writer.
//!
//! # Example
//!
//! ```ignore
//! use colgen_core::DatasetSpec;
//! use colgen_parquet::ParquetPopulator;
//!
//! let dataset = DatasetSpec::from_file("path/to/dataset.json")?;
//! let populator = ParquetPopulator::new(dataset, 42);
//!
//! let metrics = populator.populate("data/parquet/out.parquet")?;
//! ```

pub mod args;
pub mod arrays;
mod error;
pub mod plan;
mod populator;
pub mod schema;

pub use args::{CommonGenerateArgs, ParquetGenerateArgs};
pub use error::ParquetPopulatorError;
pub use plan::{LeafPlan, WritePlan};
pub use populator::{ParquetPopulator, PopulateMetrics};
pub use schema::{arrow_schema, SchemaBinder};
