//! Column generator for colgen.
//!
//! This crate turns validated [`ColumnSpec`](colgen_core::ColumnSpec)s into
//! columns of exactly `size` rows with a controlled number of distinct values,
//! a chosen frequency shape and an exact null count. Generation is
//! deterministic: each column draws from a `StdRng` seeded by the run seed and
//! the column's path through the spec tree.
//!
//! # Architecture
//!
//! ```text
//! DatasetSpec (JSON)
//!        │
//!        ▼
//! ┌──────────────────────┐
//! │    DataGenerator     │
//! │                      │
//! │  GenerationContext   │──── per-path StdRng
//! └──────────┬───────────┘
//!            │  per leaf
//!            ▼
//!   pool ─► distribution ─► nulls
//!            │
//!            ▼
//!   GeneratedColumn { name, repeat_count, data }
//! ```
//!
//! # Example
//!
//! ```rust
//! use colgen_core::DatasetSpec;
//! use colgen_generator::DataGenerator;
//!
//! let dataset = DatasetSpec::from_json(r#"{
//!   "size": 100,
//!   "columns": [
//!     { "name": "id", "dtype": "int", "distribution": "unique" },
//!     { "name": "city", "dtype": "str", "distribution": "uniform", "cardinality": 4, "num_null": 8 }
//!   ]
//! }"#).unwrap();
//!
//! let columns = DataGenerator::new(42).generate(&dataset).unwrap();
//! assert_eq!(columns[1].null_count(), 8);
//! assert_eq!(columns[1].distinct_count(), Some(4));
//! ```
//!
//! # Distributions
//!
//! - `unique` - every non-null value distinct
//! - `uniform` - every distinct value equally often (within one)
//! - `normal` - bell-shaped frequencies over the sorted distinct values
//! - `gamma` - right-skewed frequencies over the sorted distinct values
//! - `random` - draws with replacement, no cardinality guarantee

pub mod context;
pub mod generator;
pub mod generators;
pub mod stats;

// Re-exports for convenience
pub use context::GenerationContext;
pub use generator::{DataGenerator, GeneratorError, DEFAULT_SEED};
