//! Core types for colgen.
//!
//! This crate provides the foundational types shared by the generator and the
//! Parquet writer:
//!
//! - [`ColumnSpec`] - Validated column description (leaf or struct)
//! - [`DatasetSpec`] - Row count, seed and columns loaded from JSON
//! - [`DataType`], [`Distribution`], [`Compression`], [`Encoding`] - Closed enums
//! - [`ColumnData`] / [`GeneratedColumn`] - Columnar generated values
//! - [`SpecError`] / [`ErrorKind`] - Error taxonomy
//!
//! # Architecture
//!
//! ```text
//! colgen-core (this crate)
//!    │
//!    ├─── colgen-generator  (pools, distribution shaping, nulls, structs)
//!    │
//!    └─── colgen-parquet    (Arrow schema, write plan, Parquet output)
//! ```
//!
//! # Example
//!
//! ```rust
//! use colgen_core::{DatasetSpec, DataType};
//!
//! let dataset = DatasetSpec::from_json(
//!     r#"{ "size": 10, "columns": [ { "name": "id", "dtype": "int", "distribution": "unique" } ] }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(dataset.column("id").unwrap().dtype(), DataType::Integer);
//! ```

pub mod dataset;
pub mod error;
pub mod spec;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use dataset::{ColumnDescriptor, DatasetSpec};
pub use error::{ErrorKind, SpecError};
pub use spec::{
    ColumnSpec, ColumnSpecBuilder, CustomGenerator, DistributionParams, StringLengthRange,
    STRING_ALPHABET,
};
pub use types::{Compression, DataType, Distribution, Encoding};
pub use values::{ColumnData, ColumnSummary, GeneratedColumn};
