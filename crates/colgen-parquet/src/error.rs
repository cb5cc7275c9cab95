//! Error types for the Parquet populator.

use colgen_core::{ErrorKind, SpecError};
use colgen_generator::GeneratorError;
use thiserror::Error;

/// Errors that can occur while binding, generating or writing a dataset.
#[derive(Error, Debug)]
pub enum ParquetPopulatorError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow array or schema error.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet writer error.
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Spec error.
    #[error("{0}")]
    Spec(#[from] SpecError),

    /// Generator error.
    #[error("{0}")]
    Generator(#[from] GeneratorError),

    /// Generated data does not match the bound Arrow type.
    #[error("Column '{column}' holds {actual} data but the schema expects {expected}")]
    ColumnMismatch {
        column: String,
        expected: String,
        actual: String,
    },

    /// Repeated column has more list elements than 32-bit offsets can address.
    #[error("Column '{column}' would need {elements} list elements, more than a list array can hold")]
    ListTooLarge { column: String, elements: usize },
}

impl ParquetPopulatorError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Spec(e) => e.kind(),
            Self::Generator(e) => e.kind(),
            Self::Io(_) => ErrorKind::Input,
            Self::ListTooLarge { .. } => ErrorKind::Capacity,
            Self::Arrow(_) | Self::Parquet(_) | Self::ColumnMismatch { .. } => ErrorKind::Schema,
        }
    }
}
