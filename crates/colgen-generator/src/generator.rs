//! Main data generator for producing columns.

use crate::context::GenerationContext;
use crate::generators::{all_null, generate_pool, structs};
use colgen_core::{
    ColumnData, ColumnSpec, DataType, DatasetSpec, ErrorKind, GeneratedColumn, SpecError,
};
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info};

/// Seed used when neither the caller nor the dataset provides one.
pub const DEFAULT_SEED: u64 = 42;

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Invalid or unsatisfiable column spec
    #[error("{0}")]
    Spec(#[from] SpecError),

    /// Rejection sampling ran out of attempts
    #[error(
        "Could not generate {requested} unique {dtype} values for column '{column}' within {attempts} attempts"
    )]
    ValueSpaceExhausted {
        column: String,
        dtype: DataType,
        requested: usize,
        attempts: usize,
    },

    /// Custom generator output does not match the spec
    #[error(
        "Custom generator for column '{column}' returned {actual_len} {actual_dtype} rows, expected {expected_len} {expected_dtype} rows"
    )]
    CustomOutputMismatch {
        column: String,
        expected_len: usize,
        actual_len: usize,
        expected_dtype: DataType,
        actual_dtype: DataType,
    },

    /// Non-empty slot count with an empty pool
    #[error("Cannot fill {slots} slots from an empty pool (column '{column}')")]
    EmptyPool { column: String, slots: usize },

    /// More distinct values than slots
    #[error("Pool of {pool} values does not fit into {slots} slots (column '{column}')")]
    PoolLargerThanSize {
        column: String,
        pool: usize,
        slots: usize,
    },

    /// Distribution parameters produced unusable sampling weights
    #[error("Invalid sampling weights for column '{column}': {reason}")]
    InvalidWeights { column: String, reason: String },

    /// Leaf-only step applied to a struct column
    #[error("Column '{0}' is a struct and has no value pool")]
    NotALeaf(String),
}

impl GeneratorError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Spec(e) => e.kind(),
            Self::ValueSpaceExhausted { .. }
            | Self::CustomOutputMismatch { .. }
            | Self::EmptyPool { .. }
            | Self::PoolLargerThanSize { .. } => ErrorKind::Capacity,
            Self::InvalidWeights { .. } | Self::NotALeaf(_) => ErrorKind::Schema,
        }
    }
}

/// Data generator that produces deterministic columns.
///
/// Every column draws from a stream seeded by the generator seed and the
/// column's path, so the same seed and spec always give the same data, and
/// [`generate_parallel`](Self::generate_parallel) returns exactly what
/// [`generate`](Self::generate) returns.
#[derive(Debug, Clone, Copy)]
pub struct DataGenerator {
    context: GenerationContext,
}

impl DataGenerator {
    /// Create a new data generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            context: GenerationContext::new(seed),
        }
    }

    /// Create a generator seeded from the dataset, falling back to [`DEFAULT_SEED`].
    pub fn for_dataset(dataset: &DatasetSpec) -> Self {
        Self::new(dataset.seed().unwrap_or(DEFAULT_SEED))
    }

    pub fn seed(&self) -> u64 {
        self.context.seed()
    }

    pub fn context(&self) -> &GenerationContext {
        &self.context
    }

    /// Generate one top-level column with `size` rows.
    pub fn generate_column(
        &self,
        spec: &ColumnSpec,
        size: usize,
    ) -> Result<GeneratedColumn, GeneratorError> {
        generate_at(&self.context, spec, size, &[spec.name()])
    }

    /// Generate every column of the dataset, in order.
    pub fn generate(&self, dataset: &DatasetSpec) -> Result<Vec<GeneratedColumn>, GeneratorError> {
        info!(
            "Generating {} columns with {} rows (seed {})",
            dataset.columns().len(),
            dataset.size(),
            self.seed()
        );
        dataset
            .columns()
            .iter()
            .map(|spec| self.generate_column(spec, dataset.size()))
            .collect()
    }

    /// Generate the dataset's top-level columns on the rayon pool.
    pub fn generate_parallel(
        &self,
        dataset: &DatasetSpec,
    ) -> Result<Vec<GeneratedColumn>, GeneratorError> {
        info!(
            "Generating {} columns with {} rows in parallel (seed {})",
            dataset.columns().len(),
            dataset.size(),
            self.seed()
        );
        dataset
            .columns()
            .par_iter()
            .map(|spec| self.generate_column(spec, dataset.size()))
            .collect()
    }
}

/// Generate the column at `path` (its own name last).
pub(crate) fn generate_at(
    ctx: &GenerationContext,
    spec: &ColumnSpec,
    size: usize,
    path: &[&str],
) -> Result<GeneratedColumn, GeneratorError> {
    if let Some(custom) = spec.custom_generator() {
        let data = custom.generate(size, ctx.stream_seed(path));
        if data.len() != size || data.dtype() != spec.dtype() {
            return Err(GeneratorError::CustomOutputMismatch {
                column: spec.name().to_string(),
                expected_len: size,
                actual_len: data.len(),
                expected_dtype: spec.dtype(),
                actual_dtype: data.dtype(),
            });
        }
        debug!("Column '{}' produced by custom generator", spec.name());
        return Ok(GeneratedColumn::new(spec.name(), spec.repeat_count(), data));
    }

    spec.check_capacity(size)?;
    let mut rng = ctx.rng_for(path);

    let data = match spec.dtype() {
        DataType::Struct => structs::compose(ctx, spec, size, path, &mut rng)?,
        DataType::Integer | DataType::Double | DataType::String => {
            generate_leaf(spec, size, &mut rng)?
        }
    };

    Ok(GeneratedColumn::new(spec.name(), spec.repeat_count(), data))
}

fn generate_leaf<R: Rng>(
    spec: &ColumnSpec,
    size: usize,
    rng: &mut R,
) -> Result<ColumnData, GeneratorError> {
    let slots = size - spec.null_count();
    let cardinality = spec.effective_cardinality(slots)?;

    debug!(
        "Generating column '{}': rows={} slots={} cardinality={} distribution={}",
        spec.name(),
        size,
        slots,
        cardinality,
        spec.distribution()
    );

    if slots == 0 {
        return all_null(spec.dtype(), size)
            .ok_or_else(|| GeneratorError::NotALeaf(spec.name().to_string()));
    }

    let pool = generate_pool(spec, cardinality, rng)?;
    pool.shape(spec, slots, rng)
}
