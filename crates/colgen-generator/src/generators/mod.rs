//! Pool generators and the shaping steps applied to them.
//!
//! A leaf column is produced in three steps:
//!
//! 1. [`generate_pool`] draws `k` distinct raw values for the dtype
//! 2. [`distribution::expand`] stretches the pool to the non-null slot count
//! 3. [`nulls::inject_nulls`] appends the nulls and shuffles
//!
//! Struct columns are assembled by [`structs`].

pub mod distribution;
pub mod nulls;
pub mod numeric;
pub mod string;
pub mod structs;

use crate::generator::GeneratorError;
use colgen_core::{ColumnData, ColumnSpec, DataType};
use rand::Rng;

/// Attempts allowed for rejection sampling `count` unique values.
pub fn attempt_budget(count: usize) -> usize {
    count.saturating_mul(64).max(4096)
}

/// Distinct raw values for one leaf column.
#[derive(Debug, Clone, PartialEq)]
pub enum ValuePool {
    Int64(Vec<i64>),
    Float64(Vec<f64>),
    Utf8(Vec<String>),
}

impl ValuePool {
    pub fn len(&self) -> usize {
        match self {
            Self::Int64(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Utf8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sort ascending (doubles by total order).
    pub fn sort(&mut self) {
        match self {
            Self::Int64(v) => v.sort_unstable(),
            Self::Float64(v) => v.sort_unstable_by(f64::total_cmp),
            Self::Utf8(v) => v.sort_unstable(),
        }
    }

    /// Expand to `slots` values with the column's distribution, then inject its nulls.
    ///
    /// Pools for weighted distributions are sorted first.
    pub fn shape<R: Rng>(
        mut self,
        spec: &ColumnSpec,
        slots: usize,
        rng: &mut R,
    ) -> Result<ColumnData, GeneratorError> {
        let (name, shape, params) = (spec.name(), spec.distribution(), spec.dist_params());
        let null_count = spec.null_count();
        if distribution::uses_sorted_pool(shape) {
            self.sort();
        }

        Ok(match self {
            Self::Int64(pool) => {
                let values = distribution::expand(name, pool, slots, shape, params, rng)?;
                ColumnData::Int64(nulls::inject_nulls(values, null_count, rng))
            }
            Self::Float64(pool) => {
                let values = distribution::expand(name, pool, slots, shape, params, rng)?;
                ColumnData::Float64(nulls::inject_nulls(values, null_count, rng))
            }
            Self::Utf8(pool) => {
                let values = distribution::expand(name, pool, slots, shape, params, rng)?;
                ColumnData::Utf8(nulls::inject_nulls(values, null_count, rng))
            }
        })
    }
}

/// Draw `k` distinct values for a leaf column.
pub fn generate_pool<R: Rng>(
    spec: &ColumnSpec,
    k: usize,
    rng: &mut R,
) -> Result<ValuePool, GeneratorError> {
    let name = spec.name();
    match spec.dtype() {
        DataType::Integer => {
            let (min, max) = spec.dist_params().integer_bounds(name)?;
            Ok(ValuePool::Int64(numeric::unique_integers(
                name, rng, k, min, max,
            )?))
        }
        DataType::Double => {
            let (min, max) = spec.dist_params().double_bounds();
            Ok(ValuePool::Float64(numeric::unique_doubles(
                name, rng, k, min, max,
            )?))
        }
        DataType::String => Ok(ValuePool::Utf8(string::unique_strings(
            name,
            rng,
            k,
            spec.string_length(),
        )?)),
        DataType::Struct => Err(GeneratorError::NotALeaf(name.to_string())),
    }
}

/// A column of `size` nulls for a leaf dtype.
pub fn all_null(dtype: DataType, size: usize) -> Option<ColumnData> {
    match dtype {
        DataType::Integer => Some(ColumnData::Int64(vec![None; size])),
        DataType::Double => Some(ColumnData::Float64(vec![None; size])),
        DataType::String => Some(ColumnData::Utf8(vec![None; size])),
        DataType::Struct => None,
    }
}
