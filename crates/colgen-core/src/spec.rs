//! Column specifications.
//!
//! A [`ColumnSpec`] is the validated, immutable description of one column. Leaves
//! carry a dtype, a distribution and value-space parameters; struct columns carry
//! an ordered list of child specs. Specs never store a row count: the same spec
//! can be generated at any size, and [`ColumnSpec::check_capacity`] verifies a
//! given size analytically before any sampling happens.
//!
//! ## Building a spec
//!
//! ```rust
//! use colgen_core::{ColumnSpec, DataType, Distribution, Encoding};
//!
//! let spec = ColumnSpec::builder("price", DataType::Double)
//!     .distribution(Distribution::Gamma)
//!     .cardinality(50)
//!     .null_count(3)
//!     .dist_param("min", 0.0)
//!     .dist_param("max", 1000.0)
//!     .encoding(Encoding::ByteStreamSplit)
//!     .build()
//!     .unwrap();
//!
//! assert!(spec.check_capacity(100).is_ok());
//! assert!(spec.check_capacity(40).is_err());
//! ```

use crate::error::SpecError;
use crate::types::{Compression, DataType, Distribution, Encoding};
use crate::values::ColumnData;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Symbols used for generated strings.
pub const STRING_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Standard deviation used by the normal distribution when `std` is absent.
pub const DEFAULT_STD: f64 = 1.0;

/// Gamma shape used when `shape` is absent.
pub const DEFAULT_GAMMA_SHAPE: f64 = 2.0;

/// Gamma scale used when `scale` is absent.
pub const DEFAULT_GAMMA_SCALE: f64 = 1.0;

/// Lower bound of numeric pools when `min` is absent.
pub const DEFAULT_MIN: i64 = i32::MIN as i64;

/// Upper bound of numeric pools when `max` is absent.
pub const DEFAULT_MAX: i64 = i32::MAX as i64;

/// Columns with fewer non-null slots than this get cardinality equal to the slot count.
pub const SMALL_COLUMN_THRESHOLD: usize = 10;

// ============================================================================
// Value-space parameters
// ============================================================================

/// Inclusive range of generated string lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringLengthRange {
    /// Minimum length (inclusive)
    pub min: usize,
    /// Maximum length (inclusive)
    pub max: usize,
}

impl StringLengthRange {
    /// Create a new range. Validation happens when the owning spec is built.
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Number of distinct strings over [`STRING_ALPHABET`] with a length in range.
    ///
    /// Saturates at `u128::MAX`, which only matters for astronomically large spaces.
    pub fn distinct_capacity(&self) -> u128 {
        let base = STRING_ALPHABET.len() as u128;
        let mut total: u128 = 0;
        let mut power: u128 = 1;
        for len in 0..=self.max {
            if len >= self.min {
                total = total.saturating_add(power);
            }
            power = power.saturating_mul(base);
            if total == u128::MAX {
                break;
            }
        }
        total
    }
}

impl Default for StringLengthRange {
    fn default() -> Self {
        Self { min: 5, max: 10 }
    }
}

/// Distribution-specific numeric parameters (`std`, `shape`, `scale`, `min`, `max`, ...).
///
/// Every spec owns its own map; there is no shared default instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistributionParams(BTreeMap<String, f64>);

impl DistributionParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter.
    pub fn set(&mut self, key: impl Into<String>, value: f64) {
        self.0.insert(key.into(), value);
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.set(key, value);
        self
    }

    /// Look up a raw parameter.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Whether no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Standard deviation for the normal shape.
    pub fn std(&self) -> f64 {
        self.get("std").unwrap_or(DEFAULT_STD)
    }

    /// Gamma shape parameter.
    pub fn shape(&self) -> f64 {
        self.get("shape").unwrap_or(DEFAULT_GAMMA_SHAPE)
    }

    /// Gamma scale parameter.
    pub fn scale(&self) -> f64 {
        self.get("scale").unwrap_or(DEFAULT_GAMMA_SCALE)
    }

    /// Inclusive bounds for integer pools.
    pub fn integer_bounds(&self, column: &str) -> Result<(i64, i64), SpecError> {
        let min = match self.get("min") {
            Some(v) => whole_number(column, "min", v)?,
            None => DEFAULT_MIN,
        };
        let max = match self.get("max") {
            Some(v) => whole_number(column, "max", v)?,
            None => DEFAULT_MAX,
        };
        Ok((min, max))
    }

    /// Inclusive bounds for double pools.
    pub fn double_bounds(&self) -> (f64, f64) {
        (
            self.get("min").unwrap_or(DEFAULT_MIN as f64),
            self.get("max").unwrap_or(DEFAULT_MAX as f64),
        )
    }

    /// Check parameter domains for a column of the given dtype.
    pub fn validate(&self, column: &str, dtype: DataType) -> Result<(), SpecError> {
        for (key, value) in &self.0 {
            if !value.is_finite() {
                return Err(invalid_param(column, key, "must be a finite number"));
            }
        }

        for key in ["std", "shape", "scale"] {
            if let Some(value) = self.get(key) {
                if value <= 0.0 {
                    return Err(invalid_param(column, key, "must be greater than zero"));
                }
                // densities divide by the value and the Normal range spans 2x it
                if !(1.0 / value).is_finite() || !(2.0 * value).is_finite() {
                    return Err(invalid_param(column, key, "is too extreme to weight values"));
                }
            }
        }

        match dtype {
            DataType::Integer => {
                let (min, max) = self.integer_bounds(column)?;
                if min > max {
                    return Err(invalid_param(column, "min", "must not exceed max"));
                }
            }
            DataType::Double => {
                let (min, max) = self.double_bounds();
                if min > max {
                    return Err(invalid_param(column, "min", "must not exceed max"));
                }
                if !(max - min).is_finite() {
                    return Err(invalid_param(column, "max", "range width overflows a double"));
                }
            }
            DataType::String | DataType::Struct => {}
        }

        Ok(())
    }
}

fn whole_number(column: &str, param: &str, value: f64) -> Result<i64, SpecError> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper comparison
    if value.fract() != 0.0 || value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(invalid_param(
            column,
            param,
            "must be a whole number within the 64-bit integer range",
        ));
    }
    Ok(value as i64)
}

fn invalid_param(column: &str, param: &str, reason: &str) -> SpecError {
    SpecError::InvalidDistParam {
        column: column.to_string(),
        param: param.to_string(),
        reason: reason.to_string(),
    }
}

// ============================================================================
// Custom generators
// ============================================================================

/// Override that produces a column's data directly.
///
/// A column with a custom generator skips pool generation, distribution
/// shaping and null injection. The generator receives the requested row count
/// and a seed derived from the column's position in the spec tree, and must
/// return exactly `size` entries of the column's dtype.
pub trait CustomGenerator: Send + Sync + fmt::Debug {
    /// Produce the column data for `size` rows.
    fn generate(&self, size: usize, seed: u64) -> ColumnData;
}

// ============================================================================
// ColumnSpec
// ============================================================================

/// Validated description of one column (leaf or struct).
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    name: String,
    dtype: DataType,
    distribution: Distribution,
    cardinality: Option<usize>,
    null_count: usize,
    repeat_count: usize,
    string_length: StringLengthRange,
    dist_params: DistributionParams,
    children: Vec<ColumnSpec>,
    compression: Compression,
    encoding: Encoding,
    custom_generator: Option<Arc<dyn CustomGenerator>>,
}

impl ColumnSpec {
    /// Start building a spec with every optional setting at its default.
    pub fn builder(name: impl Into<String>, dtype: DataType) -> ColumnSpecBuilder {
        ColumnSpecBuilder::new(name, dtype)
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Logical dtype.
    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    /// Requested distribution (ignored for structs).
    pub fn distribution(&self) -> Distribution {
        self.distribution
    }

    /// Explicit cardinality, if any.
    pub fn cardinality(&self) -> Option<usize> {
        self.cardinality
    }

    /// Number of null entries in the generated column.
    pub fn null_count(&self) -> usize {
        self.null_count
    }

    /// Whether the physical column is nullable.
    pub fn is_nullable(&self) -> bool {
        self.null_count > 0
    }

    /// List nesting: values above one wrap each row in a list.
    pub fn repeat_count(&self) -> usize {
        self.repeat_count
    }

    /// Whether the column is written as a list.
    pub fn is_repeated(&self) -> bool {
        self.repeat_count > 1
    }

    /// String length range (meaningful for string columns only).
    pub fn string_length(&self) -> StringLengthRange {
        self.string_length
    }

    /// Distribution parameters.
    pub fn dist_params(&self) -> &DistributionParams {
        &self.dist_params
    }

    /// Ordered child specs (empty for leaves).
    pub fn children(&self) -> &[ColumnSpec] {
        &self.children
    }

    /// Look up a direct child by name.
    pub fn child(&self, name: &str) -> Option<&ColumnSpec> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Compression codec (leaves only; struct codecs are not written).
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Encoding (leaves only).
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Custom generator override, if any.
    pub fn custom_generator(&self) -> Option<&Arc<dyn CustomGenerator>> {
        self.custom_generator.as_ref()
    }

    /// Check every construction-time invariant, recursing into children.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.name.is_empty() {
            return Err(SpecError::EmptyName);
        }
        if self.cardinality == Some(0) {
            return Err(SpecError::ZeroCardinality(self.name.clone()));
        }
        if self.repeat_count == 0 {
            return Err(SpecError::ZeroRepeatCount(self.name.clone()));
        }

        match self.dtype {
            DataType::Struct => {
                if self.children.is_empty() {
                    return Err(SpecError::MissingStructFields(self.name.clone()));
                }
                for child in &self.children {
                    child.validate()?;
                }
                ensure_unique_names(&self.children)?;
            }
            DataType::Integer | DataType::Double | DataType::String => {
                if !self.encoding.is_valid_for(self.dtype) {
                    return Err(SpecError::InvalidEncoding {
                        column: self.name.clone(),
                        encoding: self.encoding.to_string(),
                        dtype: self.dtype.to_string(),
                    });
                }
                if self.dtype == DataType::String && self.string_length.min > self.string_length.max
                {
                    return Err(SpecError::InvalidStringLength {
                        column: self.name.clone(),
                        min: self.string_length.min,
                        max: self.string_length.max,
                    });
                }
                self.dist_params.validate(&self.name, self.dtype)?;
            }
        }

        Ok(())
    }

    /// Resolve the number of distinct values for a column with `slots` non-null entries.
    ///
    /// Without an explicit cardinality, unique columns and columns with fewer than
    /// [`SMALL_COLUMN_THRESHOLD`] slots use one value per slot; larger columns use
    /// a tenth of the slots so that values repeat.
    pub fn effective_cardinality(&self, slots: usize) -> Result<usize, SpecError> {
        match self.cardinality {
            Some(cardinality) => {
                if cardinality > slots {
                    return Err(SpecError::CardinalityExceedsSlots {
                        column: self.name.clone(),
                        cardinality,
                        slots,
                    });
                }
                if self.distribution == Distribution::Unique && cardinality != slots {
                    return Err(SpecError::UniqueCardinalityMismatch {
                        column: self.name.clone(),
                        cardinality,
                        slots,
                    });
                }
                Ok(cardinality)
            }
            None if self.distribution == Distribution::Unique
                || slots < SMALL_COLUMN_THRESHOLD =>
            {
                Ok(slots)
            }
            None => Ok(slots / SMALL_COLUMN_THRESHOLD),
        }
    }

    /// Verify analytically that the column can be generated with `size` rows.
    ///
    /// Covers null count, cardinality against available slots and the size of
    /// the value space for integer, double and string pools. Struct children
    /// only fill the struct's non-null rows and are checked at `size - null_count`.
    pub fn check_capacity(&self, size: usize) -> Result<(), SpecError> {
        if self.custom_generator.is_some() {
            return Ok(());
        }

        if self.null_count > size {
            return Err(SpecError::NullCountExceedsSize {
                column: self.name.clone(),
                null_count: self.null_count,
                size,
            });
        }

        if self.dtype == DataType::Struct {
            for child in &self.children {
                child.check_capacity(size - self.null_count)?;
            }
            return Ok(());
        }

        let slots = size - self.null_count;
        let requested = self.effective_cardinality(slots)?;
        if requested == 0 {
            return Ok(());
        }

        match self.dtype {
            DataType::Integer => {
                let (min, max) = self.dist_params.integer_bounds(&self.name)?;
                let available = (max as i128) - (min as i128) + 1;
                if available < requested as i128 {
                    return Err(SpecError::IntegerRangeTooSmall {
                        column: self.name.clone(),
                        requested,
                        min,
                        max,
                    });
                }
            }
            DataType::Double => {
                let (min, max) = self.dist_params.double_bounds();
                if min == max && requested > 1 {
                    return Err(SpecError::DegenerateDoubleRange {
                        column: self.name.clone(),
                        requested,
                        min,
                        max,
                    });
                }
            }
            DataType::String => {
                if self.string_length.distinct_capacity() < requested as u128 {
                    return Err(SpecError::StringSpaceTooSmall {
                        column: self.name.clone(),
                        requested,
                        min_len: self.string_length.min,
                        max_len: self.string_length.max,
                    });
                }
            }
            DataType::Struct => unreachable!("struct columns return early"),
        }

        Ok(())
    }
}

/// Fail if two specs in `columns` share a name.
pub fn ensure_unique_names(columns: &[ColumnSpec]) -> Result<(), SpecError> {
    let mut seen = HashSet::with_capacity(columns.len());
    for column in columns {
        if !seen.insert(column.name()) {
            return Err(SpecError::DuplicateName(column.name().to_string()));
        }
    }
    Ok(())
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`ColumnSpec`]; `build()` runs full validation.
#[derive(Debug, Clone)]
pub struct ColumnSpecBuilder {
    spec: ColumnSpec,
}

impl ColumnSpecBuilder {
    /// Create a builder with defaults: normal distribution, no nulls, no
    /// repetition, strings of length 5 to 10, `NONE` codec, `PLAIN` encoding.
    pub fn new(name: impl Into<String>, dtype: DataType) -> Self {
        Self {
            spec: ColumnSpec {
                name: name.into(),
                dtype,
                distribution: Distribution::default(),
                cardinality: None,
                null_count: 0,
                repeat_count: 1,
                string_length: StringLengthRange::default(),
                dist_params: DistributionParams::new(),
                children: Vec::new(),
                compression: Compression::default(),
                encoding: Encoding::default(),
                custom_generator: None,
            },
        }
    }

    pub fn distribution(mut self, distribution: Distribution) -> Self {
        self.spec.distribution = distribution;
        self
    }

    pub fn cardinality(mut self, cardinality: usize) -> Self {
        self.spec.cardinality = Some(cardinality);
        self
    }

    pub fn maybe_cardinality(mut self, cardinality: Option<usize>) -> Self {
        self.spec.cardinality = cardinality;
        self
    }

    pub fn null_count(mut self, null_count: usize) -> Self {
        self.spec.null_count = null_count;
        self
    }

    pub fn repeat_count(mut self, repeat_count: usize) -> Self {
        self.spec.repeat_count = repeat_count;
        self
    }

    pub fn string_length(mut self, min: usize, max: usize) -> Self {
        self.spec.string_length = StringLengthRange::new(min, max);
        self
    }

    pub fn dist_params(mut self, params: DistributionParams) -> Self {
        self.spec.dist_params = params;
        self
    }

    pub fn dist_param(mut self, key: impl Into<String>, value: f64) -> Self {
        self.spec.dist_params.set(key, value);
        self
    }

    /// Append a child column (struct specs only).
    pub fn child(mut self, child: ColumnSpec) -> Self {
        self.spec.children.push(child);
        self
    }

    pub fn children(mut self, children: Vec<ColumnSpec>) -> Self {
        self.spec.children = children;
        self
    }

    pub fn compression(mut self, compression: Compression) -> Self {
        self.spec.compression = compression;
        self
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.spec.encoding = encoding;
        self
    }

    pub fn custom_generator(mut self, generator: Arc<dyn CustomGenerator>) -> Self {
        self.spec.custom_generator = Some(generator);
        self
    }

    /// Validate and return the spec.
    pub fn build(self) -> Result<ColumnSpec, SpecError> {
        self.spec.validate()?;
        Ok(self.spec)
    }
}
