//! Generated column data.
//!
//! Generation is columnar: every column is produced as one typed vector of
//! optional values, and struct columns hold their children side by side with a
//! row-level validity mask. These are the types handed from the generator to
//! the Parquet writer.

use crate::types::DataType;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Typed values of one generated column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// 64-bit signed integers
    Int64(Vec<Option<i64>>),

    /// 64-bit floats
    Float64(Vec<Option<f64>>),

    /// Alphanumeric strings
    Utf8(Vec<Option<String>>),

    /// Row validity mask (`false` = null row) plus child columns holding one
    /// row per valid struct row, in order
    Struct {
        fields: Vec<GeneratedColumn>,
        validity: Vec<bool>,
    },
}

impl ColumnData {
    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Self::Int64(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Utf8(v) => v.len(),
            Self::Struct { validity, .. } => validity.len(),
        }
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Logical dtype carried by this data.
    pub fn dtype(&self) -> DataType {
        match self {
            Self::Int64(_) => DataType::Integer,
            Self::Float64(_) => DataType::Double,
            Self::Utf8(_) => DataType::String,
            Self::Struct { .. } => DataType::Struct,
        }
    }

    /// Whether row `index` is null.
    pub fn is_null(&self, index: usize) -> bool {
        match self {
            Self::Int64(v) => matches!(v.get(index), Some(None)),
            Self::Float64(v) => matches!(v.get(index), Some(None)),
            Self::Utf8(v) => matches!(v.get(index), Some(None)),
            Self::Struct { validity, .. } => matches!(validity.get(index), Some(false)),
        }
    }

    /// Number of null rows. For structs this counts struct-level nulls only.
    pub fn null_count(&self) -> usize {
        match self {
            Self::Int64(v) => v.iter().filter(|x| x.is_none()).count(),
            Self::Float64(v) => v.iter().filter(|x| x.is_none()).count(),
            Self::Utf8(v) => v.iter().filter(|x| x.is_none()).count(),
            Self::Struct { validity, .. } => validity.iter().filter(|valid| !**valid).count(),
        }
    }

    /// Number of distinct non-null values. `None` for structs.
    ///
    /// Doubles are compared by bit pattern.
    pub fn distinct_count(&self) -> Option<usize> {
        match self {
            Self::Int64(v) => Some(v.iter().flatten().collect::<HashSet<_>>().len()),
            Self::Float64(v) => Some(
                v.iter()
                    .flatten()
                    .map(|x| x.to_bits())
                    .collect::<HashSet<_>>()
                    .len(),
            ),
            Self::Utf8(v) => Some(v.iter().flatten().collect::<HashSet<_>>().len()),
            Self::Struct { .. } => None,
        }
    }
}

/// A named column produced by one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedColumn {
    name: String,
    repeat_count: usize,
    data: ColumnData,
}

impl GeneratedColumn {
    /// Create a new generated column.
    pub fn new(name: impl Into<String>, repeat_count: usize, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            repeat_count,
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// List nesting requested by the spec (1 = not repeated).
    pub fn repeat_count(&self) -> usize {
        self.repeat_count
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn into_data(self) -> ColumnData {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.data.null_count()
    }

    pub fn distinct_count(&self) -> Option<usize> {
        self.data.distinct_count()
    }

    /// Child columns of a struct column (empty for leaves).
    pub fn fields(&self) -> &[GeneratedColumn] {
        match &self.data {
            ColumnData::Struct { fields, .. } => fields,
            _ => &[],
        }
    }

    /// Look up a struct child by name.
    pub fn field(&self, name: &str) -> Option<&GeneratedColumn> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Summarize rows, nulls and distinct values, recursing into struct children.
    pub fn summary(&self) -> ColumnSummary {
        ColumnSummary {
            name: self.name.clone(),
            rows: self.len(),
            nulls: self.null_count(),
            distinct: self.distinct_count(),
            fields: self.fields().iter().map(|f| f.summary()).collect(),
        }
    }
}

/// Row, null and distinct counts for one generated column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub rows: usize,
    pub nulls: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distinct: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<ColumnSummary>,
}

impl fmt::Display for ColumnSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: rows={} nulls={}", self.name, self.rows, self.nulls)?;
        if let Some(distinct) = self.distinct {
            write!(f, " distinct={distinct}")?;
        }
        Ok(())
    }
}
