//! Arrow schema derived from column specs.
//!
//! | spec | Arrow type |
//! |---|---|
//! | `int` | `Int64` |
//! | `double` | `Float64` |
//! | `str` | `Utf8` |
//! | `struct` | `Struct` of the children, in order |
//! | `num_repeated > 1` | `List` whose element field is named after the column |
//!
//! A field is nullable when the spec asks for nulls. Columns with a custom
//! generator are always nullable since their output is not known up front.

use crate::plan::WritePlan;
use arrow::datatypes::{DataType as ArrowDataType, Field, Fields, Schema, SchemaRef};
use colgen_core::{ColumnSpec, Compression, DataType, Encoding};
use parquet::file::properties::WriterProperties;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Arrow type of one value of the column, ignoring repetition.
pub fn value_type(spec: &ColumnSpec) -> ArrowDataType {
    match spec.dtype() {
        DataType::Integer => ArrowDataType::Int64,
        DataType::Double => ArrowDataType::Float64,
        DataType::String => ArrowDataType::Utf8,
        DataType::Struct => ArrowDataType::Struct(struct_fields(spec.children())),
    }
}

/// Arrow field for a column, including list wrapping and nullability.
pub fn arrow_field(spec: &ColumnSpec) -> Field {
    let nullable = spec.is_nullable() || spec.custom_generator().is_some();
    let value_type = value_type(spec);

    if spec.is_repeated() {
        let element = Field::new(spec.name(), value_type, false);
        Field::new(spec.name(), ArrowDataType::List(Arc::new(element)), nullable)
    } else {
        Field::new(spec.name(), value_type, nullable)
    }
}

fn struct_fields(children: &[ColumnSpec]) -> Fields {
    children.iter().map(arrow_field).collect()
}

/// Arrow schema for a list of top-level columns.
pub fn arrow_schema(columns: &[ColumnSpec]) -> SchemaRef {
    Arc::new(Schema::new(
        columns.iter().map(arrow_field).collect::<Vec<_>>(),
    ))
}

/// Physical schema and per-leaf write plan of a set of columns.
#[derive(Debug, Clone)]
pub struct SchemaBinder {
    schema: SchemaRef,
    plan: WritePlan,
}

impl SchemaBinder {
    pub fn bind(columns: &[ColumnSpec]) -> Self {
        Self {
            schema: arrow_schema(columns),
            plan: WritePlan::from_columns(columns),
        }
    }

    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    pub fn plan(&self) -> &WritePlan {
        &self.plan
    }

    /// Codec per dotted leaf path.
    pub fn compression_map(&self) -> BTreeMap<String, Compression> {
        self.plan.compression_map()
    }

    /// Explicit encoding per dotted leaf path.
    pub fn encoding_map(&self) -> BTreeMap<String, Encoding> {
        self.plan.encoding_map()
    }

    pub fn writer_properties(&self, max_row_group_size: Option<usize>) -> WriterProperties {
        self.plan.writer_properties(max_row_group_size)
    }
}
