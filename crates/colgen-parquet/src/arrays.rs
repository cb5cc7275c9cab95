//! Conversion of generated columns into Arrow arrays.
//!
//! A repeated column holds one generated value per row. On write every
//! non-null row becomes a list of `num_repeated` copies of that value and a
//! null row becomes a null list.

use crate::error::ParquetPopulatorError;
use arrow::array::{
    Array, ArrayRef, Float64Array, Int64Array, ListArray, RecordBatch, StringArray, StructArray,
    UInt64Array,
};
use arrow::buffer::{NullBuffer, OffsetBuffer};
use arrow::compute::take;
use arrow::datatypes::{DataType as ArrowDataType, Field, FieldRef, SchemaRef};
use colgen_core::{ColumnData, GeneratedColumn};
use std::sync::Arc;

/// Build the Arrow array for a generated column bound to `field`.
pub fn build_array(
    column: &GeneratedColumn,
    field: &Field,
) -> Result<ArrayRef, ParquetPopulatorError> {
    match field.data_type() {
        ArrowDataType::List(element) => {
            let base = data_array(column.name(), column.data(), element.data_type())?;
            repeat_list(column.name(), base, column.repeat_count(), element.clone())
        }
        other => data_array(column.name(), column.data(), other),
    }
}

/// Convert one row per value into an Arrow array of type `dtype`.
pub fn data_array(
    name: &str,
    data: &ColumnData,
    dtype: &ArrowDataType,
) -> Result<ArrayRef, ParquetPopulatorError> {
    let array: ArrayRef = match (data, dtype) {
        (ColumnData::Int64(values), ArrowDataType::Int64) => {
            Arc::new(Int64Array::from(values.clone()))
        }
        (ColumnData::Float64(values), ArrowDataType::Float64) => {
            Arc::new(Float64Array::from(values.clone()))
        }
        (ColumnData::Utf8(values), ArrowDataType::Utf8) => Arc::new(
            values
                .iter()
                .map(|v| v.as_deref())
                .collect::<StringArray>(),
        ),
        (ColumnData::Struct { fields, validity }, ArrowDataType::Struct(child_fields)) => {
            if fields.len() != child_fields.len() {
                return Err(ParquetPopulatorError::ColumnMismatch {
                    column: name.to_string(),
                    expected: format!("{} struct fields", child_fields.len()),
                    actual: format!("{} struct fields", fields.len()),
                });
            }

            let valid_rows = validity.iter().filter(|valid| **valid).count();
            let nulls = if valid_rows == validity.len() {
                None
            } else {
                Some(NullBuffer::from(validity.clone()))
            };

            let mut arrays = Vec::with_capacity(fields.len());
            for (child, child_field) in fields.iter().zip(child_fields.iter()) {
                if child.name() != child_field.name() {
                    return Err(ParquetPopulatorError::ColumnMismatch {
                        column: name.to_string(),
                        expected: format!("field '{}'", child_field.name()),
                        actual: format!("field '{}'", child.name()),
                    });
                }
                if child.len() != valid_rows {
                    return Err(ParquetPopulatorError::ColumnMismatch {
                        column: name.to_string(),
                        expected: format!("{} rows in field '{}'", valid_rows, child.name()),
                        actual: format!("{} rows", child.len()),
                    });
                }
                let array = build_array(child, child_field)?;
                arrays.push(match &nulls {
                    Some(_) => spread_rows(array, validity)?,
                    None => array,
                });
            }

            Arc::new(StructArray::try_new(child_fields.clone(), arrays, nulls)?)
        }
        (data, dtype) => {
            return Err(ParquetPopulatorError::ColumnMismatch {
                column: name.to_string(),
                expected: dtype.to_string(),
                actual: data.dtype().to_string(),
            })
        }
    };

    Ok(array)
}

/// Place the rows of `compact` on the valid positions of `validity`, nulls elsewhere.
fn spread_rows(compact: ArrayRef, validity: &[bool]) -> Result<ArrayRef, ParquetPopulatorError> {
    let mut next = 0u64;
    let indices: UInt64Array = validity
        .iter()
        .map(|valid| {
            valid.then(|| {
                next += 1;
                next - 1
            })
        })
        .collect();
    Ok(take(compact.as_ref(), &indices, None)?)
}

/// Wrap `base` in a list array repeating each non-null value `repeat` times.
pub fn repeat_list(
    name: &str,
    base: ArrayRef,
    repeat: usize,
    element: FieldRef,
) -> Result<ArrayRef, ParquetPopulatorError> {
    let valid_rows = base.len() - base.null_count();
    let elements = valid_rows.saturating_mul(repeat);
    if elements > i32::MAX as usize {
        return Err(ParquetPopulatorError::ListTooLarge {
            column: name.to_string(),
            elements,
        });
    }

    let mut indices = Vec::with_capacity(elements);
    for row in (0..base.len()).filter(|&row| base.is_valid(row)) {
        indices.extend(std::iter::repeat(row as u64).take(repeat));
    }
    let values = take(base.as_ref(), &UInt64Array::from(indices), None)?;

    let offsets = OffsetBuffer::<i32>::from_lengths(
        (0..base.len()).map(|row| if base.is_valid(row) { repeat } else { 0 }),
    );
    let nulls = base.nulls().cloned();

    Ok(Arc::new(ListArray::try_new(element, offsets, values, nulls)?))
}

/// Assemble a record batch from generated top-level columns.
pub fn record_batch(
    schema: SchemaRef,
    columns: &[GeneratedColumn],
) -> Result<RecordBatch, ParquetPopulatorError> {
    if schema.fields().len() != columns.len() {
        return Err(ParquetPopulatorError::ColumnMismatch {
            column: "<dataset>".to_string(),
            expected: format!("{} columns", schema.fields().len()),
            actual: format!("{} columns", columns.len()),
        });
    }

    let arrays = schema
        .fields()
        .iter()
        .zip(columns)
        .map(|(field, column)| build_array(column, field))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RecordBatch::try_new(schema, arrays)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{arrow_field, arrow_schema};
    use arrow::array::AsArray;
    use arrow::datatypes::Int64Type;
    use colgen_core::{ColumnSpec, DataType};

    fn int_column(name: &str, values: Vec<Option<i64>>, repeat: usize) -> GeneratedColumn {
        GeneratedColumn::new(name, repeat, ColumnData::Int64(values))
    }

    #[test]
    fn test_leaf_arrays() {
        let column = GeneratedColumn::new(
            "s",
            1,
            ColumnData::Utf8(vec![Some("ab".into()), None, Some("c".into())]),
        );
        let field = Field::new("s", ArrowDataType::Utf8, true);
        let array = build_array(&column, &field).unwrap();

        let strings = array.as_string::<i32>();
        assert_eq!(strings.len(), 3);
        assert_eq!(strings.value(0), "ab");
        assert!(strings.is_null(1));
        assert_eq!(strings.value(2), "c");
    }

    #[test]
    fn test_dtype_mismatch() {
        let column = int_column("a", vec![Some(1)], 1);
        let field = Field::new("a", ArrowDataType::Utf8, false);
        let err = build_array(&column, &field).unwrap_err();
        assert!(matches!(err, ParquetPopulatorError::ColumnMismatch { .. }));
    }

    #[test]
    fn test_repeated_rows_become_lists() {
        let spec = ColumnSpec::builder("a", DataType::Integer)
            .repeat_count(3)
            .null_count(1)
            .build()
            .unwrap();
        let column = int_column("a", vec![Some(7), None, Some(9)], 3);
        let array = build_array(&column, &arrow_field(&spec)).unwrap();

        let list = array.as_list::<i32>();
        assert_eq!(list.len(), 3);
        assert_eq!(list.null_count(), 1);
        assert!(list.is_null(1));
        assert_eq!(list.value_length(0), 3);
        assert_eq!(list.value_length(1), 0);

        let first = list.value(0);
        assert_eq!(first.as_primitive::<Int64Type>().values().to_vec(), vec![7, 7, 7]);
        let last = list.value(2);
        assert_eq!(last.as_primitive::<Int64Type>().values().to_vec(), vec![9, 9, 9]);
    }

    #[test]
    fn test_struct_array_with_row_nulls() {
        let spec = ColumnSpec::builder("p", DataType::Struct)
            .null_count(2)
            .child(ColumnSpec::builder("x", DataType::Integer).build().unwrap())
            .build()
            .unwrap();
        let column = GeneratedColumn::new(
            "p",
            1,
            ColumnData::Struct {
                fields: vec![int_column("x", vec![Some(1), Some(2)], 1)],
                validity: vec![false, true, false, true],
            },
        );

        let array = build_array(&column, &arrow_field(&spec)).unwrap();
        let structs = array.as_struct();
        assert_eq!(structs.len(), 4);
        assert!(structs.is_null(0));
        assert!(structs.is_valid(1));
        assert!(structs.is_null(2));

        let x = structs.column(0).as_primitive::<Int64Type>();
        assert_eq!(x.len(), 4);
        assert_eq!(x.value(1), 1);
        assert_eq!(x.value(3), 2);
    }

    #[test]
    fn test_struct_child_row_count_checked() {
        let spec = ColumnSpec::builder("p", DataType::Struct)
            .null_count(1)
            .child(ColumnSpec::builder("x", DataType::Integer).build().unwrap())
            .build()
            .unwrap();
        let column = GeneratedColumn::new(
            "p",
            1,
            ColumnData::Struct {
                fields: vec![int_column("x", vec![Some(1), Some(2)], 1)],
                validity: vec![true, false],
            },
        );

        let err = build_array(&column, &arrow_field(&spec)).unwrap_err();
        assert!(matches!(err, ParquetPopulatorError::ColumnMismatch { .. }));
    }

    #[test]
    fn test_record_batch() {
        let specs = vec![
            ColumnSpec::builder("a", DataType::Integer).build().unwrap(),
            ColumnSpec::builder("b", DataType::Double).build().unwrap(),
        ];
        let columns = vec![
            int_column("a", vec![Some(1), Some(2)], 1),
            GeneratedColumn::new("b", 1, ColumnData::Float64(vec![Some(0.5), Some(1.5)])),
        ];

        let batch = record_batch(arrow_schema(&specs), &columns).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 2);

        let err = record_batch(arrow_schema(&specs), &columns[..1]).unwrap_err();
        assert!(matches!(err, ParquetPopulatorError::ColumnMismatch { .. }));
    }
}
