//! Typed table to Arrow conversion

use crate::error::Result;
use crate::schema::ColumnType;
use crate::types::{TypedColumn, TypedTable, TypedValue};
use arrow::array::{ArrayRef, Float64Array, StringArray, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::sync::Arc;

/// Arrow schema for a typed table; every field is nullable
pub fn arrow_schema(table: &TypedTable) -> Schema {
    let fields: Vec<Field> = table
        .columns()
        .iter()
        .map(|c| Field::new(&c.name, data_type(c.column_type), true))
        .collect();
    Schema::new(fields)
}

/// Convert a typed table into a single RecordBatch
pub fn to_record_batch(table: &TypedTable) -> Result<RecordBatch> {
    let schema = Arc::new(arrow_schema(table));
    let arrays: Vec<ArrayRef> = table.columns().iter().map(build_array).collect();
    let options = RecordBatchOptions::new().with_row_count(Some(table.num_rows()));

    Ok(RecordBatch::try_new_with_options(schema, arrays, &options)?)
}

fn data_type(column_type: ColumnType) -> DataType {
    match column_type {
        ColumnType::Numeric => DataType::Float64,
        ColumnType::Date => DataType::Timestamp(TimeUnit::Millisecond, None),
        ColumnType::String => DataType::Utf8,
    }
}

fn build_array(column: &TypedColumn) -> ArrayRef {
    match column.column_type {
        ColumnType::Numeric => {
            let arr: Float64Array = column
                .values
                .iter()
                .map(|v| match v {
                    TypedValue::Number(n) => Some(*n),
                    _ => None,
                })
                .collect();
            Arc::new(arr)
        }
        ColumnType::Date => {
            let arr: TimestampMillisecondArray = column
                .values
                .iter()
                .map(|v| match v {
                    TypedValue::Date(d) => Some(d.and_utc().timestamp_millis()),
                    _ => None,
                })
                .collect();
            Arc::new(arr)
        }
        ColumnType::String => {
            let arr: StringArray = column
                .values
                .iter()
                .map(|v| match v {
                    TypedValue::Text(s) => Some(s.as_str()),
                    _ => None,
                })
                .collect();
            Arc::new(arr)
        }
    }
}
