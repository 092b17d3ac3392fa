//! Arrow schema and single-row request batches for the prediction pipeline.
//!
//! The external encoder is schema-sensitive: a renamed or reordered column
//! is a hard failure, not a silent degradation. [`request_schema`] is the
//! only place the column list is spelled out.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, LargeStringArray, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crate::features::StudentFeatures;

/// Column names in the order the pipeline expects them.
pub const COLUMNS: [&str; 7] = [
    "gender",
    "race_ethnicity",
    "parental_level_of_education",
    "lunch",
    "test_preparation_course",
    "reading_score",
    "writing_score",
];

/// Schema for a prediction request row.
pub fn request_schema() -> Schema {
    Schema::new(vec![
        Field::new("gender", DataType::Utf8, false),
        Field::new("race_ethnicity", DataType::Utf8, false),
        Field::new("parental_level_of_education", DataType::Utf8, false),
        Field::new("lunch", DataType::Utf8, false),
        Field::new("test_preparation_course", DataType::Utf8, false),
        Field::new("reading_score", DataType::Float64, false),
        Field::new("writing_score", DataType::Float64, false),
    ])
}

/// Build the single-row request batch for a set of normalized features.
pub fn build_request(features: &StudentFeatures) -> Result<RecordBatch, ArrowError> {
    let schema: SchemaRef = Arc::new(request_schema());
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec![features.gender])),
        Arc::new(StringArray::from(vec![features.race_ethnicity])),
        Arc::new(StringArray::from(vec![features.parental_level_of_education])),
        Arc::new(StringArray::from(vec![features.lunch])),
        Arc::new(StringArray::from(vec![features.test_preparation_course])),
        Arc::new(Float64Array::from(vec![features.reading_score])),
        Arc::new(Float64Array::from(vec![features.writing_score])),
    ];
    RecordBatch::try_new(schema, columns)
}

/// A single cell of a request row, for transports that need plain values.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n:.1}"),
        }
    }
}

/// Read one row back out of a batch as `(column, value)` pairs in schema order.
///
/// Handles `Utf8`, `LargeUtf8` and `Float64` columns; anything else is an
/// error since the request schema never produces it.
pub fn row_values(batch: &RecordBatch, row: usize) -> Result<Vec<(String, CellValue)>, ArrowError> {
    if row >= batch.num_rows() {
        return Err(ArrowError::InvalidArgumentError(format!(
            "row {row} out of bounds for batch of {} rows",
            batch.num_rows()
        )));
    }

    let schema = batch.schema();
    let mut out = Vec::with_capacity(batch.num_columns());
    for (field, col) in schema.fields().iter().zip(batch.columns()) {
        let value = cell(col.as_ref(), row).ok_or_else(|| {
            ArrowError::InvalidArgumentError(format!(
                "column {} has unsupported type {} or a null at row {row}",
                field.name(),
                field.data_type()
            ))
        })?;
        out.push((field.name().clone(), value));
    }
    Ok(out)
}

fn cell(col: &dyn Array, row: usize) -> Option<CellValue> {
    if col.is_null(row) {
        return None;
    }
    if let Some(arr) = col.as_any().downcast_ref::<StringArray>() {
        return Some(CellValue::Text(arr.value(row).to_string()));
    }
    if let Some(arr) = col.as_any().downcast_ref::<LargeStringArray>() {
        return Some(CellValue::Text(arr.value(row).to_string()));
    }
    col.as_any()
        .downcast_ref::<Float64Array>()
        .map(|arr| CellValue::Number(arr.value(row)))
}
