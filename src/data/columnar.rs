use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use super::model::{CellValue, Dataset};

/// Arrow type a column is stored as when the table leaves the row model.
fn infer_type(cells: &[CellValue]) -> DataType {
    let mut has_int = false;
    let mut has_float = false;
    let mut has_bool = false;
    let mut has_text = false;
    for cell in cells {
        match cell {
            CellValue::Integer(_) => has_int = true,
            CellValue::Float(_) => has_float = true,
            CellValue::Bool(_) => has_bool = true,
            CellValue::String(_) | CellValue::Raw(_) => has_text = true,
            CellValue::Null => {}
        }
    }
    match (has_int, has_float, has_bool, has_text) {
        (true, false, false, false) => DataType::Int64,
        (_, true, false, false) => DataType::Float64,
        (false, false, true, false) => DataType::Boolean,
        _ => DataType::Utf8,
    }
}

fn build_array(cells: &[CellValue], data_type: &DataType) -> ArrayRef {
    match data_type {
        DataType::Int64 => Arc::new(Int64Array::from_iter(cells.iter().map(|c| match c {
            CellValue::Integer(i) => Some(*i),
            _ => None,
        }))),
        DataType::Float64 => Arc::new(Float64Array::from_iter(cells.iter().map(|c| c.as_f64()))),
        DataType::Boolean => Arc::new(BooleanArray::from_iter(cells.iter().map(|c| match c {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }))),
        _ => Arc::new(StringArray::from_iter(cells.iter().map(|c| {
            if c.is_null() { None } else { Some(c.to_string()) }
        }))),
    }
}

/// Convert the table to a single Arrow record batch, one typed column per field.
///
/// Raw text cells are typed here, so a CSV column of numbers becomes numeric.
pub fn to_record_batch(dataset: &Dataset) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(dataset.columns.len());
    let mut arrays = Vec::with_capacity(dataset.columns.len());

    for (idx, name) in dataset.columns.iter().enumerate() {
        let cells: Vec<CellValue> = dataset
            .samples
            .iter()
            .map(|s| s.get(idx).interpret())
            .collect();
        let data_type = infer_type(&cells);
        arrays.push(build_array(&cells, &data_type));
        fields.push(Field::new(name, data_type, true));
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
        .context("building Arrow record batch")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Sample;
    use arrow::array::Array;

    #[test]
    fn infers_column_types() {
        let ds = Dataset::new(
            vec!["id".into(), "conc".into(), "plot".into(), "flag".into()],
            vec![
                Sample::new(vec![
                    CellValue::Integer(1),
                    CellValue::Integer(100),
                    CellValue::String("A".into()),
                    CellValue::Bool(true),
                ]),
                Sample::new(vec![
                    CellValue::Integer(2),
                    CellValue::Float(60.5),
                    CellValue::Null,
                    CellValue::Null,
                ]),
            ],
        );
        let batch = to_record_batch(&ds).unwrap();
        let schema = batch.schema();
        assert_eq!(schema.field(0).data_type(), &DataType::Int64);
        assert_eq!(schema.field(1).data_type(), &DataType::Float64);
        assert_eq!(schema.field(2).data_type(), &DataType::Utf8);
        assert_eq!(schema.field(3).data_type(), &DataType::Boolean);
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.column(2).null_count(), 1);
    }

    #[test]
    fn raw_text_columns_are_typed() {
        let ds = Dataset::new(
            vec!["conc".into(), "plot".into()],
            vec![
                Sample::new(vec![CellValue::Raw("100".into()), CellValue::Raw("A".into())]),
                Sample::new(vec![CellValue::Raw("60.5".into()), CellValue::Raw("".into())]),
            ],
        );
        let batch = to_record_batch(&ds).unwrap();
        assert_eq!(batch.schema().field(0).data_type(), &DataType::Float64);
        assert_eq!(batch.schema().field(1).data_type(), &DataType::Utf8);
        assert_eq!(batch.column(1).null_count(), 1);
    }
}
