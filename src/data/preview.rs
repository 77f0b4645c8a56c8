use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;

use super::columnar::to_record_batch;
use super::model::Dataset;

/// Render the first `rows` rows as a boxed text table.
pub fn head(dataset: &Dataset, rows: usize) -> Result<String> {
    let shown = Dataset {
        columns: dataset.columns.clone(),
        samples: dataset.samples.iter().take(rows).cloned().collect(),
    };
    let batch = to_record_batch(&shown)?;
    let table = pretty_format_batches(&[batch]).context("formatting preview table")?;
    Ok(table.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Sample};

    #[test]
    fn shows_only_requested_rows() {
        let ds = Dataset::new(
            vec!["plot".into()],
            (0..10)
                .map(|i| Sample::new(vec![CellValue::String(format!("p{i}"))]))
                .collect(),
        );
        let text = head(&ds, 3).unwrap();
        assert!(text.contains("plot"));
        assert!(text.contains("p2"));
        assert!(!text.contains("p3"));
    }
}
