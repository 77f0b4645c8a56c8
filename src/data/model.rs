use std::fmt;

use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a CSV/Parquet column can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Verbatim text of a delimited-file cell. Interpreted on demand and
    /// written back exactly as read.
    Raw(String),
    Null,
}

impl CellValue {
    /// Interpret the value as an `f64` if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Raw(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// `Null`, or raw text that is blank.
    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Raw(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Best typed reading of a text cell.
    pub fn parse_text(s: &str) -> CellValue {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }

    /// Typed view of the cell; `Raw` text is parsed, everything else is cloned.
    pub fn interpret(&self) -> CellValue {
        match self {
            CellValue::Raw(s) => CellValue::parse_text(s),
            other => other.clone(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

/// Text form used by the CSV writer and for error messages.
///
/// Floats use the shortest round-trip representation but always keep a
/// fractional part, so `0.0` does not collapse into an integer-looking `0`.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) | CellValue::Raw(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => fmt_float(*v, f),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

fn fmt_float(v: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if v.is_nan() {
        return write!(f, "NaN");
    }
    if v.is_infinite() {
        return write!(f, "{}", if v > 0.0 { "inf" } else { "-inf" });
    }
    let text = v.to_string();
    if text.contains(['.', 'e', 'E']) {
        write!(f, "{text}")
    } else {
        write!(f, "{text}.0")
    }
}

// ---------------------------------------------------------------------------
// Sample – one row of the table
// ---------------------------------------------------------------------------

/// One measurement row. `cells[i]` belongs to `Dataset::columns[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub cells: Vec<CellValue>,
}

static NULL_CELL: CellValue = CellValue::Null;

impl Sample {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Sample { cells }
    }

    pub fn get(&self, idx: usize) -> &CellValue {
        self.cells.get(idx).unwrap_or(&NULL_CELL)
    }
}

// ---------------------------------------------------------------------------
// Dataset – ordered columns and ordered rows
// ---------------------------------------------------------------------------

/// The full table. Column order and row order are preserved from load to write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Column names in file order; derived columns are appended.
    pub columns: Vec<String>,
    /// Rows in load order.
    pub samples: Vec<Sample>,
}

impl Dataset {
    /// Build a dataset, padding short rows with `Null` so every row spans every column.
    pub fn new(columns: Vec<String>, mut samples: Vec<Sample>) -> Self {
        let width = columns.len();
        for sample in &mut samples {
            sample.cells.resize(width, CellValue::Null);
        }
        Dataset { columns, samples }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Position of `name` in the schema.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| PipelineError::MissingField {
                field: name.to_string(),
            })
    }

    /// Every cell of column `name` as an `f64`, in row order.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self.column_index(name)?;
        self.samples
            .iter()
            .enumerate()
            .map(|(row, sample)| match sample.get(idx) {
                cell if cell.is_null() => Err(PipelineError::MissingValue {
                    field: name.to_string(),
                    row,
                }),
                cell => cell.as_f64().ok_or_else(|| PipelineError::NonNumericValue {
                    field: name.to_string(),
                    row,
                    value: cell.to_string(),
                }),
            })
            .collect()
    }

    /// Overwrite column `name` if present, otherwise append it to the schema.
    pub fn set_column(&mut self, name: &str, values: Vec<CellValue>) -> Result<()> {
        if values.len() != self.samples.len() {
            return Err(PipelineError::LengthMismatch {
                column: name.to_string(),
                expected: self.samples.len(),
                actual: values.len(),
            });
        }

        match self.columns.iter().position(|c| c == name) {
            Some(idx) => {
                for (sample, value) in self.samples.iter_mut().zip(values) {
                    sample.cells[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (sample, value) in self.samples.iter_mut().zip(values) {
                    sample.cells.push(value);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Dataset {
        Dataset::new(
            vec!["site".into(), "pollutant_concentration_initial".into()],
            vec![
                Sample::new(vec![CellValue::String("A".into()), CellValue::Integer(100)]),
                Sample::new(vec![CellValue::String("B".into()), CellValue::Float(50.5)]),
            ],
        )
    }

    #[test]
    fn float_display_keeps_fraction() {
        assert_eq!(CellValue::Float(0.0).to_string(), "0.0");
        assert_eq!(CellValue::Float(0.4).to_string(), "0.4");
        assert_eq!(CellValue::Float(-3.0).to_string(), "-3.0");
        assert_eq!(CellValue::Float(f64::NAN).to_string(), "NaN");
        assert_eq!(CellValue::Float(f64::NEG_INFINITY).to_string(), "-inf");
        assert_eq!(CellValue::Integer(7).to_string(), "7");
        assert_eq!(CellValue::Null.to_string(), "");
    }

    #[test]
    fn numeric_column_widens_integers() {
        let ds = small();
        let col = ds.numeric_column("pollutant_concentration_initial").unwrap();
        assert_eq!(col, vec![100.0, 50.5]);
    }

    #[test]
    fn numeric_column_reports_offending_row() {
        let ds = small();
        let err = ds.numeric_column("site").unwrap_err();
        assert_eq!(
            err,
            PipelineError::NonNumericValue {
                field: "site".into(),
                row: 0,
                value: "A".into(),
            }
        );
    }

    #[test]
    fn missing_column_is_named() {
        let ds = small();
        let err = ds.numeric_column("soil_moisture_pct").unwrap_err();
        assert_eq!(
            err,
            PipelineError::MissingField {
                field: "soil_moisture_pct".into()
            }
        );
    }

    #[test]
    fn parses_text_cells() {
        assert_eq!(CellValue::parse_text("100"), CellValue::Integer(100));
        assert_eq!(CellValue::parse_text(" 12.5 "), CellValue::Float(12.5));
        assert_eq!(CellValue::parse_text("true"), CellValue::Bool(true));
        assert_eq!(CellValue::parse_text(""), CellValue::Null);
        assert_eq!(CellValue::parse_text("plot-3"), CellValue::String("plot-3".into()));
        assert!(matches!(CellValue::parse_text("NaN"), CellValue::Float(v) if v.is_nan()));
    }

    #[test]
    fn raw_cells_keep_their_text() {
        for text in ["007", "1.50", "1e3", "12345678901234567891", " padded "] {
            assert_eq!(CellValue::Raw(text.into()).to_string(), text);
        }
        assert_eq!(CellValue::Raw("1.50".into()).as_f64(), Some(1.5));
        assert_eq!(CellValue::Raw("007".into()).interpret(), CellValue::Integer(7));
    }

    #[test]
    fn blank_raw_cell_is_missing_value() {
        let ds = Dataset::new(
            vec!["x".into()],
            vec![Sample::new(vec![CellValue::Raw("  ".into())])],
        );
        assert_eq!(
            ds.numeric_column("x").unwrap_err(),
            PipelineError::MissingValue {
                field: "x".into(),
                row: 0
            }
        );
    }

    #[test]
    fn null_cell_is_missing_value() {
        let ds = Dataset::new(
            vec!["x".into()],
            vec![Sample::new(vec![CellValue::Float(1.0)]), Sample::new(vec![])],
        );
        assert_eq!(
            ds.numeric_column("x").unwrap_err(),
            PipelineError::MissingValue {
                field: "x".into(),
                row: 1
            }
        );
    }

    #[test]
    fn set_column_appends_then_replaces() {
        let mut ds = small();
        ds.set_column("rate", vec![1.0.into(), 2.0.into()]).unwrap();
        assert_eq!(ds.columns.len(), 3);
        ds.set_column("rate", vec![3.0.into(), 4.0.into()]).unwrap();
        assert_eq!(ds.columns.len(), 3);
        assert_eq!(ds.samples[1].cells[2], CellValue::Float(4.0));
    }

    #[test]
    fn set_column_rejects_wrong_length() {
        let mut ds = small();
        let err = ds.set_column("rate", vec![1.0.into()]).unwrap_err();
        assert!(matches!(err, PipelineError::LengthMismatch { expected: 2, actual: 1, .. }));
    }
}
