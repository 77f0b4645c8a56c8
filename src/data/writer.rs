use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use parquet::arrow::ArrowWriter;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::columnar::to_record_batch;
use super::loader::extension_of;
use super::model::{CellValue, Dataset, Sample};
use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write the table to `path`, choosing the format from the extension
/// (`.csv`, `.json`, `.parquet`).
///
/// The parent directory is created if needed. Output goes to a temporary file
/// next to the destination and is renamed into place only after it has been
/// written completely, so an existing file is either replaced whole or left alone.
pub fn write_file(dataset: &Dataset, path: &Path) -> Result<()> {
    let ext = extension_of(path);
    if !matches!(ext.as_str(), "csv" | "json" | "parquet" | "pq") {
        return Err(PipelineError::UnsupportedFormat(ext).into());
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .with_context(|| format!("creating output directory {}", parent.display()))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".soil-breakdown-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .context("creating temporary output file")?;

    match ext.as_str() {
        "csv" => write_csv(dataset, tmp.as_file_mut())?,
        "json" => write_json(dataset, tmp.as_file_mut())?,
        _ => write_parquet(dataset, tmp.as_file_mut())?,
    }

    tmp.persist(path)
        .with_context(|| format!("moving output into place at {}", path.display()))?;
    log::info!("wrote {} rows to {}", dataset.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV writer
// ---------------------------------------------------------------------------

fn write_csv(dataset: &Dataset, file: &mut File) -> Result<()> {
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));
    writer
        .write_record(&dataset.columns)
        .context("writing CSV header")?;
    for (row_no, sample) in dataset.samples.iter().enumerate() {
        writer
            .write_record(sample.cells.iter().map(|c| c.to_string()))
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON writer
// ---------------------------------------------------------------------------

/// Records-oriented, keys in column order. Non-finite floats become `null`.
fn write_json(dataset: &Dataset, file: &mut File) -> Result<()> {
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, &Records(dataset)).context("serializing JSON")?;
    out.write_all(b"\n")?;
    out.flush().context("flushing JSON output")?;
    Ok(())
}

struct Records<'a>(&'a Dataset);

struct Record<'a> {
    columns: &'a [String],
    sample: &'a Sample,
}

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for sample in &self.0.samples {
            seq.serialize_element(&Record {
                columns: &self.0.columns,
                sample,
            })?;
        }
        seq.end()
    }
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (idx, col) in self.columns.iter().enumerate() {
            map.serialize_entry(col, self.sample.get(idx))?;
        }
        map.end()
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CellValue::String(s) => serializer.serialize_str(s),
            CellValue::Integer(i) => serializer.serialize_i64(*i),
            CellValue::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            CellValue::Float(_) | CellValue::Null => serializer.serialize_none(),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Raw(_) => self.interpret().serialize(serializer),
        }
    }
}

// ---------------------------------------------------------------------------
// Parquet writer
// ---------------------------------------------------------------------------

fn write_parquet(dataset: &Dataset, file: &mut File) -> Result<()> {
    let batch = to_record_batch(dataset)?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
