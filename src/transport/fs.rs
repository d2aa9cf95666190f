use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::dataset::{Dataset, DatasetBuilder, strip_line_ending};
use crate::errors::PrepareError;
use crate::types::RawLine;

/// Open a newline-delimited JSON file for streaming.
pub fn open_jsonl(path: &Path) -> Result<BufReader<File>, PrepareError> {
    Ok(BufReader::new(File::open(path)?))
}

/// Read every line of a newline-delimited JSON file.
///
/// Lines are returned undecoded; UTF-8 checks, parsing and skipping happen
/// in the builder.
pub fn read_jsonl_lines(path: &Path) -> Result<Vec<RawLine>, PrepareError> {
    let reader = open_jsonl(path)?;
    let mut lines = Vec::new();
    for line in reader.split(b'\n') {
        lines.push(strip_line_ending(line?));
    }
    Ok(lines)
}

/// Stream a JSONL file into `builder` without buffering the whole file.
pub fn ingest_jsonl_file(builder: &mut DatasetBuilder, path: &Path) -> Result<(), PrepareError> {
    builder.ingest_reader(open_jsonl(path)?)
}

/// Write the dataset as CSV (header row, no index column) to any writer.
pub fn write_csv_to<W: Write>(writer: W, dataset: &Dataset) -> Result<(), PrepareError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(dataset.columns())?;
    for row in dataset.rows() {
        csv_writer.write_record(row.to_row())?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the dataset as a CSV file, creating parent directories when needed.
pub fn write_csv(path: &Path, dataset: &Dataset) -> Result<(), PrepareError> {
    ensure_parent_dir(path)?;
    write_csv_to(BufWriter::new(File::create(path)?), dataset)?;
    info!(path = %path.display(), rows = dataset.len(), "wrote csv dataset");
    Ok(())
}

/// Write one JSON object per row (keys in column order, `Seniority` last).
pub fn write_jsonl_to<W: Write>(mut writer: W, dataset: &Dataset) -> Result<(), PrepareError> {
    for row in dataset.rows() {
        serde_json::to_writer(&mut writer, row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the dataset as a JSONL file, creating parent directories when needed.
pub fn write_jsonl(path: &Path, dataset: &Dataset) -> Result<(), PrepareError> {
    ensure_parent_dir(path)?;
    write_jsonl_to(BufWriter::new(File::create(path)?), dataset)?;
    info!(path = %path.display(), rows = dataset.len(), "wrote jsonl dataset");
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<(), PrepareError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
