// ============================================================
// ROW READER / WRITER
// ============================================================
// Whole-file reads with encoding fallback, incremental row writes

use std::fs;
use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::domain::error::{AppError, Result};
use crate::domain::{Dialect, ProductRow};

use super::dialect::sniff_dialect;

// Bytes of content used for dialect sniffing
const SNIFF_SAMPLE_LEN: usize = 4096;

/// A parsed input file: every record (header included) plus the
/// dialect it was read with
pub struct CsvTable {
    pub dialect: Dialect,
    pub rows: Vec<ProductRow>,
}

/// Read a whole CSV file, sniffing its dialect from a leading sample.
///
/// Rows keep their original, possibly ragged lengths; padding happens
/// at the point of mutation.
pub fn read_table(path: &Path) -> Result<CsvTable> {
    let content = read_with_encoding_fallback(path)?;

    let sample_end = floor_char_boundary(&content, SNIFF_SAMPLE_LEN);
    let dialect = sniff_dialect(&content[..sample_end]);

    let mut reader = ReaderBuilder::new()
        .delimiter(dialect.delimiter)
        .quote(dialect.quote)
        .flexible(true)
        .has_headers(false)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
        })?;
        rows.push(ProductRow::new(
            record.iter().map(str::to_string).collect(),
        ));
    }

    Ok(CsvTable { dialect, rows })
}

/// Read a file as UTF-8, decoding as Windows-1252 when it is not valid
/// UTF-8 (common in spreadsheet exports)
fn read_with_encoding_fallback(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .map_err(|e| AppError::IoError(format!("Failed to read {}: {}", path.display(), e)))?;

    match String::from_utf8(bytes) {
        Ok(content) => Ok(content),
        Err(err) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(err.as_bytes());
            Ok(decoded.into_owned())
        }
    }
}

fn floor_char_boundary(content: &str, index: usize) -> usize {
    if index >= content.len() {
        return content.len();
    }
    let mut index = index;
    while !content.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Incremental row writer; every row is flushed so a mid-run stop
/// leaves a valid, truncated output file
pub struct RowWriter {
    writer: csv::Writer<File>,
}

impl RowWriter {
    pub fn create(path: &Path, dialect: Dialect) -> Result<Self> {
        let writer = WriterBuilder::new()
            .delimiter(dialect.delimiter)
            .quote(dialect.quote)
            .from_path(path)
            .map_err(|e| {
                AppError::IoError(format!("Failed to create {}: {}", path.display(), e))
            })?;
        Ok(Self { writer })
    }

    pub fn write(&mut self, row: &ProductRow) -> Result<()> {
        self.writer
            .write_record(row.fields())
            .map_err(|e| AppError::IoError(format!("Failed to write row: {}", e)))?;
        self.writer
            .flush()
            .map_err(|e| AppError::IoError(format!("Failed to flush output: {}", e)))?;
        Ok(())
    }
}
