//! Sheet parsers for exported audit data: CSV text and XLSX workbooks.

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use csv::ReaderBuilder;
use std::io::Cursor;
use tracing::debug;

use crate::ingest::row::{CellValue, RawRow};

/// ZIP local file header, the start of every XLSX workbook.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

fn typed_cell(raw: &str) -> Option<CellValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Some(CellValue::Bool(true));
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Some(CellValue::Bool(false));
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(CellValue::Number(n)),
        _ => Some(CellValue::Text(raw.to_string())),
    }
}

/// Converts a workbook cell. Date-formatted cells become native dates,
/// durations stay numeric, and empty or error cells are dropped.
fn workbook_cell(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::Int(n) => Some(CellValue::Number(*n as f64)),
        Data::Float(n) => Some(CellValue::Number(*n)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            (!s.trim().is_empty()).then(|| CellValue::Text(s.clone()))
        }
        Data::DateTime(dt) if dt.is_datetime() => dt
            .as_datetime()
            .map(|naive| CellValue::Date(naive.and_utc()))
            .or(Some(CellValue::Number(dt.as_f64()))),
        Data::DateTime(dt) => Some(CellValue::Number(dt.as_f64())),
    }
}

/// Decodes sheet bytes: XLSX workbooks by their ZIP signature, CSV otherwise.
///
/// # Errors
///
/// Returns an error for unreadable workbooks, non-UTF-8 CSV, or malformed CSV.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<RawRow>> {
    if bytes.starts_with(ZIP_MAGIC) {
        parse_workbook(bytes)
    } else {
        parse_csv(bytes)
    }
}

/// Reads the first worksheet of an XLSX workbook, header row first.
///
/// # Errors
///
/// Returns an error when the workbook cannot be opened or has no worksheet.
pub fn parse_workbook(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let mut workbook: Xlsx<_> =
        open_workbook_from_rs(Cursor::new(bytes)).context("failed to open XLSX workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("failed to read the first worksheet")?;

    let mut lines = range.rows();
    let Some(header_cells) = lines.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_cells
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for line in lines {
        let row: RawRow = headers
            .iter()
            .zip(line)
            .filter(|(header, _)| !header.is_empty())
            .filter_map(|(header, cell)| workbook_cell(cell).map(|c| (header.clone(), c)))
            .collect();
        if !row.is_empty() {
            rows.push(row);
        }
    }

    debug!(rows = rows.len(), columns = headers.len(), "Workbook parsed");
    Ok(rows)
}

/// Decodes CSV bytes into raw rows keyed by the header line.
///
/// Empty cells are left out of the row, and rows with no cells at all are
/// skipped. Numeric cells become [`CellValue::Number`].
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = rdr
        .headers()
        .context("failed to read the header row")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("malformed CSV record {}", line + 1))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !header.is_empty())
            .filter_map(|(header, raw)| typed_cell(raw).map(|cell| (header.clone(), cell)))
            .collect();
        if !row.is_empty() {
            rows.push(row);
        }
    }

    debug!(rows = rows.len(), columns = headers.len(), "CSV parsed");
    Ok(rows)
}
