use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use thiserror::Error;

use super::model::{CellValue, Record, RosterTable};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a roster resource could not be turned into a table. Callers render an
/// empty/default state on any of these; nothing here should crash a session.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("worksheet '{name}' missing or unreadable: {source}")]
    Sheet {
        name: String,
        #[source]
        source: calamine::Error,
    },
    #[error("worksheet '{name}' has no header row")]
    EmptySheet { name: String },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a roster table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – one named worksheet
/// * `.csv`  – header row + data rows (`sheet` is ignored)
///
/// The file handle is opened, parsed, and released within this call.
pub fn load_file(path: &Path, sheet: &str) -> Result<RosterTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path, sheet)?,
        "csv" => load_csv(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    log::info!(
        "loaded {} rows, {} columns from {}",
        table.len(),
        table.column_names.len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

/// Read one named worksheet. The first row is the header; blank header cells
/// are skipped, and duplicate headers keep the last cell per row (map insert).
fn load_workbook(path: &Path, sheet: &str) -> Result<RosterTable, LoadError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|source| LoadError::Sheet {
            name: sheet.to_string(),
            source,
        })?;

    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| LoadError::EmptySheet {
        name: sheet.to_string(),
    })?;

    let headers: Vec<Option<String>> = header
        .iter()
        .map(|cell| {
            let name = cell.to_string().trim().to_string();
            (!name.is_empty()).then_some(name)
        })
        .collect();
    let column_names: Vec<String> = headers.iter().flatten().cloned().collect();

    let mut records = Vec::new();
    for row in rows {
        let mut record: Record = BTreeMap::new();
        for (cell, name) in row.iter().zip(&headers) {
            if let Some(name) = name {
                record.insert(name.clone(), convert_cell(cell));
            }
        }
        // Fully blank rows are padding below the data block.
        if record.values().any(|v| !v.is_null()) {
            records.push(record);
        }
    }

    Ok(RosterTable::from_records(records, column_names))
}

/// Map a spreadsheet cell into a [`CellValue`]. Whole floats become integers
/// (ids are usually stored as floats), error cells become null.
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::String(s) => from_text(s),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                CellValue::Integer(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| CellValue::Date(d.to_string()))
            .unwrap_or(CellValue::Null),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Date(s.clone()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per row. All cells
/// go through the same text sniffing as workbook string cells.
fn load_csv(path: &Path) -> Result<RosterTable, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let column_names: Vec<String> = headers.iter().filter(|h| !h.is_empty()).cloned().collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| (name.clone(), from_text(value)))
            .collect();
        if record.values().any(|v| !v.is_null()) {
            records.push(record);
        }
    }

    Ok(RosterTable::from_records(records, column_names))
}

/// Sniff a text cell: empty → null, integer/float/bool as typed, else string.
fn from_text(s: &str) -> CellValue {
    let t = s.trim();
    if t.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = t.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = t.parse::<f64>() {
        return CellValue::Float(f);
    }
    if t == "true" || t == "false" {
        return CellValue::Bool(t == "true");
    }
    CellValue::String(t.to_string())
}
