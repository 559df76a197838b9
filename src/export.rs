use std::io::Write;
use std::path::Path;

use thiserror::Error;

use crate::data::model::{cell, RosterTable};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("writing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("writing workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Write the table as UTF-8 comma-separated text: one header row in the
/// table's column order, then one line per row. Null cells become empty
/// fields.
pub fn write_csv<W: Write>(table: &RosterTable, writer: W) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&table.column_names)?;
    for record in &table.records {
        out.write_record(
            table
                .column_names
                .iter()
                .map(|col| cell(record, col).to_string()),
        )?;
    }
    out.flush()?;
    Ok(())
}

/// [`write_csv`] into an in-memory string, for download-style handoff.
pub fn to_csv_string(table: &RosterTable) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    // csv::Writer emits valid UTF-8 for string input.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

// ---------------------------------------------------------------------------
// Workbook export
// ---------------------------------------------------------------------------

/// Write the table as a single-sheet xlsx workbook with the same columns as
/// the (filtered) table.
pub fn write_workbook(
    table: &RosterTable,
    path: &Path,
    sheet_name: &str,
) -> Result<(), ExportError> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, name) in table.column_names.iter().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }
    for (row, record) in table.records.iter().enumerate() {
        for (col, name) in table.column_names.iter().enumerate() {
            let text = cell(record, name).to_string();
            if !text.is_empty() {
                worksheet.write_string(row as u32 + 1, col as u16, &text)?;
            }
        }
    }

    workbook.save(path)?;
    log::info!(
        "exported {} rows to {} ('{}')",
        table.len(),
        path.display(),
        sheet_name
    );
    Ok(())
}
