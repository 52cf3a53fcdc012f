// Excel file import (xlsx, xls, xlsb, ods) and export (xlsx only)
//
// Import: one sheet becomes one Table; the first non-empty row is the header.
// Export: one Table per workbook, bold header, dates with explicit formats.

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use rust_xlsxwriter::{Format, Workbook};
use stockrecon_recon::table::{CellValue, Table};

use crate::error::ReadError;

/// Read one sheet of a workbook held in memory.
///
/// `sheet = None` reads the first sheet. Returns the table and the name of
/// the sheet actually read.
pub fn import_bytes(bytes: Vec<u8>, sheet: Option<&str>) -> Result<(Table, String), ReadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| format!("Failed to open Excel file: {}", e))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(wanted) => sheet_names
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| ReadError::SheetNotFound {
                sheet: wanted.to_string(),
                available: sheet_names.clone(),
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ReadError::Invalid("Excel file contains no sheets".into()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("Failed to read sheet '{}': {}", sheet_name, e))?;

    let mut table: Option<Table> = None;
    for row in range.rows() {
        let cells: Vec<CellValue> = row.iter().map(convert_cell).collect();
        if cells.iter().all(CellValue::is_empty) {
            continue;
        }
        match table.as_mut() {
            Some(t) => t.push_row(cells),
            None => table = Some(Table::new(cells.iter().map(|c| c.to_string()).collect())),
        }
    }

    let table = table.unwrap_or_default();
    log::debug!("xlsx: sheet '{}' read, {} data row(s)", sheet_name, table.len());
    Ok((table, sheet_name))
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::text(s),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // Store error as text representation
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => date_or_datetime(dt),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .map(date_or_datetime)
            .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d").map(CellValue::Date))
            .unwrap_or_else(|_| CellValue::text(s)),
        Data::DurationIso(s) => CellValue::text(s),
    }
}

/// Midnight timestamps are plain dates.
fn date_or_datetime(dt: NaiveDateTime) -> CellValue {
    if dt.time() == chrono::NaiveTime::MIN {
        CellValue::Date(dt.date())
    } else {
        CellValue::DateTime(dt)
    }
}

/// Write `table` as the only sheet of a new workbook.
pub fn export(table: &Table, sheet_name: &str, path: &Path) -> Result<(), String> {
    let mut workbook = Workbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(sheet_name)
        .map_err(|e| format!("Failed to create sheet '{}': {}", sheet_name, e))?;

    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let datetime_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

    for (col, header) in table.headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, header, &header_format)
            .map_err(|e| format!("Failed to write header: {}", e))?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row32 = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col16 = col as u16;
            let written = match cell {
                CellValue::Empty => continue,
                CellValue::Text(s) => worksheet.write_string(row32, col16, s).map(|_| ()),
                CellValue::Number(n) => worksheet.write_number(row32, col16, *n).map(|_| ()),
                CellValue::Bool(b) => worksheet.write_boolean(row32, col16, *b).map(|_| ()),
                CellValue::Date(d) => worksheet
                    .write_datetime_with_format(row32, col16, d, &date_format)
                    .map(|_| ()),
                CellValue::DateTime(dt) => worksheet
                    .write_datetime_with_format(row32, col16, dt, &datetime_format)
                    .map(|_| ()),
            };
            written.map_err(|e| format!("Failed to write cell ({}, {}): {}", row32, col, e))?;
        }
    }

    worksheet.autofit();

    workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))?;
    Ok(())
}
