//! Extension-based dispatch and input fingerprinting.

use std::path::Path;

use stockrecon_recon::table::Table;

use crate::error::ReadError;

/// A table read from disk, with the identity of the bytes it came from.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Table,
    /// Sheet read, for workbook inputs.
    pub sheet: Option<String>,
    /// BLAKE3 of the raw file bytes, hex.
    pub blake3: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Workbook,
    Delimited(Option<u8>),
}

fn file_kind(path: &Path) -> FileKind {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "csv" | "txt" => FileKind::Delimited(None),
        "tsv" => FileKind::Delimited(Some(b'\t')),
        _ => FileKind::Workbook,
    }
}

/// Read one table from `path`. Workbooks (`.xlsx`, `.xls`, `.xlsb`, `.ods`)
/// read `sheet`, or the first sheet if `None`; delimited files ignore it.
/// A named sheet the workbook lacks is [`ReadError::SheetNotFound`].
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<LoadedTable, ReadError> {
    let bytes = std::fs::read(path).map_err(|e| ReadError::Invalid(format!("{}: {}", path.display(), e)))?;
    let blake3 = blake3::hash(&bytes).to_hex().to_string();

    let (table, sheet) = match file_kind(path) {
        FileKind::Delimited(delimiter) => {
            let table = crate::csv::import_bytes(&bytes, delimiter)
                .map_err(|e| ReadError::from(e).in_file(path))?;
            (table, None)
        }
        FileKind::Workbook => {
            let (table, name) = crate::xlsx::import_bytes(bytes, sheet).map_err(|e| e.in_file(path))?;
            (table, Some(name))
        }
    };

    log::info!(
        "read {} ({} rows, blake3 {})",
        path.display(),
        table.len(),
        &blake3[..12]
    );

    Ok(LoadedTable { table, sheet, blake3 })
}

/// Write `table` to `path`: CSV for `.csv`, otherwise a single-sheet xlsx
/// named `sheet`.
pub fn write_table(path: &Path, sheet: &str, table: &Table) -> Result<(), String> {
    match file_kind(path) {
        FileKind::Delimited(_) => crate::csv::export(table, path),
        FileKind::Workbook => crate::xlsx::export(table, sheet, path),
    }
}
