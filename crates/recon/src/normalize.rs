//! Key normalization and typed parsing of raw cells.
//!
//! Every key comparison in the engine (shop names, shop codes, serials,
//! CMDB ids) goes through [`normalize_key`], so both sides of a join or set
//! difference are folded the same way.

use chrono::{NaiveDate, NaiveDateTime};

use crate::table::CellValue;

/// Width of a normalized shop code.
pub const SHOP_CODE_WIDTH: usize = 5;

// Slash dates are tried month-first; day-first only when that fails
// (`22/07/2025`), so `05/07/2025` is 7 May.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M",
];

/// Trim + case-fold.
pub fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Trimmed, non-empty display string of a cell.
pub fn cell_string(cell: &CellValue) -> Option<String> {
    cell.as_string()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Zero-pad a shop code to [`SHOP_CODE_WIDTH`] characters. Numeric and text
/// sources compare equal afterwards (`4134` and `"04134"` both give `"04134"`).
/// Longer codes are left as-is.
pub fn pad_shop_code(cell: &CellValue) -> Option<String> {
    let code = cell_string(cell)?;
    if code.len() >= SHOP_CODE_WIDTH {
        return Some(code);
    }
    Some(format!("{code:0>width$}", width = SHOP_CODE_WIDTH))
}

/// Y/N style flag. Anything not recognized as "yes" is false.
pub fn parse_flag(cell: &CellValue) -> bool {
    match cell {
        CellValue::Bool(b) => *b,
        CellValue::Number(n) => *n == 1.0,
        CellValue::Text(s) => matches!(
            s.trim().to_ascii_uppercase().as_str(),
            "Y" | "YES" | "TRUE" | "1"
        ),
        _ => false,
    }
}

/// Integral quantity. Fractional numbers and non-numeric text are null.
pub fn parse_quantity(cell: &CellValue) -> Option<i64> {
    match cell {
        CellValue::Number(n) if n.fract() == 0.0 => Some(*n as i64),
        CellValue::Text(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|n| n.fract() == 0.0)
                    .map(|n| n as i64)
            })
        }
        _ => None,
    }
}

/// Calendar date of a cell. Placeholders such as `TBC` are `None`.
pub fn parse_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(d) => Some(*d),
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Text(s) => {
            let s = s.trim();
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .or_else(|| parse_datetime_str(s).map(|dt| dt.date()))
        }
        _ => None,
    }
}

/// Timestamp of a cell. Plain dates are taken at midnight.
pub fn parse_datetime(cell: &CellValue) -> Option<NaiveDateTime> {
    match cell {
        CellValue::DateTime(dt) => Some(*dt),
        CellValue::Date(d) => d.and_hms_opt(0, 0, 0),
        CellValue::Text(s) => {
            let s = s.trim();
            parse_datetime_str(s).or_else(|| {
                DATE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
        }
        _ => None,
    }
}

fn parse_datetime_str(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

pub fn contains_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}
