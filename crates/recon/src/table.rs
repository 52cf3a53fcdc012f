//! Untyped in-memory tables: the exchange format between the IO layer and
//! the engine, and the shape every report is projected into.

use std::collections::HashSet;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A single cell as read from (or written to) a spreadsheet or CSV file.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Build a text cell, trimming whitespace. Blank text becomes `Empty`.
    pub fn text(s: impl AsRef<str>) -> Self {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            Self::Empty
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    /// Build a text cell from an optional string.
    pub fn opt_text(s: Option<&str>) -> Self {
        s.map(Self::text).unwrap_or(Self::Empty)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Display string, or `None` for an empty cell.
    pub fn as_string(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            other => Some(other.to_string()),
        }
    }

    /// Type-tagged key used for exact-row comparison. `Number(1.0)` and
    /// `Text("1")` are different cells.
    fn identity_key(&self) -> String {
        match self {
            Self::Empty => "e:".into(),
            Self::Text(s) => format!("t:{s}"),
            Self::Number(n) => format!("n:{}", n.to_bits()),
            Self::Bool(b) => format!("b:{b}"),
            Self::Date(d) => format!("d:{d}"),
            Self::DateTime(dt) => format!("dt:{dt}"),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => {
                // Integers without decimals
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Self::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::text(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::text(s)
    }
}

impl From<Option<String>> for CellValue {
    fn from(s: Option<String>) -> Self {
        Self::opt_text(s.as_deref())
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Option<NaiveDate>> for CellValue {
    fn from(d: Option<NaiveDate>) -> Self {
        d.map(Self::Date).unwrap_or(Self::Empty)
    }
}

impl From<Option<NaiveDateTime>> for CellValue {
    fn from(dt: Option<NaiveDateTime>) -> Self {
        dt.map(Self::DateTime).unwrap_or(Self::Empty)
    }
}

/// A header row plus uniformly-sized data rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    pub fn with_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        Self::new(headers.iter().map(|h| h.as_ref().to_string()).collect())
    }

    /// Append a row, padding with `Empty` or truncating to the header width.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.headers.len(), CellValue::Empty);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    pub fn trim_headers(&mut self) {
        for h in &mut self.headers {
            let trimmed = h.trim();
            if trimmed.len() != h.len() {
                *h = trimmed.to_string();
            }
        }
    }

    /// Remove exact-duplicate rows, keeping the first occurrence.
    /// Returns the number of rows removed.
    pub fn dedup_rows(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(before);
        self.rows
            .retain(|row| seen.insert(row.iter().map(CellValue::identity_key).collect()));
        before - self.rows.len()
    }
}
