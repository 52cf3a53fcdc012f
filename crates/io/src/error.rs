use std::fmt;
use std::path::Path;

/// Failure reading an input file.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadError {
    /// The workbook has no sheet with the requested name.
    SheetNotFound { sheet: String, available: Vec<String> },
    /// Unreadable file, corrupt workbook or malformed CSV.
    Invalid(String),
}

impl ReadError {
    /// Prefix an `Invalid` message with the file it came from.
    pub(crate) fn in_file(self, path: &Path) -> Self {
        match self {
            Self::Invalid(msg) => Self::Invalid(format!("{}: {}", path.display(), msg)),
            other => other,
        }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SheetNotFound { sheet, available } => {
                write!(f, "Sheet '{}' not found (available: {})", sheet, available.join(", "))
            }
            Self::Invalid(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ReadError {}

impl From<String> for ReadError {
    fn from(msg: String) -> Self {
        Self::Invalid(msg)
    }
}
