use std::fmt;

use crate::model::InputKind;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (inverted window, empty path, etc.).
    ConfigValidation(String),
    /// A required input table was not supplied. Fatal before any check runs.
    MissingInput { input: InputKind },
    /// A required column is absent from a loaded table.
    MissingColumn { input: InputKind, column: String },
    /// IO error (file read, export, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingInput { input } => {
                write!(f, "missing input: the {input} table was not supplied")
            }
            Self::MissingColumn { input, column } => {
                write!(f, "schema error: {input} table has no column '{column}'")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
