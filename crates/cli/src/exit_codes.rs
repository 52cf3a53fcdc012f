//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                                        |
//! |------|----------------------------------------------------------------|
//! | 0    | Run completed, nothing to follow up                            |
//! | 1    | Run completed with findings                                    |
//! | 2    | Usage error (bad arguments)                                    |
//! | 3    | A required input was not configured or could not be found      |
//! | 4    | An input is missing a required column                          |
//! | 5    | Config file does not parse or fails validation                 |
//! | 6    | Reading an input or writing a report failed                    |

use stockrecon_recon::ReconError;

/// Success - no inconsistent quantity group, duplicate, outstanding item or
/// missing shop.
pub const EXIT_SUCCESS: u8 = 0;

/// At least one report needs follow-up. Like `diff(1)`, 1 means "differences found".
pub const EXIT_FINDINGS: u8 = 1;

/// Usage error - bad arguments, conflicting options.
pub const EXIT_USAGE: u8 = 2;

/// Missing input - an input path is absent from the config or the file does not exist.
pub const EXIT_MISSING_INPUT: u8 = 3;

/// Schema error - a required column is absent from a loaded table.
pub const EXIT_SCHEMA: u8 = 4;

/// Invalid config - TOML parse error or failed validation.
pub const EXIT_INVALID_CONFIG: u8 = 5;

/// I/O error - unreadable input, unwritable report.
pub const EXIT_IO: u8 = 6;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReconError::MissingInput { .. } => EXIT_MISSING_INPUT,
        ReconError::MissingColumn { .. } => EXIT_SCHEMA,
        ReconError::Io(_) => EXIT_IO,
    }
}
