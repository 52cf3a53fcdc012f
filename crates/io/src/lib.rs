// File I/O operations

pub mod csv;
pub mod error;
pub mod source;
pub mod xlsx;

pub use error::ReadError;
pub use source::{read_table, write_table, LoadedTable};
