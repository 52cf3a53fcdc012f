//! `stockrecon-recon` — Stocktake reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded tables, returns projected result
//! tables. No CLI or file IO dependencies.

pub mod config;
pub mod duplicates;
pub mod engine;
pub mod error;
pub mod loader;
pub mod missing_shops;
pub mod model;
pub mod normalize;
pub mod outstanding;
pub mod quantity;
pub mod records;
pub mod report;
pub mod schedule;
pub mod summary;
pub mod table;

pub use config::RunConfig;
pub use engine::{run, run_duplicates};
pub use error::ReconError;
pub use loader::{load, RunInputs};
pub use model::{InputKind, ReconReport, RunContext};
pub use schedule::FilteredSchedule;
pub use table::{CellValue, Table};
