use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::config::DateWindow;
use crate::table::{CellValue, Table};

/// CMDB value meaning "no CMDB match".
pub const DEVICE_NOT_FOUND: &str = "Device Not Found";

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Stocktake,
    Schedule,
    Master,
    Secondary,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stocktake => write!(f, "stocktake"),
            Self::Schedule => write!(f, "schedule"),
            Self::Master => write!(f, "master"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

/// Identity of one loaded input file.
#[derive(Debug, Clone, Serialize)]
pub struct InputSource {
    pub input: InputKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    pub blake3: String,
    pub rows: usize,
}

// ---------------------------------------------------------------------------
// Stocktake
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockStatus {
    Verified,
    DeviceNotFound,
    NewRecord,
    Other(String),
}

impl StockStatus {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Other(String::new());
        };
        match crate::normalize::normalize_key(raw).as_str() {
            "verified" => Self::Verified,
            "device not found" => Self::DeviceNotFound,
            "new record" => Self::NewRecord,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// Statuses counted by the quantity check.
    pub fn is_counted(&self) -> bool {
        matches!(self, Self::Verified | Self::DeviceNotFound)
    }

    /// Statuses included in the records extracts.
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Verified | Self::NewRecord)
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Verified => write!(f, "Verified"),
            Self::DeviceNotFound => write!(f, "Device Not Found"),
            Self::NewRecord => write!(f, "New Record"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// One physical device scan.
#[derive(Debug, Clone)]
pub struct StockRecord {
    pub serial_no: Option<String>,
    pub cmdb: Option<String>,
    pub shop_name: Option<String>,
    pub total_qty: Option<i64>,
    pub status: StockStatus,
    pub created_at: Option<NaiveDateTime>,
    /// Source row, aligned with [`StockTable::headers`].
    pub cells: Vec<CellValue>,
}

/// Stocktake records plus the source header row they were loaded from.
#[derive(Debug, Clone, Default)]
pub struct StockTable {
    pub headers: Vec<String>,
    pub records: Vec<StockRecord>,
}

impl StockTable {
    /// Source value of `column` for `record`; `Empty` if the column is absent.
    pub fn value(&self, record: &StockRecord, column: &str) -> CellValue {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|i| record.cells.get(i).cloned())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Master asset list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MasterAssetRecord {
    pub serial_no: Option<String>,
    pub shop_code: Option<String>,
    pub from_jg: bool,
    pub stock_take_required: bool,
    pub created_at: Option<NaiveDateTime>,
    /// Source row, aligned with [`MasterTable::headers`].
    pub cells: Vec<CellValue>,
}

#[derive(Debug, Clone, Default)]
pub struct MasterTable {
    pub headers: Vec<String>,
    pub records: Vec<MasterAssetRecord>,
}

// ---------------------------------------------------------------------------
// Schedule + secondary inventory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleEntry {
    pub shop_name: Option<String>,
    pub shop_code: Option<String>,
    pub visit_date: Option<NaiveDate>,
    pub available: bool,
    pub main_staff: Option<String>,
    pub assistant_staff: Option<String>,
}

impl ScheduleEntry {
    /// True when every descriptive field is null.
    pub fn is_blank(&self) -> bool {
        self.shop_name.is_none()
            && self.shop_code.is_none()
            && self.main_staff.is_none()
            && self.assistant_staff.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecondaryRecord {
    pub shop_name: Option<String>,
}

/// Everything one run reads. Built once per invocation by the loader and
/// passed by reference to every check.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub stock: StockTable,
    pub schedule: Vec<ScheduleEntry>,
    pub master: MasterTable,
    pub secondary: Vec<SecondaryRecord>,
    pub sources: Vec<InputSource>,
}

// ---------------------------------------------------------------------------
// Check results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuantityCheckRow {
    pub shop_name: String,
    pub max_qty: Option<i64>,
    pub row_count: usize,
    pub consistent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DuplicateType {
    SerialNo,
    #[serde(rename = "CMDB")]
    Cmdb,
}

impl std::fmt::Display for DuplicateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SerialNo => write!(f, "SerialNo"),
            Self::Cmdb => write!(f, "CMDB"),
        }
    }
}

/// A stock record that shares its serial or CMDB with at least one other.
#[derive(Debug, Clone)]
pub struct DuplicateRow {
    pub duplicate_type: DuplicateType,
    pub visit_date: Option<NaiveDate>,
    pub record: StockRecord,
}

/// A JG asset with no matching scan in the visit window.
#[derive(Debug, Clone)]
pub struct OutstandingRow {
    pub visit_date: Option<NaiveDate>,
    pub main_staff: Option<String>,
    pub assistant_staff: Option<String>,
    pub asset: MasterAssetRecord,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconSummary {
    pub scheduled_shops: usize,
    pub quantity_groups: usize,
    pub inconsistent_groups: usize,
    pub duplicates: usize,
    pub outstanding: usize,
    pub missing_shops: usize,
    pub daily_records: usize,
    pub jg_records: usize,
}

impl ReconSummary {
    /// Any result that needs follow-up on the shop floor.
    pub fn has_findings(&self) -> bool {
        self.inconsistent_groups > 0
            || self.duplicates > 0
            || self.outstanding > 0
            || self.missing_shops > 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub name: String,
    pub window: DateWindow,
    pub engine_version: String,
    pub run_at: String,
    pub inputs: Vec<InputSource>,
}

/// A report projected to its fixed column order.
#[derive(Debug, Clone, Serialize)]
pub struct ReportTable {
    pub kind: crate::report::ReportKind,
    pub sheet: String,
    pub table: Table,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub reports: Vec<ReportTable>,
}

impl ReconReport {
    pub fn report(&self, kind: crate::report::ReportKind) -> Option<&Table> {
        self.reports.iter().find(|r| r.kind == kind).map(|r| &r.table)
    }
}
