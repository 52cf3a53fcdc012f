use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_name")]
    pub name: String,
    pub window: DateWindow,
    #[serde(default)]
    pub inputs: InputsConfig,
    #[serde(default)]
    pub columns: ColumnsConfig,
    #[serde(default)]
    pub duplicates: DuplicatesConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_name() -> String {
    "stocktake".into()
}

// ---------------------------------------------------------------------------
// Visit window
// ---------------------------------------------------------------------------

/// Closed date range selecting the run's scheduled visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, serde::Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// File locations. Paths are optional here so that an absent input surfaces
/// as a missing-input error at load time, not as a parse error.
#[derive(Debug, Clone, Deserialize)]
pub struct InputsConfig {
    #[serde(default)]
    pub stocktake: Option<String>,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub master: Option<String>,
    #[serde(default)]
    pub secondary: Option<String>,
    #[serde(default = "default_schedule_sheet")]
    pub schedule_sheet: String,
    #[serde(default)]
    pub stocktake_sheet: Option<String>,
    #[serde(default)]
    pub master_sheet: Option<String>,
    #[serde(default)]
    pub secondary_sheet: Option<String>,
}

fn default_schedule_sheet() -> String {
    "Schedule".into()
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            stocktake: None,
            schedule: None,
            master: None,
            secondary: None,
            schedule_sheet: default_schedule_sheet(),
            stocktake_sheet: None,
            master_sheet: None,
            secondary_sheet: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnsConfig {
    #[serde(default)]
    pub stocktake: StockColumns,
    #[serde(default)]
    pub schedule: ScheduleColumns,
    #[serde(default)]
    pub master: MasterColumns,
    #[serde(default)]
    pub secondary: SecondaryColumns,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StockColumns {
    pub serial_no: String,
    pub cmdb: String,
    pub shop_name: String,
    pub total_qty: String,
    pub status: String,
    /// Optional column; absent means every record has an unknown timestamp.
    pub created_at: String,
}

impl Default for StockColumns {
    fn default() -> Self {
        Self {
            serial_no: "SerialNo".into(),
            cmdb: "CMDB".into(),
            shop_name: "Shop.Name".into(),
            total_qty: "TotalQty".into(),
            status: "Stock.Take.Status".into(),
            created_at: "CreatedAt".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleColumns {
    pub date: String,
    pub shop_code: String,
    pub shop_name: String,
    pub available: String,
    pub main: String,
    pub assistant: String,
}

impl Default for ScheduleColumns {
    fn default() -> Self {
        Self {
            date: "Date".into(),
            shop_code: "ShopCode".into(),
            shop_name: "Shop.Name".into(),
            available: "Available".into(),
            main: "Main".into(),
            assistant: "Assistant".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MasterColumns {
    pub serial_no: String,
    pub shop_code: String,
    pub from_jg: String,
    pub stock_take: String,
    /// Optional column holding the asset's installation timestamp.
    pub created_at: String,
}

impl Default for MasterColumns {
    fn default() -> Self {
        Self {
            serial_no: "Serial No".into(),
            shop_code: "Shop Code".into(),
            from_jg: "From JG".into(),
            stock_take: "Stock Take".into(),
            created_at: "CreatedAt".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecondaryColumns {
    pub shop_name: String,
}

impl Default for SecondaryColumns {
    fn default() -> Self {
        Self { shop_name: "ShopName".into() }
    }
}

// ---------------------------------------------------------------------------
// Duplicates + Output
// ---------------------------------------------------------------------------

/// Descriptive stocktake columns appended to the duplicate report.
/// Columns absent from the stocktake render empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DuplicatesConfig {
    pub extra_columns: Vec<String>,
}

impl Default for DuplicatesConfig {
    fn default() -> Self {
        Self {
            extra_columns: [
                "Product.Type.(Eng)",
                "Product.Type.(Chi)",
                "Brand",
                "Asset.Name",
                "Asset.Item.ID",
                "IP.Address",
                "MX.No.",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default)]
    pub format: OutputFormat,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl RunConfig {
    /// Config for an in-memory run with default column names.
    pub fn for_window(window: DateWindow) -> Self {
        Self {
            name: default_name(),
            window,
            inputs: InputsConfig::default(),
            columns: ColumnsConfig::default(),
            duplicates: DuplicatesConfig::default(),
            output: OutputConfig::default(),
        }
    }

    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: RunConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.window.start > self.window.end {
            return Err(ReconError::ConfigValidation(format!(
                "window start {} is after end {}",
                self.window.start, self.window.end
            )));
        }

        let inputs = [
            ("stocktake", &self.inputs.stocktake),
            ("schedule", &self.inputs.schedule),
            ("master", &self.inputs.master),
            ("secondary", &self.inputs.secondary),
        ];
        for (name, path) in inputs {
            if matches!(path, Some(p) if p.trim().is_empty()) {
                return Err(ReconError::ConfigValidation(format!(
                    "inputs.{name} must not be empty"
                )));
            }
        }

        if self.inputs.schedule_sheet.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "inputs.schedule_sheet must not be empty".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
