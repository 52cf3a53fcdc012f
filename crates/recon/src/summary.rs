use crate::model::{DuplicateRow, OutstandingRow, QuantityCheckRow, ReconSummary, StockRecord};
use crate::schedule::FilteredSchedule;

/// Counts reported alongside the tables.
pub struct CheckResults<'a> {
    pub schedule: &'a FilteredSchedule,
    pub quantity: &'a [QuantityCheckRow],
    pub duplicates: &'a [DuplicateRow],
    pub outstanding: &'a [OutstandingRow],
    pub missing_shops: &'a [String],
    pub daily_records: &'a [StockRecord],
    pub jg_records: &'a [StockRecord],
}

/// Compute summary statistics from the check results.
pub fn compute_summary(results: &CheckResults<'_>) -> ReconSummary {
    ReconSummary {
        scheduled_shops: results.schedule.shop_keys().len(),
        quantity_groups: results.quantity.len(),
        inconsistent_groups: results.quantity.iter().filter(|r| !r.consistent).count(),
        duplicates: results.duplicates.len(),
        outstanding: results.outstanding.len(),
        missing_shops: results.missing_shops.len(),
        daily_records: results.daily_records.len(),
        jg_records: results.jg_records.len(),
    }
}
