//! Records extracts: the verified / new scans handed back to the shops.

use std::collections::HashSet;

use crate::model::{DuplicateRow, StockRecord, StockTable};
use crate::normalize::normalize_key;
use crate::schedule::FilteredSchedule;

/// In-scope Verified / New Record scans whose serial is not in the
/// duplicate report.
pub fn daily_records(stock: &StockTable, schedule: &FilteredSchedule, duplicates: &[DuplicateRow]) -> Vec<StockRecord> {
    let duplicated: HashSet<String> = duplicates
        .iter()
        .filter_map(|d| d.record.serial_no.as_deref())
        .map(normalize_key)
        .collect();

    schedule
        .scope_stock(stock)
        .into_iter()
        .filter(|r| r.status.is_recorded())
        .filter(|r| !r.serial_no.as_deref().is_some_and(|s| duplicated.contains(&normalize_key(s))))
        .cloned()
        .collect()
}

/// Every Verified / New Record scan, regardless of schedule.
pub fn jg_records(stock: &StockTable) -> Vec<StockRecord> {
    stock
        .records
        .iter()
        .filter(|r| r.status.is_recorded())
        .cloned()
        .collect()
}
