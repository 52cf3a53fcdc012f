//! JG Outstanding: JG assets requiring stocktake that no in-scope scan
//! accounts for.

use std::collections::HashSet;

use crate::duplicates::sort_by_date_nulls_last;
use crate::model::{MasterAssetRecord, MasterTable, OutstandingRow, StockTable};
use crate::normalize::normalize_key;
use crate::schedule::FilteredSchedule;

/// Master rows flagged From JG at in-scope shops, not found among the
/// in-scope scans, and flagged Stock Take, joined to the visit roster.
/// Assets installed after their visit date are excluded. Sorted by visit
/// date, nulls last.
pub fn check_outstanding(master: &MasterTable, stock: &StockTable, schedule: &FilteredSchedule) -> Vec<OutstandingRow> {
    let codes = schedule.shop_codes();
    let scanned: HashSet<String> = schedule
        .scope_stock(stock)
        .into_iter()
        .filter_map(|r| r.serial_no.as_deref())
        .map(normalize_key)
        .collect();

    let candidates: Vec<&MasterAssetRecord> = master
        .records
        .iter()
        .filter(|a| a.from_jg)
        .filter(|a| a.shop_code.as_deref().is_some_and(|c| codes.contains(&normalize_key(c))))
        .filter(|a| {
            let found = a.serial_no.as_deref().is_some_and(|s| scanned.contains(&normalize_key(s)));
            !found && a.stock_take_required
        })
        .collect();

    let roster = schedule.by_shop_code();
    let mut rows = Vec::with_capacity(candidates.len());

    for asset in candidates {
        let visits = asset
            .shop_code
            .as_deref()
            .and_then(|c| roster.get(&normalize_key(c)));

        match visits {
            Some(entries) => {
                for entry in entries {
                    rows.push(OutstandingRow {
                        visit_date: entry.visit_date,
                        main_staff: entry.main_staff.clone(),
                        assistant_staff: entry.assistant_staff.clone(),
                        asset: asset.clone(),
                    });
                }
            }
            None => rows.push(OutstandingRow {
                visit_date: None,
                main_staff: None,
                assistant_staff: None,
                asset: asset.clone(),
            }),
        }
    }

    let before = rows.len();
    rows.retain(|r| !is_new_installed(r));
    log::debug!(
        "outstanding: {} item(s), {} excluded as newly installed",
        rows.len(),
        before - rows.len()
    );

    sort_by_date_nulls_last(&mut rows, |r| r.visit_date);
    rows
}

/// Installed on a later calendar day than the visit. Unknown install or
/// visit dates are never treated as newly installed.
pub fn is_new_installed(row: &OutstandingRow) -> bool {
    match (row.asset.created_at, row.visit_date) {
        (Some(created), Some(visit)) => created.date() > visit,
        _ => false,
    }
}
