//! Duplicate identifier check: stock records sharing a serial number or a
//! CMDB id.

use std::collections::HashMap;

use chrono::NaiveDate;
use indexmap::IndexSet;

use crate::model::{DuplicateRow, DuplicateType, StockRecord, StockTable, DEVICE_NOT_FOUND};
use crate::normalize::{contains_digit, normalize_key};
use crate::schedule::FilteredSchedule;

/// A stock record index tagged with the key it was duplicated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DuplicateHit {
    pub duplicate_type: DuplicateType,
    pub record: usize,
}

/// Both passes, unioned in order (serial hits first, then CMDB hits), with
/// exact repeats dropped. Record order within a pass follows the stocktake.
pub fn find_duplicates(stock: &StockTable) -> Vec<DuplicateHit> {
    let by_serial = duplicated_on(&stock.records, DuplicateType::SerialNo, |r| {
        r.serial_no.as_deref().filter(|s| contains_digit(s))
    });
    let by_cmdb = duplicated_on(&stock.records, DuplicateType::Cmdb, |r| {
        r.cmdb
            .as_deref()
            .filter(|c| normalize_key(c) != normalize_key(DEVICE_NOT_FOUND))
    });

    let hits: IndexSet<DuplicateHit> = by_serial.into_iter().chain(by_cmdb).collect();
    log::debug!("duplicates: {} hit(s)", hits.len());
    hits.into_iter().collect()
}

/// Indices of records whose key is shared by two or more records.
fn duplicated_on<'a, F>(records: &'a [StockRecord], duplicate_type: DuplicateType, key: F) -> Vec<DuplicateHit>
where
    F: Fn(&'a StockRecord) -> Option<&'a str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    let keys: Vec<Option<String>> = records
        .iter()
        .map(|r| key(r).map(normalize_key))
        .collect();
    for k in keys.iter().flatten() {
        *counts.entry(k.clone()).or_insert(0) += 1;
    }

    keys.iter()
        .enumerate()
        .filter(|(_, k)| k.as_ref().is_some_and(|k| counts.get(k).copied().unwrap_or(0) > 1))
        .map(|(record, _)| DuplicateHit { duplicate_type, record })
        .collect()
}

/// Left-join hits onto the filtered schedule by shop name. A hit whose shop
/// is scheduled more than once yields one row per visit; a hit with no
/// visit keeps a null date. Sorted by visit date, nulls last.
pub fn attach_schedule(hits: &[DuplicateHit], stock: &StockTable, schedule: &FilteredSchedule) -> Vec<DuplicateRow> {
    let visits = schedule.by_shop_name();
    let mut rows = Vec::with_capacity(hits.len());

    for hit in hits {
        let Some(record) = stock.records.get(hit.record) else {
            continue;
        };
        let matches = record
            .shop_name
            .as_deref()
            .and_then(|s| visits.get(&normalize_key(s)));

        match matches {
            Some(entries) => {
                for entry in entries {
                    rows.push(DuplicateRow {
                        duplicate_type: hit.duplicate_type,
                        visit_date: entry.visit_date,
                        record: record.clone(),
                    });
                }
            }
            None => rows.push(DuplicateRow {
                duplicate_type: hit.duplicate_type,
                visit_date: None,
                record: record.clone(),
            }),
        }
    }

    sort_by_date_nulls_last(&mut rows, |r| r.visit_date);
    rows
}

/// Full check: find duplicates and attach visit context.
pub fn check_duplicates(stock: &StockTable, schedule: &FilteredSchedule) -> Vec<DuplicateRow> {
    attach_schedule(&find_duplicates(stock), stock, schedule)
}

/// Stable ascending sort with unknown dates at the end.
pub(crate) fn sort_by_date_nulls_last<T, F>(rows: &mut [T], date: F)
where
    F: Fn(&T) -> Option<NaiveDate>,
{
    rows.sort_by(|a, b| match (date(a), date(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ScheduleEntry, StockStatus};

    fn rec(serial: Option<&str>, cmdb: Option<&str>, shop: &str) -> StockRecord {
        StockRecord {
            serial_no: serial.map(Into::into),
            cmdb: cmdb.map(Into::into),
            shop_name: Some(shop.into()),
            total_qty: Some(1),
            status: StockStatus::Verified,
            created_at: None,
            cells: Vec::new(),
        }
    }

    fn stock(records: Vec<StockRecord>) -> StockTable {
        StockTable { headers: Vec::new(), records }
    }

    fn visit(shop: &str, day: u32) -> ScheduleEntry {
        ScheduleEntry {
            shop_name: Some(shop.into()),
            visit_date: NaiveDate::from_ymd_opt(2025, 7, day),
            available: true,
            ..Default::default()
        }
    }

    #[test]
    fn serial_with_digit_flagged() {
        let s = stock(vec![
            rec(Some("A100"), None, "Shop A"),
            rec(Some("A100"), None, "Shop A"),
            rec(Some("A101"), None, "Shop A"),
        ]);
        let hits = find_duplicates(&s);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.duplicate_type == DuplicateType::SerialNo));
        assert_eq!(hits[0].record, 0);
        assert_eq!(hits[1].record, 1);
    }

    #[test]
    fn serial_without_digit_not_flagged() {
        let s = stock(vec![rec(Some("ABC"), None, "Shop A"), rec(Some("ABC"), None, "Shop A")]);
        assert!(find_duplicates(&s).is_empty());
    }

    #[test]
    fn not_found_sentinel_not_flagged() {
        let s = stock(vec![
            rec(None, Some(DEVICE_NOT_FOUND), "Shop A"),
            rec(None, Some(DEVICE_NOT_FOUND), "Shop A"),
            rec(None, None, "Shop A"),
            rec(None, None, "Shop A"),
        ]);
        assert!(find_duplicates(&s).is_empty());
    }

    #[test]
    fn cmdb_duplicates_tagged() {
        let s = stock(vec![
            rec(Some("X1"), Some("CI-9"), "Shop A"),
            rec(Some("X2"), Some("ci-9 "), "Shop B"),
        ]);
        let hits = find_duplicates(&s);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.duplicate_type == DuplicateType::Cmdb));
    }

    #[test]
    fn row_duplicated_on_both_keys_appears_per_type() {
        let s = stock(vec![rec(Some("A1"), Some("C1"), "Shop A"), rec(Some("A1"), Some("C1"), "Shop B")]);
        let hits = find_duplicates(&s);
        assert_eq!(hits.len(), 4);
        assert_eq!(hits[0].duplicate_type, DuplicateType::SerialNo);
        assert_eq!(hits[3].duplicate_type, DuplicateType::Cmdb);
    }

    #[test]
    fn join_keeps_unmatched_and_sorts_nulls_last() {
        let s = stock(vec![
            rec(Some("A1"), None, "Unscheduled"),
            rec(Some("A1"), None, "Shop B"),
            rec(Some("A1"), None, "Shop A"),
        ]);
        let schedule = FilteredSchedule { entries: vec![visit("Shop A", 23), visit("shop b", 22)] };
        let rows = check_duplicates(&s, &schedule);
        let shops: Vec<_> = rows.iter().map(|r| r.record.shop_name.clone().unwrap()).collect();
        assert_eq!(shops, vec!["Shop B", "Shop A", "Unscheduled"]);
        assert_eq!(rows[0].visit_date, NaiveDate::from_ymd_opt(2025, 7, 22));
        assert_eq!(rows[2].visit_date, None);
    }

    #[test]
    fn shop_visited_twice_yields_row_per_visit() {
        let s = stock(vec![rec(Some("A1"), None, "Shop A"), rec(Some("A1"), None, "Shop A")]);
        let schedule = FilteredSchedule { entries: vec![visit("Shop A", 22), visit("Shop A", 23)] };
        assert_eq!(check_duplicates(&s, &schedule).len(), 4);
    }
}
