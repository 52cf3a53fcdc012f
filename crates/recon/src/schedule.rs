//! Schedule Filter: narrows the visit schedule to the run's window.

use std::collections::{HashMap, HashSet};

use crate::config::DateWindow;
use crate::model::{ScheduleEntry, StockRecord, StockTable};
use crate::normalize::normalize_key;

/// Schedule entries with a known visit date inside the window and
/// `Available = true`.
#[derive(Debug, Clone, Default)]
pub struct FilteredSchedule {
    pub entries: Vec<ScheduleEntry>,
}

/// Entries with an unknown date are dropped before any range comparison.
pub fn filter(schedule: &[ScheduleEntry], window: &DateWindow) -> FilteredSchedule {
    let entries: Vec<ScheduleEntry> = schedule
        .iter()
        .filter(|e| matches!(e.visit_date, Some(d) if window.contains(d)))
        .filter(|e| e.available)
        .filter(|e| !e.is_blank())
        .cloned()
        .collect();

    log::info!(
        "schedule: {} of {} entries in window {window}",
        entries.len(),
        schedule.len()
    );

    FilteredSchedule { entries }
}

impl FilteredSchedule {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalized shop names in scope.
    pub fn shop_keys(&self) -> HashSet<String> {
        self.entries
            .iter()
            .filter_map(|e| e.shop_name.as_deref())
            .map(normalize_key)
            .collect()
    }

    /// Normalized shop codes in scope.
    pub fn shop_codes(&self) -> HashSet<String> {
        self.entries
            .iter()
            .filter_map(|e| e.shop_code.as_deref())
            .map(normalize_key)
            .collect()
    }

    /// Entries grouped by normalized shop name, in schedule order.
    pub fn by_shop_name(&self) -> HashMap<String, Vec<&ScheduleEntry>> {
        let mut map: HashMap<String, Vec<&ScheduleEntry>> = HashMap::new();
        for e in &self.entries {
            if let Some(name) = e.shop_name.as_deref() {
                map.entry(normalize_key(name)).or_default().push(e);
            }
        }
        map
    }

    /// Entries grouped by normalized shop code, in schedule order.
    pub fn by_shop_code(&self) -> HashMap<String, Vec<&ScheduleEntry>> {
        let mut map: HashMap<String, Vec<&ScheduleEntry>> = HashMap::new();
        for e in &self.entries {
            if let Some(code) = e.shop_code.as_deref() {
                map.entry(normalize_key(code)).or_default().push(e);
            }
        }
        map
    }

    /// Stock records belonging to an in-scope shop.
    pub fn scope_stock<'a>(&self, stock: &'a StockTable) -> Vec<&'a StockRecord> {
        let keys = self.shop_keys();
        stock
            .records
            .iter()
            .filter(|r| r.shop_name.as_deref().is_some_and(|s| keys.contains(&normalize_key(s))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    fn entry(shop: &str, date: Option<NaiveDate>, available: bool) -> ScheduleEntry {
        ScheduleEntry {
            shop_name: Some(shop.into()),
            shop_code: Some("00001".into()),
            visit_date: date,
            available,
            main_staff: None,
            assistant_staff: None,
        }
    }

    #[test]
    fn unknown_dates_never_match() {
        let schedule = vec![entry("TBC Shop", None, true)];
        // Widest possible window still excludes it
        let window = DateWindow::new(NaiveDate::MIN, NaiveDate::MAX);
        assert!(filter(&schedule, &window).is_empty());
    }

    #[test]
    fn window_boundaries_inclusive() {
        let schedule = vec![
            entry("Start", Some(d(22)), true),
            entry("End", Some(d(24)), true),
            entry("Before", Some(d(21)), true),
            entry("After", Some(d(25)), true),
        ];
        let f = filter(&schedule, &DateWindow::new(d(22), d(24)));
        let names: Vec<_> = f.entries.iter().filter_map(|e| e.shop_name.as_deref()).collect();
        assert_eq!(names, vec!["Start", "End"]);
    }

    #[test]
    fn unavailable_and_blank_rows_dropped() {
        let blank = ScheduleEntry {
            visit_date: Some(d(22)),
            available: true,
            ..Default::default()
        };
        let schedule = vec![entry("Closed", Some(d(22)), false), blank, entry("Open", Some(d(22)), true)];
        let f = filter(&schedule, &DateWindow::new(d(22), d(22)));
        assert_eq!(f.entries.len(), 1);
        assert_eq!(f.entries[0].shop_name.as_deref(), Some("Open"));
    }

    #[test]
    fn shop_keys_are_normalized() {
        let f = FilteredSchedule { entries: vec![entry("  Shop A ", Some(d(22)), true)] };
        assert!(f.shop_keys().contains("shop a"));
        assert!(f.shop_codes().contains("00001"));
    }
}
