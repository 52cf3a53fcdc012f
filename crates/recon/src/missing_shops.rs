use std::collections::{BTreeMap, HashSet};

use crate::model::SecondaryRecord;
use crate::normalize::normalize_key;
use crate::schedule::FilteredSchedule;

/// Scheduled shops absent from the secondary inventory feed.
///
/// Both sides are compared by normalized name. Each missing shop is reported
/// once, with the schedule's spelling, in ascending order.
pub fn find_missing_shops(schedule: &FilteredSchedule, secondary: &[SecondaryRecord]) -> Vec<String> {
    let present: HashSet<String> = secondary
        .iter()
        .filter_map(|r| r.shop_name.as_deref())
        .map(normalize_key)
        .collect();

    let mut missing: BTreeMap<String, String> = BTreeMap::new();
    for name in schedule.entries.iter().filter_map(|e| e.shop_name.as_deref()) {
        let key = normalize_key(name);
        if !present.contains(&key) {
            missing.entry(key).or_insert_with(|| name.to_string());
        }
    }

    log::debug!("missing shops: {}", missing.len());
    missing.into_values().collect()
}
