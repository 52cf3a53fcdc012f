use std::collections::BTreeMap;

use crate::model::{QuantityCheckRow, StockTable};
use crate::normalize::normalize_key;
use crate::schedule::FilteredSchedule;

/// Group counted scans (Verified / Device Not Found) of in-scope shops by
/// shop name. A shop is consistent when its highest `TotalQty` equals the
/// number of quantities scanned, i.e. units 1..N each appear once.
pub fn check_quantity(stock: &StockTable, scope: &FilteredSchedule) -> Vec<QuantityCheckRow> {
    // normalized shop -> (display name, max qty, non-null qty count)
    let mut groups: BTreeMap<String, (String, Option<i64>, usize)> = BTreeMap::new();

    for record in scope.scope_stock(stock) {
        if !record.status.is_counted() {
            continue;
        }
        let Some(shop) = record.shop_name.as_deref() else {
            continue;
        };
        let entry = groups
            .entry(normalize_key(shop))
            .or_insert_with(|| (shop.to_string(), None, 0));
        if let Some(qty) = record.total_qty {
            entry.1 = Some(entry.1.map_or(qty, |m| m.max(qty)));
            entry.2 += 1;
        }
    }

    let rows: Vec<QuantityCheckRow> = groups
        .into_values()
        .map(|(shop_name, max_qty, row_count)| QuantityCheckRow {
            shop_name,
            max_qty,
            row_count,
            consistent: max_qty == Some(row_count as i64),
        })
        .collect();

    log::debug!(
        "quantity: {} group(s), {} inconsistent",
        rows.len(),
        rows.iter().filter(|r| !r.consistent).count()
    );

    rows
}
