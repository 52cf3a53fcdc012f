//! Projection of check results into fixed-column tables.
//!
//! Column orders here are the contract with whatever renders or exports the
//! reports; the engine does no other formatting.

use serde::Serialize;

use crate::config::{MasterColumns, StockColumns};
use crate::model::{DuplicateRow, MasterTable, OutstandingRow, QuantityCheckRow, StockRecord, StockTable};
use crate::table::{CellValue, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Quantity,
    Duplicates,
    Outstanding,
    MissingShops,
    DailyRecords,
    JgRecords,
}

impl ReportKind {
    pub const ALL: [ReportKind; 6] = [
        Self::Quantity,
        Self::Duplicates,
        Self::Outstanding,
        Self::MissingShops,
        Self::DailyRecords,
        Self::JgRecords,
    ];

    /// Output file name without extension.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Quantity => "check_quantity",
            Self::Duplicates => "duplicate_item",
            Self::Outstanding => "JG_outstanding",
            Self::MissingShops => "missing_shops",
            Self::DailyRecords => "daily_records",
            Self::JgRecords => "JG_records",
        }
    }

    pub fn sheet_name(&self) -> &'static str {
        match self {
            Self::Quantity => "Check Quantity",
            Self::Duplicates => "Duplicates",
            Self::Outstanding => "JG Outstanding",
            Self::MissingShops => "Missing Shops",
            Self::DailyRecords => "Sheet1",
            Self::JgRecords => "JG Records",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Quantity => "Check Quantity",
            Self::Duplicates => "Duplicate SerialNo / CMDB",
            Self::Outstanding => "Outstanding JG Items",
            Self::MissingShops => "Shops Missing From Secondary Inventory",
            Self::DailyRecords => "Daily Records",
            Self::JgRecords => "JG Records (Verified / New Record)",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_stem())
    }
}

pub const QUANTITY_COLUMNS: [&str; 4] = ["Shop.Name", "max_qty", "row_count", "check"];
pub const MISSING_SHOP_COLUMNS: [&str; 1] = ["Shop.Name"];

/// `Shop.Name, max_qty, row_count, check`
pub fn quantity_table(rows: &[QuantityCheckRow]) -> Table {
    let mut table = Table::with_headers(&QUANTITY_COLUMNS);
    for r in rows {
        table.push_row(vec![
            CellValue::text(&r.shop_name),
            r.max_qty.map(CellValue::from).unwrap_or_default(),
            CellValue::from(r.row_count as i64),
            CellValue::Bool(r.consistent),
        ]);
    }
    table
}

/// `Duplicate_Type, Date, <status>, <serial>, <cmdb>, <shop>, <extra...>`
pub fn duplicates_table(
    rows: &[DuplicateRow],
    stock: &StockTable,
    cols: &StockColumns,
    extra_columns: &[String],
) -> Table {
    let mut headers: Vec<String> = vec![
        "Duplicate_Type".into(),
        "Date".into(),
        cols.status.clone(),
        cols.serial_no.clone(),
        cols.cmdb.clone(),
        cols.shop_name.clone(),
    ];
    headers.extend(extra_columns.iter().cloned());

    let mut table = Table::new(headers);
    for r in rows {
        let mut row = vec![
            CellValue::text(r.duplicate_type.to_string()),
            CellValue::from(r.visit_date),
            stock.value(&r.record, &cols.status),
            stock.value(&r.record, &cols.serial_no),
            stock.value(&r.record, &cols.cmdb),
            stock.value(&r.record, &cols.shop_name),
        ];
        row.extend(extra_columns.iter().map(|c| stock.value(&r.record, c)));
        table.push_row(row);
    }
    table
}

/// Master columns never carried into the outstanding report.
const OUTSTANDING_DROPPED: [&str; 4] = ["Date", "Main", "Assistant", "JG Date"];

/// `Date, <shop code>, <serial>, <from jg>, <stock take>, [<created at>,]
/// Main, Assistant`, then the master's remaining columns in source order.
/// The created-at column appears only when the master has one.
pub fn outstanding_table(rows: &[OutstandingRow], master: &MasterTable, cols: &MasterColumns) -> Table {
    let mut leading = vec![&cols.shop_code, &cols.serial_no, &cols.from_jg, &cols.stock_take];
    if master.headers.contains(&cols.created_at) {
        leading.push(&cols.created_at);
    }
    let rest: Vec<(usize, &String)> = master
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !leading.contains(h) && !OUTSTANDING_DROPPED.contains(&h.as_str()))
        .collect();
    let leading_idx: Vec<Option<usize>> = leading
        .iter()
        .map(|name| master.headers.iter().position(|h| h == *name))
        .collect();

    let mut headers: Vec<String> = vec!["Date".into()];
    headers.extend(leading.iter().map(|s| s.to_string()));
    headers.push("Main".into());
    headers.push("Assistant".into());
    headers.extend(rest.iter().map(|(_, h)| h.to_string()));

    let cell_at = |cells: &[CellValue], idx: Option<usize>| -> CellValue {
        idx.and_then(|i| cells.get(i).cloned()).unwrap_or_default()
    };

    let mut table = Table::new(headers);
    for r in rows {
        let cells = &r.asset.cells;
        let mut row = vec![CellValue::from(r.visit_date)];
        row.extend(leading_idx.iter().map(|idx| cell_at(cells, *idx)));
        row.push(CellValue::from(r.main_staff.clone()));
        row.push(CellValue::from(r.assistant_staff.clone()));
        row.extend(rest.iter().map(|(i, _)| cell_at(cells, Some(*i))));
        table.push_row(row);
    }
    table
}

/// `Shop.Name`
pub fn missing_shops_table(shops: &[String]) -> Table {
    let mut table = Table::with_headers(&MISSING_SHOP_COLUMNS);
    for shop in shops {
        table.push_row(vec![CellValue::text(shop)]);
    }
    table
}

/// The stocktake's own columns, in source order.
pub fn records_table(records: &[StockRecord], stock: &StockTable) -> Table {
    let mut table = Table::new(stock.headers.clone());
    for r in records {
        table.push_row(r.cells.clone());
    }
    table
}
