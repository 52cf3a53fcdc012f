//! Table Loader: raw [`Table`]s in, typed [`RunContext`] out.

use crate::config::{ColumnsConfig, MasterColumns, ScheduleColumns, SecondaryColumns, StockColumns};
use crate::error::ReconError;
use crate::model::{
    InputKind, InputSource, MasterAssetRecord, MasterTable, RunContext, ScheduleEntry,
    SecondaryRecord, StockRecord, StockStatus, StockTable,
};
use crate::normalize::{cell_string, pad_shop_code, parse_date, parse_datetime, parse_flag, parse_quantity};
use crate::table::{CellValue, Table};

/// Raw tables for one run. `None` means the caller did not supply that input.
#[derive(Debug, Default)]
pub struct RunInputs {
    pub stocktake: Option<Table>,
    pub schedule: Option<Table>,
    pub master: Option<Table>,
    pub secondary: Option<Table>,
    pub sources: Vec<InputSource>,
}

/// Check that all four inputs are present, then normalize each one.
/// Nothing is parsed until every input has been confirmed present.
pub fn load(inputs: RunInputs, columns: &ColumnsConfig) -> Result<RunContext, ReconError> {
    let RunInputs { stocktake, schedule, master, secondary, sources } = inputs;

    let stocktake = stocktake.ok_or(ReconError::MissingInput { input: InputKind::Stocktake })?;
    let schedule = schedule.ok_or(ReconError::MissingInput { input: InputKind::Schedule })?;
    let master = master.ok_or(ReconError::MissingInput { input: InputKind::Master })?;
    let secondary = secondary.ok_or(ReconError::MissingInput { input: InputKind::Secondary })?;

    let ctx = RunContext {
        stock: load_stock(stocktake, &columns.stocktake)?,
        schedule: load_schedule(schedule, &columns.schedule)?,
        master: load_master(master, &columns.master)?,
        secondary: load_secondary(secondary, &columns.secondary)?,
        sources,
    };

    log::info!(
        "loaded {} stock, {} schedule, {} master, {} secondary rows",
        ctx.stock.records.len(),
        ctx.schedule.len(),
        ctx.master.records.len(),
        ctx.secondary.len(),
    );

    Ok(ctx)
}

/// Resolves configured column names against a table's (trimmed) headers.
struct Columns<'a> {
    input: InputKind,
    table: &'a Table,
}

impl<'a> Columns<'a> {
    fn new(input: InputKind, table: &'a Table) -> Self {
        Self { input, table }
    }

    fn required(&self, name: &str) -> Result<usize, ReconError> {
        self.table.column_index(name).ok_or_else(|| ReconError::MissingColumn {
            input: self.input,
            column: name.to_string(),
        })
    }

    fn optional(&self, name: &str) -> Option<usize> {
        self.table.column_index(name)
    }
}

fn cell(row: &[CellValue], idx: usize) -> &CellValue {
    static EMPTY: CellValue = CellValue::Empty;
    row.get(idx).unwrap_or(&EMPTY)
}

fn opt_cell(row: &[CellValue], idx: Option<usize>) -> &CellValue {
    static EMPTY: CellValue = CellValue::Empty;
    idx.and_then(|i| row.get(i)).unwrap_or(&EMPTY)
}

/// Trim headers, drop exact-duplicate rows, and type the stocktake.
pub fn load_stock(mut table: Table, cols: &StockColumns) -> Result<StockTable, ReconError> {
    table.trim_headers();
    let removed = table.dedup_rows();
    if removed > 0 {
        log::debug!("stocktake: dropped {removed} duplicate row(s)");
    }

    let c = Columns::new(InputKind::Stocktake, &table);
    let serial_idx = c.required(&cols.serial_no)?;
    let cmdb_idx = c.required(&cols.cmdb)?;
    let shop_idx = c.required(&cols.shop_name)?;
    let qty_idx = c.required(&cols.total_qty)?;
    let status_idx = c.required(&cols.status)?;
    let created_idx = c.optional(&cols.created_at);

    let Table { headers, rows } = table;
    let records = rows
        .into_iter()
        .map(|row| StockRecord {
            serial_no: cell_string(cell(&row, serial_idx)),
            cmdb: cell_string(cell(&row, cmdb_idx)),
            shop_name: cell_string(cell(&row, shop_idx)),
            total_qty: parse_quantity(cell(&row, qty_idx)),
            status: StockStatus::parse(cell_string(cell(&row, status_idx)).as_deref()),
            created_at: parse_datetime(opt_cell(&row, created_idx)),
            cells: row,
        })
        .collect();

    Ok(StockTable { headers, records })
}

pub fn load_schedule(mut table: Table, cols: &ScheduleColumns) -> Result<Vec<ScheduleEntry>, ReconError> {
    table.trim_headers();

    let c = Columns::new(InputKind::Schedule, &table);
    let date_idx = c.required(&cols.date)?;
    let code_idx = c.required(&cols.shop_code)?;
    let shop_idx = c.required(&cols.shop_name)?;
    let available_idx = c.required(&cols.available)?;
    let main_idx = c.required(&cols.main)?;
    let assistant_idx = c.required(&cols.assistant)?;

    Ok(table
        .rows
        .iter()
        .map(|row| ScheduleEntry {
            shop_name: cell_string(cell(row, shop_idx)),
            shop_code: pad_shop_code(cell(row, code_idx)),
            visit_date: parse_date(cell(row, date_idx)),
            available: parse_flag(cell(row, available_idx)),
            main_staff: cell_string(cell(row, main_idx)),
            assistant_staff: cell_string(cell(row, assistant_idx)),
        })
        .collect())
}

pub fn load_master(mut table: Table, cols: &MasterColumns) -> Result<MasterTable, ReconError> {
    table.trim_headers();

    let c = Columns::new(InputKind::Master, &table);
    let serial_idx = c.required(&cols.serial_no)?;
    let code_idx = c.required(&cols.shop_code)?;
    let jg_idx = c.required(&cols.from_jg)?;
    let stock_take_idx = c.required(&cols.stock_take)?;
    let created_idx = c.optional(&cols.created_at);

    let Table { headers, rows } = table;
    let records = rows
        .into_iter()
        .map(|mut row| {
            let shop_code = pad_shop_code(cell(&row, code_idx));
            // Keep the padded code in the source row so reports show it
            if let Some(slot) = row.get_mut(code_idx) {
                *slot = CellValue::opt_text(shop_code.as_deref());
            }
            MasterAssetRecord {
                serial_no: cell_string(cell(&row, serial_idx)),
                shop_code,
                from_jg: parse_flag(cell(&row, jg_idx)),
                stock_take_required: parse_flag(cell(&row, stock_take_idx)),
                created_at: parse_datetime(opt_cell(&row, created_idx)),
                cells: row,
            }
        })
        .collect();

    Ok(MasterTable { headers, records })
}

pub fn load_secondary(mut table: Table, cols: &SecondaryColumns) -> Result<Vec<SecondaryRecord>, ReconError> {
    table.trim_headers();

    let shop_idx = Columns::new(InputKind::Secondary, &table).required(&cols.shop_name)?;

    Ok(table
        .rows
        .iter()
        .map(|row| SecondaryRecord { shop_name: cell_string(cell(row, shop_idx)) })
        .collect())
}
