use crate::config::{RunConfig, StockColumns};
use crate::duplicates::check_duplicates;
use crate::missing_shops::find_missing_shops;
use crate::model::{ReconMeta, ReconReport, ReportTable, RunContext, StockTable};
use crate::outstanding::check_outstanding;
use crate::quantity::check_quantity;
use crate::records::{daily_records, jg_records};
use crate::report::{self, ReportKind};
use crate::schedule::{self, FilteredSchedule};
use crate::summary::{compute_summary, CheckResults};
use crate::table::Table;

/// Run every check over one loaded snapshot. Each check reads the context
/// by shared reference; nothing here mutates an input table.
pub fn run(config: &RunConfig, ctx: &RunContext) -> ReconReport {
    let scope = schedule::filter(&ctx.schedule, &config.window);
    if scope.is_empty() {
        log::warn!("no available visits scheduled in {}", config.window);
    }

    let quantity = check_quantity(&ctx.stock, &scope);
    let duplicates = check_duplicates(&ctx.stock, &scope);
    let outstanding = check_outstanding(&ctx.master, &ctx.stock, &scope);
    let missing = find_missing_shops(&scope, &ctx.secondary);
    let daily = daily_records(&ctx.stock, &scope, &duplicates);
    let jg = jg_records(&ctx.stock);

    let summary = compute_summary(&CheckResults {
        schedule: &scope,
        quantity: &quantity,
        duplicates: &duplicates,
        outstanding: &outstanding,
        missing_shops: &missing,
        daily_records: &daily,
        jg_records: &jg,
    });

    let tables = [
        (ReportKind::Quantity, report::quantity_table(&quantity)),
        (
            ReportKind::Duplicates,
            report::duplicates_table(
                &duplicates,
                &ctx.stock,
                &config.columns.stocktake,
                &config.duplicates.extra_columns,
            ),
        ),
        (
            ReportKind::Outstanding,
            report::outstanding_table(&outstanding, &ctx.master, &config.columns.master),
        ),
        (ReportKind::MissingShops, report::missing_shops_table(&missing)),
        (ReportKind::DailyRecords, report::records_table(&daily, &ctx.stock)),
        (ReportKind::JgRecords, report::records_table(&jg, &ctx.stock)),
    ];

    ReconReport {
        meta: ReconMeta {
            name: config.name.clone(),
            window: config.window,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            inputs: ctx.sources.clone(),
        },
        summary,
        reports: tables
            .into_iter()
            .map(|(kind, table)| ReportTable {
                kind,
                sheet: kind.sheet_name().to_string(),
                table,
            })
            .collect(),
    }
}

/// Duplicate check over a lone stocktake, with no schedule to join. Every
/// row's `Date` is empty.
pub fn run_duplicates(stock: &StockTable, cols: &StockColumns, extra_columns: &[String]) -> Table {
    let rows = check_duplicates(stock, &FilteredSchedule::default());
    report::duplicates_table(&rows, stock, cols, extra_columns)
}
