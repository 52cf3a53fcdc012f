//! `stockrecon run | validate | duplicates` — config-driven stocktake reconciliation.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use stockrecon_io::{read_table, write_table, ReadError};
use stockrecon_recon::config::{DuplicatesConfig, OutputFormat, StockColumns};
use stockrecon_recon::model::InputSource;
use stockrecon_recon::report::ReportKind;
use stockrecon_recon::{InputKind, ReconError, ReconReport, RunConfig, RunInputs, Table};

use crate::exit_codes::{recon_exit_code, EXIT_FINDINGS, EXIT_INVALID_CONFIG, EXIT_MISSING_INPUT};
use crate::render::render_table;
use crate::{CliError, FormatArg};

pub struct RunArgs {
    pub config: PathBuf,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub output_dir: Option<PathBuf>,
    pub format: Option<FormatArg>,
    pub json: bool,
    pub show: bool,
}

fn recon_err(err: ReconError) -> CliError {
    CliError::new(recon_exit_code(&err), err.to_string())
}

fn io_err(msg: String) -> CliError {
    recon_err(ReconError::Io(msg))
}

/// A workbook without the configured sheet has not supplied that table.
fn read_err(input: InputKind, path: &Path, err: ReadError) -> CliError {
    match &err {
        ReadError::SheetNotFound { .. } => recon_err(ReconError::MissingInput { input })
            .with_hint(format!("{}: {err}", path.display())),
        ReadError::Invalid(msg) => io_err(format!("cannot read {input}: {msg}")),
    }
}

fn read_config(path: &Path) -> Result<RunConfig, CliError> {
    let config_str = std::fs::read_to_string(path)
        .map_err(|e| io_err(format!("cannot read config {}: {e}", path.display())))?;
    RunConfig::from_toml(&config_str).map_err(recon_err)
}

/// Directory input and output paths in the config are relative to.
fn base_dir(config_path: &Path) -> &Path {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

// ============================================================================
// run
// ============================================================================

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let mut config = read_config(&args.config)?;

    if let Some(start) = args.start {
        config.window.start = start;
    }
    if let Some(end) = args.end {
        config.window.end = end;
    }
    if let Some(format) = args.format {
        config.output.format = match format {
            FormatArg::Xlsx => OutputFormat::Xlsx,
            FormatArg::Csv => OutputFormat::Csv,
        };
    }
    config.validate().map_err(|e| {
        recon_err(e).with_hint("check --start / --end against the config's [window]")
    })?;

    let base = base_dir(&args.config);
    let inputs = read_inputs(&config, base)?;
    let ctx = stockrecon_recon::load(inputs, &config.columns).map_err(recon_err)?;
    let report = stockrecon_recon::run(&config, &ctx);

    let out_dir = match (&args.output_dir, &config.output.dir) {
        (Some(dir), _) => dir.clone(),
        (None, Some(dir)) => base.join(dir),
        (None, None) => PathBuf::from("."),
    };
    write_reports(&report, &out_dir, config.output.format)?;

    if args.json {
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| io_err(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    if args.show {
        for r in &report.reports {
            println!("{}", render_table(r.kind.title(), &r.table));
        }
    }

    print_summary(&report);

    if report.summary.has_findings() {
        return Err(CliError::new(EXIT_FINDINGS, ""));
    }
    Ok(())
}

/// Confirm every input is configured and exists, then read them all.
/// Nothing is read until all four paths have been checked.
fn read_inputs(config: &RunConfig, base: &Path) -> Result<RunInputs, CliError> {
    let i = &config.inputs;
    let configured = [
        (InputKind::Stocktake, &i.stocktake, i.stocktake_sheet.as_deref()),
        (InputKind::Schedule, &i.schedule, Some(i.schedule_sheet.as_str())),
        (InputKind::Master, &i.master, i.master_sheet.as_deref()),
        (InputKind::Secondary, &i.secondary, i.secondary_sheet.as_deref()),
    ];

    let mut resolved: Vec<(InputKind, PathBuf, Option<&str>)> = Vec::with_capacity(configured.len());
    for (input, path, sheet) in configured {
        let Some(path) = path else {
            return Err(recon_err(ReconError::MissingInput { input })
                .with_hint(format!("set inputs.{input} in the config")));
        };
        let full = base.join(path);
        if !full.is_file() {
            return Err(CliError::new(
                EXIT_MISSING_INPUT,
                format!("missing input: {input} file not found: {}", full.display()),
            ));
        }
        resolved.push((input, full, sheet));
    }

    let mut inputs = RunInputs::default();
    for (input, path, sheet) in resolved {
        let loaded = read_table(&path, sheet).map_err(|e| read_err(input, &path, e))?;

        inputs.sources.push(InputSource {
            input,
            path: path.display().to_string(),
            sheet: loaded.sheet,
            blake3: loaded.blake3,
            rows: loaded.table.len(),
        });

        let slot = match input {
            InputKind::Stocktake => &mut inputs.stocktake,
            InputKind::Schedule => &mut inputs.schedule,
            InputKind::Master => &mut inputs.master,
            InputKind::Secondary => &mut inputs.secondary,
        };
        *slot = Some(loaded.table);
    }

    Ok(inputs)
}

/// Write each non-empty report as `<dir>/<stem>.<ext>`. An empty report
/// removes any file a previous run left under its name.
fn write_reports(report: &ReconReport, dir: &Path, format: OutputFormat) -> Result<(), CliError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| io_err(format!("cannot create {}: {e}", dir.display())))?;

    for r in &report.reports {
        let path = dir.join(format!("{}.{}", r.kind.file_stem(), format.extension()));
        if r.table.is_empty() {
            if path.is_file() {
                std::fs::remove_file(&path)
                    .map_err(|e| io_err(format!("cannot remove stale {}: {e}", path.display())))?;
                eprintln!("removed {}", path.display());
            } else {
                log::info!("{}: no rows, not written", r.kind);
            }
            continue;
        }
        write_table(&path, &r.sheet, &r.table)
            .map_err(|e| io_err(format!("cannot write {}: {e}", path.display())))?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn print_summary(report: &ReconReport) {
    let s = &report.summary;
    eprintln!(
        "stocktake '{}' {}: {} shop(s) scheduled",
        report.meta.name, report.meta.window, s.scheduled_shops,
    );
    eprintln!(
        "  quantity: {} group(s), {} inconsistent",
        s.quantity_groups, s.inconsistent_groups,
    );
    eprintln!("  duplicates: {}", s.duplicates);
    eprintln!("  JG outstanding: {}", s.outstanding);
    eprintln!("  missing shops: {}", s.missing_shops);
    eprintln!("  records: {} daily, {} JG", s.daily_records, s.jg_records);
}

// ============================================================================
// validate
// ============================================================================

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = read_config(&config_path)?;

    let i = &config.inputs;
    let missing: Vec<&str> = [
        ("stocktake", &i.stocktake),
        ("schedule", &i.schedule),
        ("master", &i.master),
        ("secondary", &i.secondary),
    ]
    .into_iter()
    .filter(|(_, p)| p.is_none())
    .map(|(name, _)| name)
    .collect();

    eprintln!(
        "valid: '{}' window {}, {} of 4 input(s) configured",
        config.name,
        config.window,
        4 - missing.len(),
    );

    if !missing.is_empty() {
        return Err(CliError::new(
            EXIT_INVALID_CONFIG,
            format!("no path for input(s): {}", missing.join(", ")),
        )
        .with_hint("a run needs all of stocktake, schedule, master and secondary"));
    }
    Ok(())
}

// ============================================================================
// duplicates
// ============================================================================

pub fn cmd_duplicates(file: PathBuf, sheet: Option<String>, output: Option<PathBuf>) -> Result<(), CliError> {
    if let Some(ref out) = output {
        let ext = out.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !ext.eq_ignore_ascii_case("xlsx") && !ext.eq_ignore_ascii_case("csv") {
            return Err(CliError::args(format!("unsupported output file: {}", out.display()))
                .with_hint("use a .xlsx or .csv extension"));
        }
    }

    if !file.is_file() {
        return Err(CliError::new(
            EXIT_MISSING_INPUT,
            format!("missing input: stocktake file not found: {}", file.display()),
        ));
    }

    let loaded = read_table(&file, sheet.as_deref())
        .map_err(|e| read_err(InputKind::Stocktake, &file, e))?;
    let cols = StockColumns::default();
    let stock = stockrecon_recon::loader::load_stock(loaded.table, &cols).map_err(recon_err)?;
    let table: Table =
        stockrecon_recon::run_duplicates(&stock, &cols, &DuplicatesConfig::default().extra_columns);

    match output {
        Some(path) => {
            write_table(&path, ReportKind::Duplicates.sheet_name(), &table)
                .map_err(|e| io_err(format!("cannot write {}: {e}", path.display())))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{}", render_table(ReportKind::Duplicates.title(), &table)),
    }

    eprintln!("duplicates: {} row(s) in {}", table.len(), file.display());

    if !table.is_empty() {
        return Err(CliError::new(EXIT_FINDINGS, ""));
    }
    Ok(())
}
