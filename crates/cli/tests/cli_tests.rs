// End-to-end tests for the stockrecon binary.
// Run with: cargo test -p stockrecon-cli --test cli_tests
//
// Each test builds its input workbooks in a temp dir, writes a config next
// to them, and checks exit codes, stderr summaries and written reports.

use std::path::Path;
use std::process::{Command, Output};

use chrono::NaiveDate;
use stockrecon_io::{read_table, write_table};
use stockrecon_recon::{CellValue, Table};
use tempfile::TempDir;

fn stockrecon() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_stockrecon"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run(dir: &Path, args: &[&str]) -> Output {
    stockrecon()
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to run stockrecon")
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn table(headers: &[&str], rows: Vec<Vec<CellValue>>) -> Table {
    let mut t = Table::with_headers(headers);
    for row in rows {
        t.push_row(row);
    }
    t
}

fn date(day: u32) -> CellValue {
    CellValue::Date(NaiveDate::from_ymd_opt(2025, 7, day).unwrap())
}

fn n(v: f64) -> CellValue {
    CellValue::Number(v)
}

fn stocktake() -> Table {
    table(
        &["SerialNo", "CMDB", "Shop.Name", "TotalQty", "Stock.Take.Status", "Brand"],
        vec![
            vec!["A100".into(), "CI-1".into(), "Shop Alpha".into(), n(1.0), "Verified".into(), "HP".into()],
            vec!["A101".into(), "CI-2".into(), "Shop Alpha".into(), n(2.0), "Verified".into(), "HP".into()],
            vec!["B200".into(), "CI-3".into(), "Shop Beta".into(), n(1.0), "Verified".into(), "Dell".into()],
        ],
    )
}

fn schedule() -> Table {
    table(
        &["Date", "ShopCode", "Shop.Name", "Available", "Main", "Assistant"],
        vec![
            vec![date(22), n(4134.0), "Shop Alpha".into(), "Y".into(), "Amy".into(), "Ben".into()],
            vec![date(23), "512".into(), "Shop Beta".into(), "Y".into(), "Cat".into(), "".into()],
            vec!["TBC".into(), "900".into(), "Shop Gamma".into(), "Y".into(), "".into(), "".into()],
        ],
    )
}

fn master(extra_unscanned: bool) -> Table {
    let mut rows: Vec<Vec<CellValue>> = vec![
        vec!["A100".into(), "04134".into(), "Y".into(), "Y".into()],
        vec!["B200".into(), "512".into(), "Y".into(), "Y".into()],
    ];
    if extra_unscanned {
        rows.push(vec!["J9".into(), "4134".into(), "Y".into(), "Y".into()]);
    }
    table(&["Serial No", "Shop Code", "From JG", "Stock Take"], rows)
}

fn secondary() -> Table {
    table(&["ShopName"], vec![vec!["Shop Alpha".into()], vec!["Shop Beta".into()]])
}

const CONFIG: &str = r#"
name = "Test stocktake"

[window]
start = "2025-07-22"
end = "2025-07-23"

[inputs]
stocktake = "Stocktake2.xlsx"
schedule = "Full Schedule with Contacts.xlsx"
master = "All3shops.xlsx"
secondary = "BBI Stocktake.csv"

[output]
dir = "out"
"#;

/// Write a clean set of inputs plus `daily.recon.toml`.
fn fixture(config: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path();
    write_table(&p.join("Stocktake2.xlsx"), "Sheet1", &stocktake()).unwrap();
    write_table(&p.join("Full Schedule with Contacts.xlsx"), "Schedule", &schedule()).unwrap();
    write_table(&p.join("All3shops.xlsx"), "Sheet1", &master(false)).unwrap();
    write_table(&p.join("BBI Stocktake.csv"), "Sheet1", &secondary()).unwrap();
    std::fs::write(p.join("daily.recon.toml"), config).unwrap();
    dir
}

// ============================================================================
// run
// ============================================================================

#[test]
fn clean_run_exits_zero_and_writes_records_only() {
    let dir = fixture(CONFIG);
    let out = run(dir.path(), &["run", "daily.recon.toml"]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));

    let out_dir = dir.path().join("out");
    assert!(out_dir.join("check_quantity.xlsx").exists());
    assert!(out_dir.join("daily_records.xlsx").exists());
    assert!(out_dir.join("JG_records.xlsx").exists());
    // Empty reports are not written
    assert!(!out_dir.join("duplicate_item.xlsx").exists());
    assert!(!out_dir.join("JG_outstanding.xlsx").exists());
    assert!(!out_dir.join("missing_shops.xlsx").exists());

    let err = stderr(&out);
    assert!(err.contains("2 shop(s) scheduled"), "stderr: {err}");
    assert!(err.contains("missing shops: 0"));
}

#[test]
fn findings_exit_one_and_reports_reload() {
    let dir = fixture(CONFIG);
    write_table(&dir.path().join("All3shops.xlsx"), "Sheet1", &master(true)).unwrap();

    let out = run(dir.path(), &["run", "daily.recon.toml"]);
    assert_eq!(out.status.code(), Some(1), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("JG outstanding: 1"));

    let loaded = read_table(&dir.path().join("out/JG_outstanding.xlsx"), None).unwrap();
    assert_eq!(loaded.sheet.as_deref(), Some("JG Outstanding"));
    assert_eq!(
        loaded.table.headers,
        vec!["Date", "Shop Code", "Serial No", "From JG", "Stock Take", "Main", "Assistant"]
    );
    assert_eq!(loaded.table.len(), 1);
    assert_eq!(loaded.table.rows[0][0], date(22));
    assert_eq!(loaded.table.rows[0][1], CellValue::Text("04134".into()));
    assert_eq!(loaded.table.rows[0][2], CellValue::Text("J9".into()));
}

#[test]
fn clean_rerun_removes_stale_report() {
    let dir = fixture(CONFIG);
    write_table(&dir.path().join("All3shops.xlsx"), "Sheet1", &master(true)).unwrap();
    let first = run(dir.path(), &["run", "daily.recon.toml"]);
    assert_eq!(first.status.code(), Some(1), "stderr: {}", stderr(&first));
    let stale = dir.path().join("out/JG_outstanding.xlsx");
    assert!(stale.exists());

    write_table(&dir.path().join("All3shops.xlsx"), "Sheet1", &master(false)).unwrap();
    let second = run(dir.path(), &["run", "daily.recon.toml"]);
    assert_eq!(second.status.code(), Some(0), "stderr: {}", stderr(&second));
    assert!(stderr(&second).contains("JG outstanding: 0"));
    assert!(!stale.exists(), "previous run's report must not survive a clean run");
    assert!(dir.path().join("out/check_quantity.xlsx").exists());
}

#[test]
fn cli_flags_override_window_and_format() {
    let dir = fixture(CONFIG);
    let out = run(
        dir.path(),
        &["run", "daily.recon.toml", "--start", "2025-07-23", "--end", "2025-07-23", "--format", "csv", "--output-dir", "csv-out"],
    );
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));

    let quantity = std::fs::read_to_string(dir.path().join("csv-out/check_quantity.csv")).unwrap();
    let lines: Vec<&str> = quantity.lines().collect();
    assert_eq!(lines, vec!["Shop.Name,max_qty,row_count,check", "Shop Beta,1,1,TRUE"]);
}

#[test]
fn json_output_carries_meta_and_fingerprints() {
    let dir = fixture(CONFIG);
    let out = run(dir.path(), &["run", "daily.recon.toml", "--json"]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["meta"]["name"], "Test stocktake");
    assert_eq!(json["meta"]["window"]["end"], "2025-07-23");
    let inputs = json["meta"]["inputs"].as_array().unwrap();
    assert_eq!(inputs.len(), 4);
    assert_eq!(inputs[1]["input"], "schedule");
    assert_eq!(inputs[1]["sheet"], "Schedule");
    assert_eq!(inputs[0]["blake3"].as_str().unwrap().len(), 64);
    assert_eq!(json["reports"].as_array().unwrap().len(), 6);
}

#[test]
fn show_prints_text_tables() {
    let dir = fixture(CONFIG);
    let out = run(dir.path(), &["run", "daily.recon.toml", "--show"]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("== Check Quantity (2 rows) =="), "stdout: {stdout}");
    assert!(stdout.contains("== Shops Missing From Secondary Inventory (0 rows) =="));
}

#[test]
fn missing_input_path_exits_three() {
    let config = CONFIG.replace("master = \"All3shops.xlsx\"\n", "");
    let dir = fixture(&config);
    let out = run(dir.path(), &["run", "daily.recon.toml"]);
    assert_eq!(out.status.code(), Some(3));
    let err = stderr(&out);
    assert!(err.contains("the master table was not supplied"), "stderr: {err}");
    assert!(err.contains("hint:  set inputs.master"));
    assert!(!dir.path().join("out").exists(), "no partial output");
}

#[test]
fn missing_input_file_exits_three() {
    let dir = fixture(CONFIG);
    std::fs::remove_file(dir.path().join("BBI Stocktake.csv")).unwrap();
    let out = run(dir.path(), &["run", "daily.recon.toml"]);
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("secondary file not found"));
}

#[test]
fn schedule_without_named_sheet_exits_three() {
    let dir = fixture(CONFIG);
    write_table(&dir.path().join("Full Schedule with Contacts.xlsx"), "Plan", &schedule()).unwrap();
    let out = run(dir.path(), &["run", "daily.recon.toml"]);
    assert_eq!(out.status.code(), Some(3));
    let err = stderr(&out);
    assert!(err.contains("the schedule table was not supplied"), "stderr: {err}");
    assert!(err.contains("Sheet 'Schedule' not found (available: Plan)"));
    assert!(!dir.path().join("out").exists(), "no partial output");
}

#[test]
fn unreadable_input_exits_six() {
    let dir = fixture(CONFIG);
    std::fs::write(dir.path().join("All3shops.xlsx"), b"not a workbook").unwrap();
    let out = run(dir.path(), &["run", "daily.recon.toml"]);
    assert_eq!(out.status.code(), Some(6));
    assert!(stderr(&out).contains("IO error: cannot read master"));
}

#[test]
fn missing_column_exits_four() {
    let dir = fixture(CONFIG);
    let bad = table(&["Shop"], vec![vec!["Shop Alpha".into()]]);
    write_table(&dir.path().join("BBI Stocktake.csv"), "Sheet1", &bad).unwrap();
    let out = run(dir.path(), &["run", "daily.recon.toml"]);
    assert_eq!(out.status.code(), Some(4));
    assert!(stderr(&out).contains("secondary table has no column 'ShopName'"));
}

#[test]
fn inverted_window_exits_five() {
    let dir = fixture(CONFIG);
    let out = run(dir.path(), &["run", "daily.recon.toml", "--start", "2025-07-30"]);
    assert_eq!(out.status.code(), Some(5));
    assert!(stderr(&out).contains("after end"));
}

#[test]
fn bad_date_flag_is_usage_error() {
    let dir = fixture(CONFIG);
    let out = run(dir.path(), &["run", "daily.recon.toml", "--start", "TBC"]);
    assert_eq!(out.status.code(), Some(2));
}

// ============================================================================
// validate
// ============================================================================

#[test]
fn validate_accepts_complete_config() {
    let dir = fixture(CONFIG);
    let out = run(dir.path(), &["validate", "daily.recon.toml"]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("valid: 'Test stocktake' window 2025-07-22..=2025-07-23, 4 of 4"));
}

#[test]
fn validate_rejects_bad_toml() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bad.recon.toml"), "[window\nstart = 1").unwrap();
    let out = run(dir.path(), &["validate", "bad.recon.toml"]);
    assert_eq!(out.status.code(), Some(5));
    assert!(stderr(&out).contains("config parse error"));
}

// ============================================================================
// duplicates
// ============================================================================

#[test]
fn duplicates_mode_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let stock = table(
        &["SerialNo", "CMDB", "Shop.Name", "TotalQty", "Stock.Take.Status"],
        vec![
            vec!["A100".into(), "CI-1".into(), "Shop Alpha".into(), n(1.0), "Verified".into()],
            vec!["A100".into(), "CI-2".into(), "Shop Beta".into(), n(1.0), "Verified".into()],
            vec!["ABC".into(), "Device Not Found".into(), "Shop Beta".into(), n(2.0), "Verified".into()],
            vec!["ABC".into(), "Device Not Found".into(), "Shop Alpha".into(), n(2.0), "Verified".into()],
        ],
    );
    write_table(&dir.path().join("stock.xlsx"), "Sheet1", &stock).unwrap();

    let out = run(dir.path(), &["duplicates", "stock.xlsx", "--output", "dups.xlsx"]);
    assert_eq!(out.status.code(), Some(1), "stderr: {}", stderr(&out));

    let loaded = read_table(&dir.path().join("dups.xlsx"), None).unwrap();
    assert_eq!(loaded.sheet.as_deref(), Some("Duplicates"));
    assert_eq!(loaded.table.len(), 2);
    assert_eq!(loaded.table.headers[0], "Duplicate_Type");
    assert!(loaded.table.rows.iter().all(|r| r[1].is_empty()));
}

#[test]
fn duplicates_mode_clean_file_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    write_table(&dir.path().join("stock.csv"), "Sheet1", &stocktake()).unwrap();
    let out = run(dir.path(), &["duplicates", "stock.csv"]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("(0 rows)"));
}

#[test]
fn duplicates_mode_rejects_unknown_output_extension() {
    let dir = tempfile::tempdir().unwrap();
    write_table(&dir.path().join("stock.csv"), "Sheet1", &stocktake()).unwrap();
    let out = run(dir.path(), &["duplicates", "stock.csv", "--output", "dups.pdf"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("use a .xlsx or .csv extension"));
}
