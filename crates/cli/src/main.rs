// stockrecon CLI - stocktake reconciliation runs from a TOML config

mod exit_codes;
mod recon;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "stockrecon")]
#[command(about = "Stocktake reconciliation: quantity, duplicate, outstanding and missing-shop checks")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every check for the configured visit window and write the reports
    #[command(after_help = "\
Examples:
  stockrecon run daily.recon.toml
  stockrecon run daily.recon.toml --start 2025-07-22 --end 2025-07-23
  stockrecon run daily.recon.toml --output-dir out --format csv
  stockrecon run daily.recon.toml --json > report.json
  stockrecon run daily.recon.toml --show

Exit codes:
  0  no findings
  1  findings (inconsistent quantities, duplicates, outstanding items, missing shops)
  3  missing input    4  missing column    5  invalid config    6  I/O error")]
    Run {
        /// Path to the .recon.toml config file
        config: PathBuf,

        /// First visit date of the window (overrides window.start)
        #[arg(long, value_name = "YYYY-MM-DD")]
        start: Option<NaiveDate>,

        /// Last visit date of the window, inclusive (overrides window.end)
        #[arg(long, value_name = "YYYY-MM-DD")]
        end: Option<NaiveDate>,

        /// Directory for report files (overrides output.dir)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Report file format (overrides output.format)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Print the full report as JSON to stdout
        #[arg(long, conflicts_with = "show")]
        json: bool,

        /// Print each report as a text table to stdout
        #[arg(long)]
        show: bool,
    },

    /// Parse and validate a config without reading any input
    #[command(after_help = "\
Examples:
  stockrecon validate daily.recon.toml")]
    Validate {
        /// Path to the .recon.toml config file
        config: PathBuf,
    },

    /// Duplicate SerialNo / CMDB check on a single stocktake file
    #[command(after_help = "\
Examples:
  stockrecon duplicates Stocktake2.xlsx
  stockrecon duplicates Stocktake2.xlsx --output duplicate_item.xlsx")]
    Duplicates {
        /// Stocktake file (.xlsx, .xls, .ods, .csv)
        file: PathBuf,

        /// Sheet to read (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Write the report here (.xlsx or .csv) instead of printing it
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Xlsx,
    Csv,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // try_init also bridges `log` records from the library crates. It only
    // fails if a subscriber is already installed, which leaves logging working.
    let _ = tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run { config, start, end, output_dir, format, json, show } => {
            recon::cmd_run(recon::RunArgs { config, start, end, output_dir, format, json, show })
        }
        Commands::Validate { config } => recon::cmd_validate(config),
        Commands::Duplicates { file, sheet, output } => recon::cmd_duplicates(file, sheet, output),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
