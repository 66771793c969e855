//! CLI definition and dispatch.
//!
//! Progress and diagnostics go to stderr; the report is the only stdout
//! output of a successful backtest run.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::backtest::{BacktestConfig, run_backtest};
use crate::domain::config_validation::{validate_backtest_config, validate_strategy_config};
use crate::domain::error::LowtideError;
use crate::domain::execution::Sizer;
use crate::domain::lowest_close::{DEFAULT_PERIOD, LowestCloseParams, LowestCloseStrategy};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "lowtide", about = "Lowest-close mean-reversion backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Also write the report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override the configured rolling-low period
        #[arg(long)]
        period: Option<usize>,
        /// Validate configuration and show resolved settings without running
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the date range of the configured data file
    Info {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            period,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, period)
            } else {
                run_backtest_command(&config, output.as_deref(), period)
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::Info { config } => run_info(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = LowtideError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn validated_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    let adapter = load_config(path)?;
    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return Err(ExitCode::from(&e));
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return Err(ExitCode::from(&e));
    }
    Ok(adapter)
}

/// Path of the configured data file. Validation guarantees presence.
pub fn data_path(adapter: &dyn ConfigPort) -> Result<PathBuf, LowtideError> {
    adapter
        .get_string("data", "path")
        .map(PathBuf::from)
        .ok_or_else(|| LowtideError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })
}

fn parse_config_date(
    adapter: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, LowtideError> {
    match adapter.get_string("backtest", key) {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map(Some).map_err(|_| {
            LowtideError::ConfigInvalid {
                section: "backtest".into(),
                key: key.into(),
                reason: "invalid date format (expected YYYY-MM-DD)".into(),
            }
        }),
        None => Ok(None),
    }
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, LowtideError> {
    let path = data_path(adapter)?;

    let symbol = adapter.get_string("data", "symbol").unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "UNNAMED".to_string())
    });

    Ok(BacktestConfig {
        symbol,
        initial_cash: adapter.get_float("backtest", "initial_cash", 1000.0),
        commission_pct: adapter.get_float("backtest", "commission_pct", 0.0),
        sizer: Sizer::PercentOfCash(adapter.get_float("backtest", "position_size", 100.0)),
        start_date: parse_config_date(adapter, "start_date")?,
        end_date: parse_config_date(adapter, "end_date")?,
    })
}

pub fn build_params(
    adapter: &dyn ConfigPort,
    period_override: Option<usize>,
) -> Result<LowestCloseParams, LowtideError> {
    let period = match period_override {
        Some(p) => p,
        None => adapter.get_int("strategy", "period", DEFAULT_PERIOD as i64) as usize,
    };

    if period == 0 {
        return Err(LowtideError::ConfigInvalid {
            section: "strategy".into(),
            key: "period".into(),
            reason: "must be >= 1".into(),
        });
    }

    Ok(LowestCloseParams { period })
}

fn run_backtest_command(
    config_path: &Path,
    output_path: Option<&Path>,
    period_override: Option<usize>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match validated_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let params = match build_params(&adapter, period_override) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let path = match data_path(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = CsvAdapter::new(path);

    run_backtest_pipeline(&data_port, &bt_config, params, output_path)
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    bt_config: &BacktestConfig,
    params: LowestCloseParams,
    output_path: Option<&Path>,
) -> ExitCode {
    let bars = match data_port.fetch_ohlcv(bt_config.start_date, bt_config.end_date) {
        Ok(bars) => bars,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Running backtest: {} bars of {}, period {}",
        bars.len(),
        bt_config.symbol,
        params.period,
    );
    if bars.len() < params.period {
        eprintln!(
            "warning: only {} bars; the {}-bar rolling low never becomes defined",
            bars.len(),
            params.period,
        );
    }

    let mut strategy = LowestCloseStrategy::new(params);
    if let Err(e) = run_backtest(&bars, &mut strategy, bt_config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let Some(report) = strategy.report() else {
        // on_run_complete always fires on a successful run.
        eprintln!("error: run completed without a report");
        return ExitCode::from(1);
    };

    println!("{report}");

    if let Some(output) = output_path {
        match TextReportAdapter.write(report, output) {
            Ok(()) => eprintln!("Report written to: {}", output.display()),
            Err(e) => {
                eprintln!("error: failed to write report: {e}");
                return (&e).into();
            }
        }
    }

    ExitCode::SUCCESS
}

pub fn run_dry_run(config_path: &Path, period_override: Option<usize>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match validated_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let params = match build_params(&adapter, period_override) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nResolved settings:");
    eprintln!("  symbol:         {}", bt_config.symbol);
    eprintln!("  initial cash:   {:.2}", bt_config.initial_cash);
    eprintln!("  commission:     {:.4}%", bt_config.commission_pct);
    eprintln!("  sizer:          {:?}", bt_config.sizer);
    eprintln!("  period:         {}", params.period);
    match (bt_config.start_date, bt_config.end_date) {
        (Some(start), Some(end)) => eprintln!("  date range:     {start} to {end}"),
        (Some(start), None) => eprintln!("  date range:     from {start}"),
        (None, Some(end)) => eprintln!("  date range:     until {end}"),
        (None, None) => eprintln!("  date range:     full series"),
    }

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    match validated_config(config_path) {
        Ok(_) => {
            eprintln!("Configuration is valid");
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}

fn run_info(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let path = match data_path(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = CsvAdapter::new(path.clone());
    match data_port.data_range() {
        Ok(Some((first, last, count))) => {
            println!("{}: {} bars, {} to {}", path.display(), count, first, last);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!("{}: no bars", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
