//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{BacktestResult, ledger_span, run_fresh};
use crate::domain::catalog::{NamedStrategy, build_strategies};
use crate::domain::config_validation::{BacktestSettings, load_backtest_settings};
use crate::domain::error::SignalbenchError;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "signalbench", about = "Indicator strategy backtester")]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every configured strategy over every configured symbol
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory of <SYMBOL>.csv files; overrides [backtest] data_dir
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Comma-separated symbols; overrides [backtest] codes
        #[arg(long)]
        code: Option<String>,
        /// Write one <SYMBOL>_<section>.csv ledger per run into this directory
        #[arg(long)]
        ledger_dir: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file and its strategy sections
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in a data directory
    ListSymbols {
        #[arg(long)]
        data_dir: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest {
            config,
            data_dir,
            code,
            ledger_dir,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, code.as_deref())
            } else {
                run_backtest_command(
                    &config,
                    data_dir.as_deref(),
                    code.as_deref(),
                    ledger_dir.as_deref(),
                )
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { data_dir } => run_list_symbols(&data_dir),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Splits a comma-separated symbol list, uppercased, blanks dropped.
pub fn parse_codes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .collect()
}

/// `--code` wins over `[backtest] codes`.
pub fn resolve_codes(
    code_override: Option<&str>,
    settings: &BacktestSettings,
) -> Result<Vec<String>, SignalbenchError> {
    let codes = match code_override {
        Some(raw) => parse_codes(raw),
        None => parse_codes(&settings.codes.join(",")),
    };
    if codes.is_empty() {
        return Err(SignalbenchError::missing("backtest", "codes"));
    }
    Ok(codes)
}

/// `--data-dir` wins over `[backtest] data_dir`, which defaults to `data`.
pub fn resolve_data_dir(data_dir_override: Option<&Path>, settings: &BacktestSettings) -> PathBuf {
    data_dir_override
        .map(Path::to_path_buf)
        .or_else(|| settings.data_dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn load_config(path: &Path) -> Result<FileConfigAdapter, SignalbenchError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

/// Fetches each symbol and runs every strategy over it, symbol-major.
///
/// Symbols without data are skipped with a warning; the pipeline fails only
/// when no symbol could be loaded.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    strategies: &mut [NamedStrategy],
    settings: &BacktestSettings,
    codes: &[String],
) -> Result<Vec<(String, BacktestResult)>, SignalbenchError> {
    let mut results = Vec::with_capacity(codes.len() * strategies.len());
    let mut loaded = 0usize;

    for code in codes {
        let series = match data_port.fetch_series(code, settings.start_date, settings.end_date) {
            Ok(series) if !series.is_empty() => series,
            Ok(_) => {
                warn!(symbol = %code, "skipping symbol: no bars in range");
                continue;
            }
            Err(e) => {
                warn!(symbol = %code, error = %e, "skipping symbol");
                continue;
            }
        };
        loaded += 1;
        info!(symbol = %code, bars = series.len(), "replaying");

        for named in strategies.iter_mut() {
            let result = run_fresh(named.strategy.as_mut(), &series, &settings.config);
            results.push((named.section.clone(), result));
        }
    }

    if loaded == 0 {
        return Err(SignalbenchError::Data {
            reason: "no valid symbols with data to backtest".into(),
        });
    }
    Ok(results)
}

pub fn format_result(result: &BacktestResult) -> String {
    let span = match ledger_span(&result.ledger) {
        Some((first, last)) => format!(" span={}..{}", first.date(), last.date()),
        None => String::new(),
    };
    format!(
        "{:<8} {:<32} trades={:<5} filled={:<5} final={:.2} with_holdings={:.2} profit={:+.2} profit_with_holdings={:+.2}{}",
        result.symbol,
        result.strategy,
        result.trade_count,
        result.filled_trades(),
        result.final_balance,
        result.final_balance_with_holdings,
        result.profit,
        result.profit_with_holdings,
        span,
    )
}

pub fn ledger_path(dir: &Path, symbol: &str, section: &str) -> PathBuf {
    dir.join(format!("{}_{}.csv", symbol, section))
}

fn run_backtest_command(
    config_path: &Path,
    data_dir_override: Option<&Path>,
    code_override: Option<&str>,
    ledger_dir: Option<&Path>,
) -> Result<(), SignalbenchError> {
    let adapter = load_config(config_path)?;
    let settings = load_backtest_settings(&adapter)?;
    let mut strategies = build_strategies(&adapter)?;
    let codes = resolve_codes(code_override, &settings)?;
    let data_dir = resolve_data_dir(data_dir_override, &settings);

    info!(
        symbols = codes.len(),
        strategies = strategies.len(),
        data_dir = %data_dir.display(),
        "running backtests"
    );

    let data_port = CsvAdapter::new(data_dir);
    let results = run_backtest_pipeline(&data_port, &mut strategies, &settings, &codes)?;

    if let Some(dir) = ledger_dir {
        std::fs::create_dir_all(dir)?;
    }
    for (section, result) in &results {
        println!("{}", format_result(result));
        if let Some(dir) = ledger_dir {
            let path = ledger_path(dir, &result.symbol, section);
            CsvAdapter::write_ledger(&path, &result.ledger)?;
            info!(path = %path.display(), "ledger written");
        }
    }
    Ok(())
}

fn run_dry_run(config_path: &Path, code_override: Option<&str>) -> Result<(), SignalbenchError> {
    let adapter = load_config(config_path)?;
    let settings = load_backtest_settings(&adapter)?;
    let strategies = build_strategies(&adapter)?;
    let codes = resolve_codes(code_override, &settings)?;

    println!("Configuration is valid");
    println!(
        "initial_balance={} multiplier={} skip_zero_volume={}",
        settings.config.initial_balance, settings.config.multiplier, settings.config.skip_zero_volume
    );
    println!("Symbols: {}", codes.join(", "));
    println!("Strategies:");
    for named in &strategies {
        print_strategy(named);
    }
    Ok(())
}

fn print_strategy(named: &NamedStrategy) {
    let indicators: Vec<String> = named
        .strategy
        .indicators()
        .iter()
        .map(|i| i.to_string())
        .collect();
    println!(
        "  [{}] {} ({})",
        named.section,
        named.strategy.name(),
        indicators.join(", ")
    );
}

fn run_validate(config_path: &Path) -> Result<(), SignalbenchError> {
    let adapter = load_config(config_path)?;
    load_backtest_settings(&adapter)?;
    let strategies = build_strategies(&adapter)?;

    for named in &strategies {
        print_strategy(named);
    }
    println!("{} strategies valid", strategies.len());
    Ok(())
}

fn run_list_symbols(data_dir: &Path) -> Result<(), SignalbenchError> {
    let adapter = CsvAdapter::new(data_dir.to_path_buf());
    let symbols = adapter.list_symbols()?;
    if symbols.is_empty() {
        warn!(data_dir = %data_dir.display(), "no symbols found");
    }
    for symbol in &symbols {
        println!("{}", symbol);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::{BacktestConfig, run_backtest};
    use crate::domain::strategy::MovingAverageCrossover;

    fn settings(codes: &[&str], data_dir: Option<&str>) -> BacktestSettings {
        BacktestSettings {
            config: BacktestConfig::default(),
            codes: codes.iter().map(|c| c.to_string()).collect(),
            data_dir: data_dir.map(str::to_string),
            start_date: None,
            end_date: None,
        }
    }

    #[test]
    fn parse_codes_normalizes() {
        assert_eq!(parse_codes(" aapl, msft ,,"), vec!["AAPL", "MSFT"]);
        assert!(parse_codes(" , ").is_empty());
    }

    #[test]
    fn code_override_wins() {
        let s = settings(&["AAPL"], None);
        assert_eq!(resolve_codes(Some("bhp"), &s).unwrap(), vec!["BHP"]);
        assert_eq!(resolve_codes(None, &s).unwrap(), vec!["AAPL"]);
    }

    #[test]
    fn no_codes_is_a_config_error() {
        let err = resolve_codes(None, &settings(&[], None)).unwrap_err();
        assert!(matches!(err, SignalbenchError::ConfigMissing { .. }));
    }

    #[test]
    fn data_dir_resolution_order() {
        let s = settings(&[], Some("bars"));
        assert_eq!(
            resolve_data_dir(Some(Path::new("/tmp/x")), &s),
            PathBuf::from("/tmp/x")
        );
        assert_eq!(resolve_data_dir(None, &s), PathBuf::from("bars"));
        assert_eq!(
            resolve_data_dir(None, &settings(&[], None)),
            PathBuf::from("data")
        );
    }

    #[test]
    fn ledger_file_names() {
        assert_eq!(
            ledger_path(Path::new("out"), "AAPL", "ma_crossover"),
            PathBuf::from("out/AAPL_ma_crossover.csv")
        );
    }

    #[test]
    fn result_line_without_trades_has_no_span() {
        let mut strategy = MovingAverageCrossover::new(2, 4);
        let result = run_backtest(&mut strategy, "AAPL", &[], &BacktestConfig::default());
        let line = format_result(&result);
        assert!(line.starts_with("AAPL"));
        assert!(line.contains("trades=0"));
        assert!(line.contains("filled=0"));
        assert!(!line.contains("span="));
    }

    #[test]
    fn cli_parses_backtest_flags() {
        let cli = Cli::try_parse_from([
            "signalbench",
            "-vv",
            "backtest",
            "-c",
            "bench.ini",
            "--code",
            "AAPL",
            "--ledger-dir",
            "out",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Backtest {
                config,
                code,
                ledger_dir,
                dry_run,
                data_dir,
            } => {
                assert_eq!(config, PathBuf::from("bench.ini"));
                assert_eq!(code.as_deref(), Some("AAPL"));
                assert_eq!(ledger_dir, Some(PathBuf::from("out")));
                assert!(dry_run);
                assert!(data_dir.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
