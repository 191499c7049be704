//! Configuration validation.
//!
//! Reads the `[backtest]` section into typed settings and provides the typed
//! value readers the strategy catalog uses. An absent or blank key takes its
//! default; a present but malformed value is an error.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::SignalbenchError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const BACKTEST_SECTION: &str = "backtest";

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestSettings {
    pub config: BacktestConfig,
    pub codes: Vec<String>,
    pub data_dir: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Loads and validates `[backtest]`. `codes` may be empty here; callers that
/// need symbols check it after applying command-line overrides.
pub fn load_backtest_settings(config: &dyn ConfigPort) -> Result<BacktestSettings, SignalbenchError> {
    let defaults = BacktestConfig::default();
    let initial_balance = read_f64(config, BACKTEST_SECTION, "initial_balance", defaults.initial_balance)?;
    if initial_balance <= 0.0 {
        return Err(SignalbenchError::invalid(
            BACKTEST_SECTION,
            "initial_balance",
            "initial_balance must be positive",
        ));
    }
    let multiplier = read_f64(config, BACKTEST_SECTION, "multiplier", defaults.multiplier)?;
    if multiplier <= 0.0 {
        return Err(SignalbenchError::invalid(
            BACKTEST_SECTION,
            "multiplier",
            "multiplier must be positive",
        ));
    }
    let skip_zero_volume = read_bool(config, BACKTEST_SECTION, "skip_zero_volume", false)?;

    let start_date = read_date(config, BACKTEST_SECTION, "start_date")?;
    let end_date = read_date(config, BACKTEST_SECTION, "end_date")?;
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            return Err(SignalbenchError::invalid(
                BACKTEST_SECTION,
                "start_date",
                "start_date must not be after end_date",
            ));
        }
    }

    let data_dir = config
        .get_string(BACKTEST_SECTION, "data_dir")
        .filter(|s| !s.trim().is_empty());

    Ok(BacktestSettings {
        config: BacktestConfig {
            initial_balance,
            multiplier,
            skip_zero_volume,
        },
        codes: config.get_list(BACKTEST_SECTION, "codes"),
        data_dir,
        start_date,
        end_date,
    })
}

fn raw(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Finite float, or `default` when absent.
pub fn read_f64(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, SignalbenchError> {
    match raw(config, section, key) {
        None => Ok(default),
        Some(v) => v
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .ok_or_else(|| SignalbenchError::invalid(section, key, format!("'{}' is not a number", v))),
    }
}

/// Strictly positive integer, or `default` when absent.
pub fn read_period(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, SignalbenchError> {
    match raw(config, section, key) {
        None => Ok(default),
        Some(v) => match v.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(SignalbenchError::invalid(
                section,
                key,
                format!("'{}' is not a positive integer", v),
            )),
        },
    }
}

pub fn read_bool(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: bool,
) -> Result<bool, SignalbenchError> {
    match raw(config, section, key) {
        None => Ok(default),
        Some(v) => match v.to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            _ => Err(SignalbenchError::invalid(
                section,
                key,
                format!("'{}' is not a boolean", v),
            )),
        },
    }
}

pub fn read_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<NaiveDate>, SignalbenchError> {
    raw(config, section, key)
        .map(|v| {
            NaiveDate::parse_from_str(&v, "%Y-%m-%d").map_err(|_| {
                SignalbenchError::invalid(
                    section,
                    key,
                    format!("invalid {} format, expected YYYY-MM-DD", key),
                )
            })
        })
        .transpose()
}
