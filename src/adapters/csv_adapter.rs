//! CSV file data adapter.
//!
//! Reads `<dir>/<SYMBOL>.csv` files with the header
//! `date,open,high,low,close,volume` and writes trade ledgers back out.

use crate::domain::broker::TradeRecord;
use crate::domain::error::SignalbenchError;
use crate::domain::price::{PriceBar, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    /// Writes `ledger` as `time,type,symbol,price,volume,status`.
    pub fn write_ledger(path: &Path, ledger: &[TradeRecord]) -> Result<(), SignalbenchError> {
        let mut wtr = csv::Writer::from_path(path).map_err(|e| SignalbenchError::Data {
            reason: format!("failed to create {}: {}", path.display(), e),
        })?;
        let write_err = |e: csv::Error| SignalbenchError::Data {
            reason: format!("failed to write {}: {}", path.display(), e),
        };

        wtr.write_record(["time", "type", "symbol", "price", "volume", "status"])
            .map_err(write_err)?;
        for record in ledger {
            wtr.write_record([
                record.timestamp.format(TIME_FORMAT).to_string(),
                record.side.to_string(),
                record.symbol.clone(),
                record.price.to_string(),
                record.volume.to_string(),
                record.status.to_string(),
            ])
            .map_err(write_err)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, TIME_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_field(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, SignalbenchError> {
    let raw = record.get(index).ok_or_else(|| SignalbenchError::Data {
        reason: format!("missing {} column", name),
    })?;
    raw.trim().parse().map_err(|e| SignalbenchError::Data {
        reason: format!("invalid {} value '{}': {}", name, raw, e),
    })
}

fn parse_price(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, SignalbenchError> {
    let value = parse_field(record, index, name)?;
    if !value.is_finite() || value < 0.0 {
        return Err(SignalbenchError::Data {
            reason: format!("{} must be a non-negative number, got {}", name, value),
        });
    }
    Ok(value)
}

impl DataPort for CsvAdapter {
    fn fetch_series(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, SignalbenchError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SignalbenchError::NoData {
                symbol: symbol.to_string(),
            },
            _ => SignalbenchError::Data {
                reason: format!("failed to read {}: {}", path.display(), e),
            },
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| SignalbenchError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = record.get(0).ok_or_else(|| SignalbenchError::Data {
                reason: "missing date column".into(),
            })?;
            let timestamp = parse_timestamp(date_str).ok_or_else(|| SignalbenchError::Data {
                reason: format!("invalid date '{}'", date_str),
            })?;

            let date = timestamp.date();
            if start_date.is_some_and(|s| date < s) || end_date.is_some_and(|e| date > e) {
                continue;
            }

            bars.push(PriceBar {
                timestamp,
                open: parse_price(&record, 1, "open")?,
                high: parse_price(&record, 2, "high")?,
                low: parse_price(&record, 3, "low")?,
                close: parse_price(&record, 4, "close")?,
                volume: parse_field(&record, 5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(PriceSeries::from_bars(symbol, bars))
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalbenchError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SignalbenchError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                if !symbol.is_empty() {
                    symbols.push(symbol.to_string());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
