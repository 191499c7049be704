#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use signalbench::domain::error::SignalbenchError;
use signalbench::domain::price::{PriceBar, PriceSeries};
use signalbench::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, SignalbenchError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SignalbenchError::Data {
                reason: reason.clone(),
            });
        }
        let bars = self.data.get(symbol).ok_or_else(|| SignalbenchError::NoData {
            symbol: symbol.to_string(),
        })?;
        let bars = bars
            .iter()
            .filter(|b| {
                let d = b.timestamp.date();
                start_date.is_none_or(|s| d >= s) && end_date.is_none_or(|e| d <= e)
            })
            .cloned()
            .collect();
        Ok(PriceSeries::from_bars(symbol, bars))
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalbenchError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn day(i: usize) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::days(i as i64)
}

pub fn make_bar(i: usize, high: f64, low: f64, close: f64) -> PriceBar {
    PriceBar {
        timestamp: day(i),
        open: close,
        high,
        low,
        close,
        volume: 1_000.0,
    }
}

pub fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(i, c, c, c))
        .collect()
}

pub fn flat_bars(n: usize, price: f64) -> Vec<PriceBar> {
    bars_from_closes(&vec![price; n])
}

/// Closes whose 2/4-bar SMAs start with the short below the long at bar 3,
/// cross upward at bar 7 and cross downward at bar 11.
pub const CROSSING_CLOSES: [f64; 13] = [
    10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 6.0, 8.0, 10.0, 12.0, 9.0, 5.0, 4.0,
];

/// Writes `<dir>/<symbol>.csv` from `bars`.
pub fn write_csv(dir: &std::path::Path, symbol: &str, bars: &[PriceBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.timestamp.format("%Y-%m-%d"),
            b.open,
            b.high,
            b.low,
            b.close,
            b.volume
        ));
    }
    std::fs::write(dir.join(format!("{}.csv", symbol)), content).unwrap();
}
