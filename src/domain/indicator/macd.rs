//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(short) - EMA(long), both over the full close series
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: short=12, long=26, signal=9
//! Lookback: long + signal - 1 bars.

use crate::domain::indicator::{IndicatorType, ema_series, fallback_value, insufficient};
use crate::domain::price::{PriceBar, closes};

pub const DEFAULT_SHORT: usize = 12;
pub const DEFAULT_LONG: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn calculate_macd(bars: &[PriceBar], short: usize, long: usize, signal: usize) -> Macd {
    let lookback = IndicatorType::Macd {
        fast: short,
        slow: long,
        signal,
    }
    .lookback();
    if insufficient(bars, lookback, &[short, long, signal]) {
        let v = fallback_value(bars);
        return Macd {
            line: vec![v],
            signal: vec![v],
            histogram: vec![0.0],
        };
    }

    let prices = closes(bars);
    let ema_short = ema_series(&prices, short);
    let ema_long = ema_series(&prices, long);

    let line: Vec<f64> = ema_short
        .iter()
        .zip(&ema_long)
        .map(|(s, l)| s - l)
        .collect();
    let signal_line = ema_series(&line, signal);

    // Both series span every bar, so the tail alignment is the whole series.
    let offset = line.len() - signal_line.len();
    let histogram: Vec<f64> = line[offset..]
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    Macd {
        line: line[offset..].to_vec(),
        signal: signal_line,
        histogram,
    }
}
