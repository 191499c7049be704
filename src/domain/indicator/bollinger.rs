//! Bollinger Bands over the trailing `period` closes.
//!
//! - Middle: Simple Moving Average
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the population standard deviation (divides by N, not N-1).

use crate::domain::indicator::{fallback_value, insufficient, mean};
use crate::domain::price::{PriceBar, closes};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub middle: f64,
    pub upper: f64,
    pub lower: f64,
}

impl BollingerBands {
    fn flat(value: f64) -> Self {
        BollingerBands {
            middle: value,
            upper: value,
            lower: value,
        }
    }
}

pub fn calculate_bollinger(bars: &[PriceBar], period: usize, multiplier: f64) -> BollingerBands {
    if insufficient(bars, period, &[period]) {
        return BollingerBands::flat(fallback_value(bars));
    }

    let window = closes(&bars[bars.len() - period..]);
    let middle = mean(&window);
    let variance = window
        .iter()
        .map(|c| {
            let diff = c - middle;
            diff * diff
        })
        .sum::<f64>()
        / period as f64;
    let stddev = variance.sqrt();

    BollingerBands {
        middle,
        upper: middle + multiplier * stddev,
        lower: middle - multiplier * stddev,
    }
}
