//! RSI (Relative Strength Index) over the trailing `period + 1` closes.
//!
//! The `period` bar-to-bar deltas are split into gains and loss magnitudes;
//! the first delta of the window is dropped before averaging.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100, unless avg_gain is also 0 (no movement): RSI = 50.

use crate::domain::indicator::{fallback_value, insufficient, mean};
use crate::domain::price::{PriceBar, closes};

pub fn calculate_rsi(bars: &[PriceBar], period: usize) -> f64 {
    if insufficient(bars, period + 1, &[period]) {
        return fallback_value(bars);
    }

    let prices = closes(&bars[bars.len() - period - 1..]);
    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();

    let gains: Vec<f64> = deltas[1..].iter().map(|d| d.max(0.0)).collect();
    let losses: Vec<f64> = deltas[1..].iter().map(|d| (-d).max(0.0)).collect();

    let avg_gain = mean(&gains);
    let avg_loss = mean(&losses);

    if avg_loss == 0.0 {
        // Without this, avg_loss == 0 reads 100 and a flat series would trip
        // the overbought threshold; no movement at all is neutral instead.
        if avg_gain == 0.0 {
            return 50.0;
        }
        return 100.0;
    }

    100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
}
