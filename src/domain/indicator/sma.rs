//! Simple Moving Average: arithmetic mean of the last `window` closes.

use crate::domain::indicator::{fallback_value, insufficient, mean};
use crate::domain::price::{PriceBar, closes};

pub fn calculate_sma(bars: &[PriceBar], window: usize) -> f64 {
    if insufficient(bars, window, &[window]) {
        return fallback_value(bars);
    }
    mean(&closes(&bars[bars.len() - window..]))
}
