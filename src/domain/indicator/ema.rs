//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with the mean of the first n values, then
//! EMA[i] = x[i]*k + EMA[i-1]*(1-k).
//! The first n entries all carry the seed.

use crate::domain::indicator::{fallback_value, insufficient, mean};
use crate::domain::price::{PriceBar, closes};

/// EMA over a plain value buffer. Output has the same length as `values`.
pub fn ema_series(values: &[f64], window: usize) -> Vec<f64> {
    if values.is_empty() || window == 0 {
        return Vec::new();
    }

    let seed_len = window.min(values.len());
    let seed = mean(&values[..seed_len]);
    let k = 2.0 / (window as f64 + 1.0);

    let mut out = Vec::with_capacity(values.len());
    out.resize(seed_len, seed);

    let mut ema = seed;
    for &x in &values[seed_len..] {
        ema = k * x + (1.0 - k) * ema;
        out.push(ema);
    }
    out
}

/// EMA of closes, one value per bar.
pub fn calculate_ema(bars: &[PriceBar], window: usize) -> Vec<f64> {
    if insufficient(bars, window, &[window]) {
        return vec![fallback_value(bars)];
    }
    ema_series(&closes(bars), window)
}
