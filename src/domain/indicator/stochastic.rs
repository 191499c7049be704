//! Stochastic Oscillator.
//!
//! Highest high / lowest low are taken once over the trailing `period` bars and
//! held fixed for the whole call. %K is produced for every bar from index
//! `period` onward; %D[j] is the mean of %K[j..=j+2]. When %K has fewer than
//! three points, %D holds only the latest %K.

use crate::domain::indicator::{fallback_value, insufficient, mean};
use crate::domain::price::PriceBar;

#[derive(Debug, Clone, PartialEq)]
pub struct Stochastic {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

/// %K reported when the reference window has no range.
const NO_RANGE_K: f64 = 50.0;

pub fn calculate_stochastic(bars: &[PriceBar], period: usize) -> Stochastic {
    if insufficient(bars, period, &[period]) {
        let v = fallback_value(bars);
        return Stochastic {
            k: vec![v],
            d: vec![v],
        };
    }

    let reference = &bars[bars.len() - period..];
    let highest_high = reference
        .iter()
        .map(|b| b.high)
        .fold(f64::NEG_INFINITY, f64::max);
    let lowest_low = reference.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let range = highest_high - lowest_low;

    let k: Vec<f64> = bars[period..]
        .iter()
        .map(|b| {
            if range == 0.0 {
                NO_RANGE_K
            } else {
                (b.close - lowest_low) / range * 100.0
            }
        })
        .collect();

    let mut d: Vec<f64> = k.windows(3).map(mean).collect();
    if d.is_empty() {
        if let Some(&last) = k.last() {
            d.push(last);
        }
    }

    Stochastic { k, d }
}
