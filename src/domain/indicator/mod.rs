//! Technical indicator implementations.
//!
//! Every indicator is a pure function over a bar window. When the window is
//! shorter than the indicator's lookback it degrades instead of failing:
//! - non-empty window: every output is the last bar's close (a flat line)
//! - empty window: every output is zero
//!
//! Flat outputs make every comparison-based signal evaluate false.

pub mod adx;
pub mod bollinger;
pub mod ema;
pub mod ichimoku;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod wilder;

pub use adx::{Adx, calculate_adx};
pub use bollinger::{BollingerBands, calculate_bollinger};
pub use ema::{calculate_ema, ema_series};
pub use ichimoku::{Ichimoku, calculate_ichimoku};
pub use macd::{Macd, calculate_macd};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use stochastic::{Stochastic, calculate_stochastic};
pub use wilder::wilder_smooth;

use crate::domain::price::PriceBar;
use std::fmt;

/// Indicator identity plus parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
    Stochastic(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Adx(usize),
    Ichimoku,
}

impl IndicatorType {
    /// Bars required before the indicator produces real values.
    pub fn lookback(&self) -> usize {
        match self {
            IndicatorType::Sma(period)
            | IndicatorType::Ema(period)
            | IndicatorType::Stochastic(period) => *period,
            IndicatorType::Bollinger { period, .. } => *period,
            IndicatorType::Rsi(period) | IndicatorType::Adx(period) => period + 1,
            IndicatorType::Macd { slow, signal, .. } => (slow + signal).saturating_sub(1),
            IndicatorType::Ichimoku => ichimoku::SENKOU_B_PERIOD,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
            IndicatorType::Stochastic(period) => write!(f, "STOCHASTIC({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Adx(period) => write!(f, "ADX({})", period),
            IndicatorType::Ichimoku => write!(f, "ICHIMOKU"),
        }
    }
}

/// Degenerate value for windows shorter than an indicator's lookback.
pub fn fallback_value(bars: &[PriceBar]) -> f64 {
    bars.last().map_or(0.0, |b| b.close)
}

/// True when `bars` cannot feed an indicator needing `lookback` bars.
/// A zero parameter can never be satisfied.
pub(crate) fn insufficient(bars: &[PriceBar], lookback: usize, params: &[usize]) -> bool {
    params.contains(&0) || bars.len() < lookback
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_type_display_sma() {
        assert_eq!(IndicatorType::Sma(20).to_string(), "SMA(20)");
    }

    #[test]
    fn indicator_type_display_macd() {
        let macd = IndicatorType::Macd {
            fast: 12,
            slow: 26,
            signal: 9,
        };
        assert_eq!(macd.to_string(), "MACD(12,26,9)");
    }

    #[test]
    fn indicator_type_display_bollinger() {
        let boll = IndicatorType::Bollinger {
            period: 20,
            stddev_mult_x100: 200,
        };
        assert_eq!(boll.to_string(), "BOLLINGER(20,2)");
    }

    #[test]
    fn lookbacks() {
        assert_eq!(IndicatorType::Sma(5).lookback(), 5);
        assert_eq!(IndicatorType::Rsi(14).lookback(), 15);
        assert_eq!(IndicatorType::Adx(20).lookback(), 21);
        assert_eq!(
            IndicatorType::Macd {
                fast: 12,
                slow: 26,
                signal: 9
            }
            .lookback(),
            34
        );
        assert_eq!(IndicatorType::Ichimoku.lookback(), 52);
    }

    #[test]
    fn fallback_is_last_close_or_zero() {
        let bars = test_bars::from_closes(&[3.0, 4.0]);
        assert_eq!(fallback_value(&bars), 4.0);
        assert_eq!(fallback_value(&[]), 0.0);
    }

    #[test]
    fn zero_parameter_is_insufficient() {
        let bars = test_bars::from_closes(&[1.0, 2.0, 3.0]);
        assert!(insufficient(&bars, 2, &[0]));
        assert!(!insufficient(&bars, 3, &[3]));
        assert!(insufficient(&bars, 4, &[4]));
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    }
}
