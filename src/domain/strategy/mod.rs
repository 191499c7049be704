//! Strategy abstraction and the indicator-driven strategies.
//!
//! A strategy sees the replay one bar at a time: `set_history` receives bars
//! `0..=i` and caches whatever indicator state the strategy needs, then
//! `buy_signal` / `sell_signal` read that cache for bar `i`.

pub mod adx;
pub mod blend;
pub mod bollinger;
pub mod crossover;
pub mod ichimoku;
pub mod macd;
pub mod rsi;
pub mod stochastic;

pub use adx::AdxStrategy;
pub use blend::{Blend, BlendMode, MergeFn};
pub use bollinger::BollingerBandsStrategy;
pub use crossover::MovingAverageCrossover;
pub use ichimoku::IchimokuCloudStrategy;
pub use macd::MacdStrategy;
pub use rsi::RsiStrategy;
pub use stochastic::StochasticOscillatorStrategy;

use crate::domain::indicator::IndicatorType;
use crate::domain::price::PriceBar;
use std::fmt;

/// Signal strength. Zero or negative means no action; a positive value is
/// both the trigger and, for blends, the magnitude used for order sizing.
pub type Signal = f64;

pub trait Strategy: Send {
    fn name(&self) -> &str;

    /// Called once per bar, before any signal query, with every bar observed
    /// so far (bars `0..=i`).
    fn set_history(&mut self, history: &[PriceBar]);

    fn buy_signal(&self, bar: &PriceBar) -> Signal;

    fn sell_signal(&self, bar: &PriceBar) -> Signal;

    /// Drop all history-derived state so the instance can replay another series.
    fn reset(&mut self);

    /// Indicators this strategy evaluates.
    fn indicators(&self) -> Vec<IndicatorType> {
        Vec::new()
    }
}

impl fmt::Debug for dyn Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Strategy").field(&self.name()).finish()
    }
}

pub(crate) fn flag(condition: bool) -> Signal {
    if condition { 1.0 } else { 0.0 }
}

/// Two lines observed on consecutive points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CrossPoints {
    pub prev_fast: f64,
    pub prev_slow: f64,
    pub fast: f64,
    pub slow: f64,
}

impl CrossPoints {
    /// Last two points of each series, aligned on their tails.
    pub fn from_tails(fast: &[f64], slow: &[f64]) -> Option<Self> {
        if fast.len() < 2 || slow.len() < 2 {
            return None;
        }
        Some(CrossPoints {
            prev_fast: fast[fast.len() - 2],
            prev_slow: slow[slow.len() - 2],
            fast: fast[fast.len() - 1],
            slow: slow[slow.len() - 1],
        })
    }

    pub fn crossed_above(&self) -> bool {
        self.fast > self.slow && self.prev_fast <= self.prev_slow
    }

    pub fn crossed_below(&self) -> bool {
        self.fast < self.slow && self.prev_fast >= self.prev_slow
    }
}
