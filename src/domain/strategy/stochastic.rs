//! Stochastic oscillator strategy.
//!
//! Buy when %K crosses above %D while %K is below the oversold line; sell on
//! the mirrored cross above the overbought line.

use super::{CrossPoints, Signal, Strategy, flag};
use crate::domain::indicator::{IndicatorType, calculate_stochastic};
use crate::domain::price::PriceBar;

pub const DEFAULT_PERIOD: usize = 14;
pub const DEFAULT_OVERBOUGHT: f64 = 80.0;
pub const DEFAULT_OVERSOLD: f64 = 20.0;

#[derive(Debug, Clone)]
pub struct StochasticOscillatorStrategy {
    period: usize,
    overbought: f64,
    oversold: f64,
    cross: Option<CrossPoints>,
}

impl StochasticOscillatorStrategy {
    pub const NAME: &'static str = "Stochastic Oscillator";

    pub fn new(period: usize, overbought: f64, oversold: f64) -> Self {
        StochasticOscillatorStrategy {
            period,
            overbought,
            oversold,
            cross: None,
        }
    }
}

impl Default for StochasticOscillatorStrategy {
    fn default() -> Self {
        StochasticOscillatorStrategy::new(DEFAULT_PERIOD, DEFAULT_OVERBOUGHT, DEFAULT_OVERSOLD)
    }
}

impl Strategy for StochasticOscillatorStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn set_history(&mut self, history: &[PriceBar]) {
        self.cross = if self.period == 0 || history.len() < self.period {
            None
        } else {
            let stoch = calculate_stochastic(history, self.period);
            CrossPoints::from_tails(&stoch.k, &stoch.d)
        };
    }

    fn buy_signal(&self, _bar: &PriceBar) -> Signal {
        flag(
            self.cross
                .is_some_and(|c| c.fast < self.oversold && c.crossed_above()),
        )
    }

    fn sell_signal(&self, _bar: &PriceBar) -> Signal {
        flag(
            self.cross
                .is_some_and(|c| c.fast > self.overbought && c.crossed_below()),
        )
    }

    fn reset(&mut self) {
        self.cross = None;
    }

    fn indicators(&self) -> Vec<IndicatorType> {
        vec![IndicatorType::Stochastic(self.period)]
    }
}
