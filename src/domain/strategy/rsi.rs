//! RSI threshold strategy: buy below the oversold line, sell above overbought.

use super::{Signal, Strategy, flag};
use crate::domain::indicator::{IndicatorType, calculate_rsi};
use crate::domain::price::PriceBar;

pub const DEFAULT_PERIOD: usize = 14;
pub const DEFAULT_OVERBOUGHT: f64 = 70.0;
pub const DEFAULT_OVERSOLD: f64 = 30.0;

#[derive(Debug, Clone)]
pub struct RsiStrategy {
    period: usize,
    overbought: f64,
    oversold: f64,
    rsi: Option<f64>,
}

impl RsiStrategy {
    pub const NAME: &'static str = "RSI";

    pub fn new(period: usize, overbought: f64, oversold: f64) -> Self {
        RsiStrategy {
            period,
            overbought,
            oversold,
            rsi: None,
        }
    }
}

impl Default for RsiStrategy {
    fn default() -> Self {
        RsiStrategy::new(DEFAULT_PERIOD, DEFAULT_OVERBOUGHT, DEFAULT_OVERSOLD)
    }
}

impl Strategy for RsiStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn set_history(&mut self, history: &[PriceBar]) {
        self.rsi = (history.len() > self.period).then(|| calculate_rsi(history, self.period));
    }

    fn buy_signal(&self, _bar: &PriceBar) -> Signal {
        flag(self.rsi.is_some_and(|rsi| rsi < self.oversold))
    }

    fn sell_signal(&self, _bar: &PriceBar) -> Signal {
        flag(self.rsi.is_some_and(|rsi| rsi > self.overbought))
    }

    fn reset(&mut self) {
        self.rsi = None;
    }

    fn indicators(&self) -> Vec<IndicatorType> {
        vec![IndicatorType::Rsi(self.period)]
    }
}
