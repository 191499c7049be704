//! MACD signal-line crossover strategy.

use super::{CrossPoints, Signal, Strategy, flag};
use crate::domain::indicator::macd::{DEFAULT_LONG, DEFAULT_SHORT, DEFAULT_SIGNAL};
use crate::domain::indicator::{IndicatorType, calculate_macd};
use crate::domain::price::PriceBar;

#[derive(Debug, Clone)]
pub struct MacdStrategy {
    short_window: usize,
    long_window: usize,
    signal_window: usize,
    cross: Option<CrossPoints>,
}

impl MacdStrategy {
    pub const NAME: &'static str = "MACD";

    pub fn new(short_window: usize, long_window: usize, signal_window: usize) -> Self {
        MacdStrategy {
            short_window,
            long_window,
            signal_window,
            cross: None,
        }
    }

    fn indicator(&self) -> IndicatorType {
        IndicatorType::Macd {
            fast: self.short_window,
            slow: self.long_window,
            signal: self.signal_window,
        }
    }
}

impl Default for MacdStrategy {
    fn default() -> Self {
        MacdStrategy::new(DEFAULT_SHORT, DEFAULT_LONG, DEFAULT_SIGNAL)
    }
}

impl Strategy for MacdStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn set_history(&mut self, history: &[PriceBar]) {
        self.cross = if history.len() < self.indicator().lookback() {
            None
        } else {
            let macd = calculate_macd(
                history,
                self.short_window,
                self.long_window,
                self.signal_window,
            );
            CrossPoints::from_tails(&macd.line, &macd.signal)
        };
    }

    fn buy_signal(&self, _bar: &PriceBar) -> Signal {
        flag(self.cross.is_some_and(|c| c.crossed_above()))
    }

    fn sell_signal(&self, _bar: &PriceBar) -> Signal {
        flag(self.cross.is_some_and(|c| c.crossed_below()))
    }

    fn reset(&mut self) {
        self.cross = None;
    }

    fn indicators(&self) -> Vec<IndicatorType> {
        vec![self.indicator()]
    }
}
