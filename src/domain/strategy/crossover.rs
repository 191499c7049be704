//! Moving average crossover: buy when the short SMA crosses above the long SMA,
//! sell on the mirrored cross.

use super::{CrossPoints, Signal, Strategy, flag};
use crate::domain::indicator::{IndicatorType, calculate_sma};
use crate::domain::price::PriceBar;

pub const DEFAULT_SHORT_WINDOW: usize = 5;
pub const DEFAULT_LONG_WINDOW: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq)]
struct MaPair {
    short: f64,
    long: f64,
}

/// Starting point for cross detection: both averages at zero, so the first
/// bar with a full long window reports whichever side the short average is on.
const ZERO_PAIR: MaPair = MaPair {
    short: 0.0,
    long: 0.0,
};

#[derive(Debug, Clone)]
pub struct MovingAverageCrossover {
    short_window: usize,
    long_window: usize,
    previous: MaPair,
    cross: Option<CrossPoints>,
}

impl MovingAverageCrossover {
    pub const NAME: &'static str = "Moving Average Crossover";

    pub fn new(short_window: usize, long_window: usize) -> Self {
        MovingAverageCrossover {
            short_window,
            long_window,
            previous: ZERO_PAIR,
            cross: None,
        }
    }
}

impl Default for MovingAverageCrossover {
    fn default() -> Self {
        MovingAverageCrossover::new(DEFAULT_SHORT_WINDOW, DEFAULT_LONG_WINDOW)
    }
}

impl Strategy for MovingAverageCrossover {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn set_history(&mut self, history: &[PriceBar]) {
        if history.len() < self.long_window {
            self.cross = None;
            return;
        }

        let current = MaPair {
            short: calculate_sma(history, self.short_window),
            long: calculate_sma(history, self.long_window),
        };
        self.cross = Some(CrossPoints {
            prev_fast: self.previous.short,
            prev_slow: self.previous.long,
            fast: current.short,
            slow: current.long,
        });
        self.previous = current;
    }

    fn buy_signal(&self, _bar: &PriceBar) -> Signal {
        flag(self.cross.is_some_and(|c| c.crossed_above()))
    }

    fn sell_signal(&self, _bar: &PriceBar) -> Signal {
        flag(self.cross.is_some_and(|c| c.crossed_below()))
    }

    fn reset(&mut self) {
        self.previous = ZERO_PAIR;
        self.cross = None;
    }

    fn indicators(&self) -> Vec<IndicatorType> {
        vec![
            IndicatorType::Sma(self.short_window),
            IndicatorType::Sma(self.long_window),
        ]
    }
}
