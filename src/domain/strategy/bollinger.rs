//! Bollinger band breakout strategy: buy on a close below the lower band,
//! sell on a close above the upper band.

use super::{Signal, Strategy, flag};
use crate::domain::indicator::{BollingerBands, IndicatorType, calculate_bollinger};
use crate::domain::price::PriceBar;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct BollingerBandsStrategy {
    period: usize,
    multiplier: f64,
    bands: Option<BollingerBands>,
}

impl BollingerBandsStrategy {
    pub const NAME: &'static str = "Bollinger Bands";

    pub fn new(period: usize, multiplier: f64) -> Self {
        BollingerBandsStrategy {
            period,
            multiplier,
            bands: None,
        }
    }
}

impl Default for BollingerBandsStrategy {
    fn default() -> Self {
        BollingerBandsStrategy::new(DEFAULT_PERIOD, DEFAULT_MULTIPLIER)
    }
}

impl Strategy for BollingerBandsStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn set_history(&mut self, history: &[PriceBar]) {
        self.bands = (self.period > 0 && history.len() >= self.period)
            .then(|| calculate_bollinger(history, self.period, self.multiplier));
    }

    fn buy_signal(&self, bar: &PriceBar) -> Signal {
        flag(self.bands.is_some_and(|b| bar.close < b.lower))
    }

    fn sell_signal(&self, bar: &PriceBar) -> Signal {
        flag(self.bands.is_some_and(|b| bar.close > b.upper))
    }

    fn reset(&mut self) {
        self.bands = None;
    }

    fn indicators(&self) -> Vec<IndicatorType> {
        vec![IndicatorType::Bollinger {
            period: self.period,
            stddev_mult_x100: (self.multiplier * 100.0).round() as u32,
        }]
    }
}
