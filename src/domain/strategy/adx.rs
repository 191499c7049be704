//! ADX trend strategy: trade in the direction of the dominant DI while the
//! trend is strong.

use super::{Signal, Strategy, flag};
use crate::domain::indicator::adx::DEFAULT_PERIOD;
use crate::domain::indicator::{IndicatorType, calculate_adx};
use crate::domain::price::PriceBar;

/// ADX level above which a trend counts as strong.
pub const TREND_THRESHOLD: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct AdxReading {
    adx: f64,
    plus_di: f64,
    minus_di: f64,
}

#[derive(Debug, Clone)]
pub struct AdxStrategy {
    period: usize,
    reading: Option<AdxReading>,
}

impl AdxStrategy {
    pub const NAME: &'static str = "ADX";

    pub fn new(period: usize) -> Self {
        AdxStrategy {
            period,
            reading: None,
        }
    }
}

impl Default for AdxStrategy {
    fn default() -> Self {
        AdxStrategy::new(DEFAULT_PERIOD)
    }
}

impl Strategy for AdxStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn set_history(&mut self, history: &[PriceBar]) {
        if self.period == 0 || history.len() <= self.period {
            self.reading = None;
            return;
        }
        let adx = calculate_adx(history, self.period);
        self.reading = match (adx.adx.last(), adx.plus_di.last(), adx.minus_di.last()) {
            (Some(&adx), Some(&plus_di), Some(&minus_di)) => Some(AdxReading {
                adx,
                plus_di,
                minus_di,
            }),
            _ => None,
        };
    }

    fn buy_signal(&self, _bar: &PriceBar) -> Signal {
        flag(
            self.reading
                .is_some_and(|r| r.adx > TREND_THRESHOLD && r.plus_di > r.minus_di),
        )
    }

    fn sell_signal(&self, _bar: &PriceBar) -> Signal {
        flag(
            self.reading
                .is_some_and(|r| r.adx > TREND_THRESHOLD && r.minus_di > r.plus_di),
        )
    }

    fn reset(&mut self) {
        self.reading = None;
    }

    fn indicators(&self) -> Vec<IndicatorType> {
        vec![IndicatorType::Adx(self.period)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_bars::{bar, from_closes};
    use crate::domain::strategy::test_support::replay;

    fn trend(n: usize, step: f64) -> Vec<PriceBar> {
        (0..n)
            .map(|i| {
                let c = 100.0 + step * i as f64;
                bar(i, c + 1.0, c - 1.0, c)
            })
            .collect()
    }

    #[test]
    fn strong_uptrend_buys() {
        let bars = trend(30, 2.0);
        let mut strategy = AdxStrategy::new(14);
        strategy.set_history(&bars);
        assert_eq!(strategy.buy_signal(&bars[29]), 1.0);
        assert_eq!(strategy.sell_signal(&bars[29]), 0.0);
    }

    #[test]
    fn strong_downtrend_sells() {
        let bars = trend(30, -2.0);
        let mut strategy = AdxStrategy::new(14);
        strategy.set_history(&bars);
        assert_eq!(strategy.sell_signal(&bars[29]), 1.0);
        assert_eq!(strategy.buy_signal(&bars[29]), 0.0);
    }

    #[test]
    fn needs_period_plus_one_bars() {
        let bars = trend(14, 2.0);
        let mut strategy = AdxStrategy::new(14);
        strategy.set_history(&bars);
        assert_eq!(strategy.buy_signal(&bars[13]), 0.0);
    }

    #[test]
    fn flat_prices_are_silent() {
        let bars = from_closes(&[10.0; 40]);
        let mut strategy = AdxStrategy::default();
        let signals = replay(&mut strategy, &bars);
        assert!(signals.iter().all(|(b, s)| *b == 0.0 && *s == 0.0));
    }
}
