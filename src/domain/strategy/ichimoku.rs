//! Ichimoku cloud strategy: buy above the cloud top with tenkan over kijun,
//! sell below the cloud bottom with tenkan under kijun.

use super::{Signal, Strategy, flag};
use crate::domain::indicator::ichimoku::SENKOU_B_PERIOD;
use crate::domain::indicator::{IndicatorType, calculate_ichimoku};
use crate::domain::price::PriceBar;

#[derive(Debug, Clone, Copy, PartialEq)]
struct CloudReading {
    tenkan: f64,
    kijun: f64,
    senkou_a: f64,
    senkou_b: f64,
}

#[derive(Debug, Clone, Default)]
pub struct IchimokuCloudStrategy {
    reading: Option<CloudReading>,
}

impl IchimokuCloudStrategy {
    pub const NAME: &'static str = "Ichimoku Cloud";

    pub fn new() -> Self {
        Self::default()
    }
}

impl Strategy for IchimokuCloudStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn set_history(&mut self, history: &[PriceBar]) {
        if history.len() < SENKOU_B_PERIOD {
            self.reading = None;
            return;
        }
        let cloud = calculate_ichimoku(history);
        self.reading = match (
            cloud.tenkan.last(),
            cloud.kijun.last(),
            cloud.senkou_a.last(),
            cloud.senkou_b.last(),
        ) {
            (Some(&tenkan), Some(&kijun), Some(&senkou_a), Some(&senkou_b)) => Some(CloudReading {
                tenkan,
                kijun,
                senkou_a,
                senkou_b,
            }),
            _ => None,
        };
    }

    fn buy_signal(&self, bar: &PriceBar) -> Signal {
        flag(
            self.reading
                .is_some_and(|r| bar.close > r.senkou_a && r.tenkan > r.kijun),
        )
    }

    fn sell_signal(&self, bar: &PriceBar) -> Signal {
        flag(
            self.reading
                .is_some_and(|r| bar.close < r.senkou_b && r.tenkan < r.kijun),
        )
    }

    fn reset(&mut self) {
        self.reading = None;
    }

    fn indicators(&self) -> Vec<IndicatorType> {
        vec![IndicatorType::Ichimoku]
    }
}
