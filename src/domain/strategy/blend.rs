//! Composite strategy combining the signals of several member strategies.

use super::{Signal, Strategy};
use crate::domain::error::SignalbenchError;
use crate::domain::indicator::IndicatorType;
use crate::domain::price::PriceBar;

/// Maps the ordered member signals to one composite signal.
pub type MergeFn = Box<dyn Fn(&[Signal]) -> Signal + Send + Sync>;

pub enum BlendMode {
    /// Weighted mean; weights are normalized by their sum.
    WeightedAverage(Vec<f64>),
    /// Product of member signals: positive only when every member is.
    Product,
    Custom { buy: MergeFn, sell: MergeFn },
}

impl BlendMode {
    fn merge(&self, signals: &[Signal], buy: bool) -> Signal {
        match self {
            BlendMode::WeightedAverage(weights) => {
                let total: f64 = weights.iter().sum();
                let weighted: f64 = signals.iter().zip(weights).map(|(s, w)| s * w).sum();
                weighted / total
            }
            BlendMode::Product => signals.iter().product(),
            BlendMode::Custom { buy: b, sell: s } => {
                if buy {
                    b(signals)
                } else {
                    s(signals)
                }
            }
        }
    }
}

impl std::fmt::Debug for BlendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlendMode::WeightedAverage(w) => f.debug_tuple("WeightedAverage").field(w).finish(),
            BlendMode::Product => write!(f, "Product"),
            BlendMode::Custom { .. } => write!(f, "Custom"),
        }
    }
}

pub struct Blend {
    name: String,
    members: Vec<Box<dyn Strategy>>,
    mode: BlendMode,
}

impl Blend {
    /// Weighted-average blend when `weights` is given, product blend otherwise.
    pub fn weighted(
        members: Vec<Box<dyn Strategy>>,
        weights: Option<Vec<f64>>,
    ) -> Result<Self, SignalbenchError> {
        let mode = match weights {
            Some(weights) => {
                validate_weights(&weights, members.len())?;
                BlendMode::WeightedAverage(weights)
            }
            None => BlendMode::Product,
        };
        Blend::with_mode(members, mode)
    }

    pub fn custom(
        members: Vec<Box<dyn Strategy>>,
        buy: MergeFn,
        sell: MergeFn,
    ) -> Result<Self, SignalbenchError> {
        Blend::with_mode(members, BlendMode::Custom { buy, sell })
    }

    fn with_mode(members: Vec<Box<dyn Strategy>>, mode: BlendMode) -> Result<Self, SignalbenchError> {
        if members.is_empty() {
            return Err(SignalbenchError::InvalidBlend {
                reason: "a blend needs at least one member".into(),
            });
        }
        let name = members
            .iter()
            .map(|m| m.name())
            .collect::<Vec<_>>()
            .join(" + ");
        Ok(Blend {
            name,
            members,
            mode,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn combine(&self, bar: &PriceBar, buy: bool) -> Signal {
        let signals: Vec<Signal> = self
            .members
            .iter()
            .map(|m| {
                if buy {
                    m.buy_signal(bar)
                } else {
                    m.sell_signal(bar)
                }
            })
            .collect();
        self.mode.merge(&signals, buy)
    }
}

fn validate_weights(weights: &[f64], members: usize) -> Result<(), SignalbenchError> {
    let invalid = |reason: String| Err(SignalbenchError::InvalidBlend { reason });
    if weights.len() != members {
        return invalid(format!(
            "{} weights given for {} members",
            weights.len(),
            members
        ));
    }
    if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return invalid(format!("weight {} must be finite and non-negative", w));
    }
    if weights.iter().sum::<f64>() <= 0.0 {
        return invalid("weights must not sum to zero".into());
    }
    Ok(())
}

impl std::fmt::Debug for Blend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blend")
            .field("name", &self.name)
            .field("members", &self.members.len())
            .field("mode", &self.mode)
            .finish()
    }
}

impl Strategy for Blend {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_history(&mut self, history: &[PriceBar]) {
        for member in &mut self.members {
            member.set_history(history);
        }
    }

    fn buy_signal(&self, bar: &PriceBar) -> Signal {
        self.combine(bar, true)
    }

    fn sell_signal(&self, bar: &PriceBar) -> Signal {
        self.combine(bar, false)
    }

    fn reset(&mut self) {
        for member in &mut self.members {
            member.reset();
        }
    }

    fn indicators(&self) -> Vec<IndicatorType> {
        self.members.iter().flat_map(|m| m.indicators()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_bars::from_closes;

    /// Member emitting fixed signals and counting lifecycle calls.
    struct Fixed {
        name: &'static str,
        buy: f64,
        sell: f64,
        history_len: usize,
    }

    impl Fixed {
        fn boxed(name: &'static str, buy: f64, sell: f64) -> Box<dyn Strategy> {
            Box::new(Fixed {
                name,
                buy,
                sell,
                history_len: 0,
            })
        }
    }

    impl Strategy for Fixed {
        fn name(&self) -> &str {
            self.name
        }
        fn set_history(&mut self, history: &[PriceBar]) {
            self.history_len = history.len();
        }
        fn buy_signal(&self, _bar: &PriceBar) -> Signal {
            if self.history_len == 0 { 0.0 } else { self.buy }
        }
        fn sell_signal(&self, _bar: &PriceBar) -> Signal {
            if self.history_len == 0 { 0.0 } else { self.sell }
        }
        fn reset(&mut self) {
            self.history_len = 0;
        }
    }

    fn primed(mut blend: Blend) -> (Blend, PriceBar) {
        let bars = from_closes(&[10.0]);
        blend.set_history(&bars);
        (blend, bars[0].clone())
    }

    #[test]
    fn product_is_zero_when_any_member_is_silent() {
        let blend = Blend::weighted(
            vec![Fixed::boxed("a", 1.0, 1.0), Fixed::boxed("b", 0.0, 1.0)],
            None,
        )
        .unwrap();
        let (blend, bar) = primed(blend);
        assert_eq!(blend.buy_signal(&bar), 0.0);
        assert_eq!(blend.sell_signal(&bar), 1.0);
    }

    #[test]
    fn product_shrinks_magnitude() {
        let blend = Blend::weighted(
            vec![Fixed::boxed("a", 0.5, 0.0), Fixed::boxed("b", 0.5, 0.0)],
            None,
        )
        .unwrap();
        let (blend, bar) = primed(blend);
        assert!((blend.buy_signal(&bar) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn weighted_average_normalizes() {
        let blend = Blend::weighted(
            vec![Fixed::boxed("a", 1.0, 0.0), Fixed::boxed("b", 0.0, 1.0)],
            Some(vec![3.0, 1.0]),
        )
        .unwrap();
        let (blend, bar) = primed(blend);
        assert!((blend.buy_signal(&bar) - 0.75).abs() < f64::EPSILON);
        assert!((blend.sell_signal(&bar) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn custom_merges_each_side_independently() {
        let blend = Blend::custom(
            vec![Fixed::boxed("a", 1.0, 0.2), Fixed::boxed("b", 0.0, 0.6)],
            Box::new(|s: &[Signal]| s.iter().cloned().fold(f64::NEG_INFINITY, f64::max)),
            Box::new(|s: &[Signal]| s.iter().sum()),
        )
        .unwrap();
        let (blend, bar) = primed(blend);
        assert_eq!(blend.buy_signal(&bar), 1.0);
        assert!((blend.sell_signal(&bar) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn default_name_joins_members() {
        let blend = Blend::weighted(
            vec![Fixed::boxed("RSI", 0.0, 0.0), Fixed::boxed("MACD", 0.0, 0.0)],
            None,
        )
        .unwrap();
        assert_eq!(blend.name(), "RSI + MACD");
        assert_eq!(blend.with_name("Momentum").name(), "Momentum");
    }

    #[test]
    fn reset_and_history_are_delegated() {
        let blend = Blend::weighted(vec![Fixed::boxed("a", 1.0, 0.0)], None).unwrap();
        let (mut blend, bar) = primed(blend);
        assert_eq!(blend.buy_signal(&bar), 1.0);
        blend.reset();
        assert_eq!(blend.buy_signal(&bar), 0.0);
    }

    #[test]
    fn rejects_bad_construction() {
        assert!(matches!(
            Blend::weighted(Vec::new(), None),
            Err(SignalbenchError::InvalidBlend { .. })
        ));
        let members = || vec![Fixed::boxed("a", 0.0, 0.0), Fixed::boxed("b", 0.0, 0.0)];
        assert!(Blend::weighted(members(), Some(vec![1.0])).is_err());
        assert!(Blend::weighted(members(), Some(vec![1.0, -1.0])).is_err());
        assert!(Blend::weighted(members(), Some(vec![0.0, 0.0])).is_err());
        assert!(Blend::weighted(members(), Some(vec![f64::NAN, 1.0])).is_err());
        assert!(Blend::weighted(members(), Some(vec![0.0, 2.0])).is_ok());
    }

    #[test]
    fn indicators_are_collected_from_members() {
        use crate::domain::strategy::{MacdStrategy, RsiStrategy};
        let blend = Blend::weighted(
            vec![
                Box::new(RsiStrategy::default()),
                Box::new(MacdStrategy::default()),
            ],
            None,
        )
        .unwrap();
        let names: Vec<String> = blend.indicators().iter().map(|i| i.to_string()).collect();
        assert_eq!(names, vec!["RSI(14)", "MACD(12,26,9)"]);
    }
}
