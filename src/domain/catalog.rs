//! Builds strategies from configuration sections.
//!
//! `[strategies] run` lists section names in run order. Each section's
//! `kind` (defaulting to the section name) selects the strategy; the
//! remaining keys are its parameters. Blend sections reference other
//! sections as members, so blends may nest but never form a cycle.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::domain::config_validation::{read_f64, read_period};
use crate::domain::error::SignalbenchError;
use crate::domain::strategy::{
    AdxStrategy, Blend, BollingerBandsStrategy, IchimokuCloudStrategy, MacdStrategy, MergeFn,
    MovingAverageCrossover, RsiStrategy, Signal, StochasticOscillatorStrategy, Strategy,
    bollinger, crossover, rsi, stochastic,
};
use crate::domain::indicator::{adx, macd};
use crate::ports::config_port::ConfigPort;

pub const STRATEGIES_SECTION: &str = "strategies";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    MovingAverageCrossover,
    Rsi,
    BollingerBands,
    StochasticOscillator,
    Macd,
    Adx,
    IchimokuCloud,
    Blend,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 8] = [
        StrategyKind::MovingAverageCrossover,
        StrategyKind::Rsi,
        StrategyKind::BollingerBands,
        StrategyKind::StochasticOscillator,
        StrategyKind::Macd,
        StrategyKind::Adx,
        StrategyKind::IchimokuCloud,
        StrategyKind::Blend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::MovingAverageCrossover => "moving_average_crossover",
            StrategyKind::Rsi => "rsi",
            StrategyKind::BollingerBands => "bollinger_bands",
            StrategyKind::StochasticOscillator => "stochastic_oscillator",
            StrategyKind::Macd => "macd",
            StrategyKind::Adx => "adx",
            StrategyKind::IchimokuCloud => "ichimoku_cloud",
            StrategyKind::Blend => "blend",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = SignalbenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        StrategyKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| SignalbenchError::UnknownStrategy {
                name: s.trim().to_string(),
            })
    }
}

/// How a blend without weights merges member signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    Product,
    Min,
    Max,
}

impl FromStr for MergeRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "product" => Ok(MergeRule::Product),
            "min" => Ok(MergeRule::Min),
            "max" => Ok(MergeRule::Max),
            other => Err(format!("unknown merge '{}', expected product, min or max", other)),
        }
    }
}

fn min_merge() -> MergeFn {
    Box::new(|signals: &[Signal]| signals.iter().copied().fold(f64::INFINITY, f64::min))
}

fn max_merge() -> MergeFn {
    Box::new(|signals: &[Signal]| signals.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

/// A configured strategy together with the section it was built from.
#[derive(Debug)]
pub struct NamedStrategy {
    pub section: String,
    pub strategy: Box<dyn Strategy>,
}

/// Builds every strategy listed in `[strategies] run`, in order.
pub fn build_strategies(config: &dyn ConfigPort) -> Result<Vec<NamedStrategy>, SignalbenchError> {
    let sections = config.get_list(STRATEGIES_SECTION, "run");
    if sections.is_empty() {
        return Err(SignalbenchError::missing(STRATEGIES_SECTION, "run"));
    }
    sections
        .into_iter()
        .map(|section| {
            let strategy = build_strategy(config, &section)?;
            Ok(NamedStrategy { section, strategy })
        })
        .collect()
}

pub fn build_strategy(
    config: &dyn ConfigPort,
    section: &str,
) -> Result<Box<dyn Strategy>, SignalbenchError> {
    let mut stack = Vec::new();
    build_section(config, section, &mut stack)
}

fn section_kind(config: &dyn ConfigPort, section: &str) -> Result<StrategyKind, SignalbenchError> {
    config
        .get_string(section, "kind")
        .filter(|k| !k.trim().is_empty())
        .unwrap_or_else(|| section.to_string())
        .parse()
}

fn build_section(
    config: &dyn ConfigPort,
    section: &str,
    stack: &mut Vec<String>,
) -> Result<Box<dyn Strategy>, SignalbenchError> {
    let kind = section_kind(config, section)?;
    debug!(section, %kind, "building strategy");

    let strategy: Box<dyn Strategy> = match kind {
        StrategyKind::MovingAverageCrossover => {
            let short = read_period(config, section, "short_window", crossover::DEFAULT_SHORT_WINDOW)?;
            let long = read_period(config, section, "long_window", crossover::DEFAULT_LONG_WINDOW)?;
            ensure_ordered_windows(section, short, long)?;
            Box::new(MovingAverageCrossover::new(short, long))
        }
        StrategyKind::Rsi => {
            let period = read_period(config, section, "period", rsi::DEFAULT_PERIOD)?;
            let (overbought, oversold) =
                read_thresholds(config, section, rsi::DEFAULT_OVERBOUGHT, rsi::DEFAULT_OVERSOLD)?;
            Box::new(RsiStrategy::new(period, overbought, oversold))
        }
        StrategyKind::BollingerBands => {
            let period = read_period(config, section, "period", bollinger::DEFAULT_PERIOD)?;
            let multiplier = read_f64(config, section, "multiplier", bollinger::DEFAULT_MULTIPLIER)?;
            if multiplier < 0.0 {
                return Err(SignalbenchError::invalid(
                    section,
                    "multiplier",
                    "multiplier must be non-negative",
                ));
            }
            Box::new(BollingerBandsStrategy::new(period, multiplier))
        }
        StrategyKind::StochasticOscillator => {
            let period = read_period(config, section, "period", stochastic::DEFAULT_PERIOD)?;
            let (overbought, oversold) = read_thresholds(
                config,
                section,
                stochastic::DEFAULT_OVERBOUGHT,
                stochastic::DEFAULT_OVERSOLD,
            )?;
            Box::new(StochasticOscillatorStrategy::new(period, overbought, oversold))
        }
        StrategyKind::Macd => {
            let short = read_period(config, section, "short_window", macd::DEFAULT_SHORT)?;
            let long = read_period(config, section, "long_window", macd::DEFAULT_LONG)?;
            let signal = read_period(config, section, "signal_window", macd::DEFAULT_SIGNAL)?;
            ensure_ordered_windows(section, short, long)?;
            Box::new(MacdStrategy::new(short, long, signal))
        }
        StrategyKind::Adx => {
            let period = read_period(config, section, "period", adx::DEFAULT_PERIOD)?;
            Box::new(AdxStrategy::new(period))
        }
        StrategyKind::IchimokuCloud => Box::new(IchimokuCloudStrategy::new()),
        StrategyKind::Blend => Box::new(build_blend(config, section, stack)?),
    };
    Ok(strategy)
}

fn build_blend(
    config: &dyn ConfigPort,
    section: &str,
    stack: &mut Vec<String>,
) -> Result<Blend, SignalbenchError> {
    if stack.iter().any(|s| s == section) {
        stack.push(section.to_string());
        return Err(SignalbenchError::InvalidBlend {
            reason: format!("cyclic membership: {}", stack.join(" -> ")),
        });
    }

    let member_sections = config.get_list(section, "members");
    if member_sections.is_empty() {
        return Err(SignalbenchError::missing(section, "members"));
    }

    stack.push(section.to_string());
    let members = member_sections
        .iter()
        .map(|m| build_section(config, m, stack))
        .collect::<Result<Vec<_>, _>>()?;
    stack.pop();

    let weights = config.get_list(section, "weights");
    let blend = if !weights.is_empty() {
        let weights = weights
            .iter()
            .map(|w| {
                w.parse::<f64>().map_err(|_| {
                    SignalbenchError::invalid(section, "weights", format!("'{}' is not a number", w))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Blend::weighted(members, Some(weights))?
    } else {
        let rule = config
            .get_string(section, "merge")
            .filter(|m| !m.trim().is_empty())
            .map(|m| m.parse::<MergeRule>())
            .transpose()
            .map_err(|reason| SignalbenchError::invalid(section, "merge", reason))?
            .unwrap_or(MergeRule::Product);
        match rule {
            MergeRule::Product => Blend::weighted(members, None)?,
            MergeRule::Min => Blend::custom(members, min_merge(), min_merge())?,
            MergeRule::Max => Blend::custom(members, max_merge(), max_merge())?,
        }
    };

    Ok(match config.get_string(section, "name").filter(|n| !n.trim().is_empty()) {
        Some(name) => blend.with_name(name.trim()),
        None => blend,
    })
}

fn ensure_ordered_windows(section: &str, short: usize, long: usize) -> Result<(), SignalbenchError> {
    if short >= long {
        return Err(SignalbenchError::invalid(
            section,
            "short_window",
            format!("short_window ({}) must be less than long_window ({})", short, long),
        ));
    }
    Ok(())
}

fn read_thresholds(
    config: &dyn ConfigPort,
    section: &str,
    overbought_default: f64,
    oversold_default: f64,
) -> Result<(f64, f64), SignalbenchError> {
    let overbought = read_f64(config, section, "overbought", overbought_default)?;
    let oversold = read_f64(config, section, "oversold", oversold_default)?;
    if oversold >= overbought {
        return Err(SignalbenchError::invalid(
            section,
            "oversold",
            format!("oversold ({}) must be below overbought ({})", oversold, overbought),
        ));
    }
    Ok((overbought, oversold))
}
