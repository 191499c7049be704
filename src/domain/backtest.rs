//! Backtest driver: replays a bar series through a strategy and a broker.
//!
//! At bar `i` the strategy sees bars `0..=i`. Buy takes precedence; the sell
//! signal is only queried when the buy signal is not positive, so at most one
//! order is sent per bar.

use chrono::NaiveDateTime;
use tracing::{info, trace};

use super::broker::{Broker, TradeRecord, TradeSide};
use super::price::{PriceBar, PriceSeries};
use super::strategy::{Signal, Strategy};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_balance: f64,
    /// Order volume is `floor(multiplier * signal)`.
    pub multiplier: f64,
    pub skip_zero_volume: bool,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_balance: 10_000.0,
            multiplier: 1.0,
            skip_zero_volume: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub symbol: String,
    pub strategy: String,
    pub initial_balance: f64,
    pub final_balance: f64,
    pub final_holdings: u64,
    pub final_balance_with_holdings: f64,
    pub profit: f64,
    pub profit_with_holdings: f64,
    pub trade_count: usize,
    pub ledger: Vec<TradeRecord>,
}

impl BacktestResult {
    pub fn filled_trades(&self) -> usize {
        self.ledger.iter().filter(|t| t.is_filled()).count()
    }
}

/// `floor(multiplier * signal)`, clamped into `u64`.
pub fn order_volume(multiplier: f64, signal: Signal) -> u64 {
    let raw = (multiplier * signal).floor();
    if raw.is_nan() || raw <= 0.0 {
        0
    } else {
        raw as u64
    }
}

pub fn run_backtest(
    strategy: &mut dyn Strategy,
    symbol: &str,
    bars: &[PriceBar],
    config: &BacktestConfig,
) -> BacktestResult {
    let mut broker = Broker::new(config.initial_balance);

    for i in 0..bars.len() {
        let bar = &bars[i];
        strategy.set_history(&bars[..=i]);

        let buy = strategy.buy_signal(bar);
        let order = if buy > 0.0 {
            trace!(bar = i, buy, "signals");
            Some((TradeSide::Buy, buy))
        } else {
            let sell = strategy.sell_signal(bar);
            trace!(bar = i, buy, sell, "signals");
            (sell > 0.0).then_some((TradeSide::Sell, sell))
        };

        if let Some((side, signal)) = order {
            let volume = order_volume(config.multiplier, signal);
            if volume == 0 && config.skip_zero_volume {
                trace!(bar = i, %side, signal, "skipping zero-volume order");
                continue;
            }
            broker.execute_trade(side, symbol, bar.close, volume, bar.timestamp);
        }
    }

    let final_balance = broker.balance();
    let final_holdings = broker.holdings(symbol);
    let final_balance_with_holdings = match bars.last() {
        Some(last) => broker.portfolio().mark_to_market(symbol, last.close),
        None => final_balance,
    };
    let ledger = broker.into_ledger();

    let result = BacktestResult {
        symbol: symbol.to_string(),
        strategy: strategy.name().to_string(),
        initial_balance: config.initial_balance,
        final_balance,
        final_holdings,
        final_balance_with_holdings,
        profit: final_balance - config.initial_balance,
        profit_with_holdings: final_balance_with_holdings - config.initial_balance,
        trade_count: ledger.len(),
        ledger,
    };

    info!(
        symbol,
        strategy = %result.strategy,
        bars = bars.len(),
        trades = result.trade_count,
        profit = result.profit,
        profit_with_holdings = result.profit_with_holdings,
        "backtest complete"
    );
    result
}

/// Resets `strategy` and replays `series` through it.
pub fn run_fresh(
    strategy: &mut dyn Strategy,
    series: &PriceSeries,
    config: &BacktestConfig,
) -> BacktestResult {
    strategy.reset();
    run_backtest(strategy, series.symbol(), series.bars(), config)
}

/// Runs every (symbol, strategy) pair, symbol-major, each from a fresh reset.
pub fn run_universe(
    strategies: &mut [Box<dyn Strategy>],
    universe: &[PriceSeries],
    config: &BacktestConfig,
) -> Vec<BacktestResult> {
    let mut results = Vec::with_capacity(strategies.len() * universe.len());
    for series in universe {
        for strategy in strategies.iter_mut() {
            results.push(run_fresh(strategy.as_mut(), series, config));
        }
    }
    results
}

/// Timestamp of the first and last trade attempts, if any.
pub fn ledger_span(ledger: &[TradeRecord]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    Some((ledger.first()?.timestamp, ledger.last()?.timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::domain::broker::TradeStatus;
    use crate::domain::indicator::test_bars::from_closes;
    use crate::domain::strategy::MovingAverageCrossover;

    /// Emits fixed signals from a per-bar script, keyed by history length.
    struct Scripted {
        buys: Vec<f64>,
        sells: Vec<f64>,
        seen: usize,
        sell_queries: std::cell::Cell<usize>,
    }

    impl Scripted {
        fn new(buys: &[f64], sells: &[f64]) -> Self {
            Scripted {
                buys: buys.to_vec(),
                sells: sells.to_vec(),
                seen: 0,
                sell_queries: std::cell::Cell::new(0),
            }
        }
    }

    impl Strategy for Scripted {
        fn name(&self) -> &str {
            "Scripted"
        }
        fn set_history(&mut self, history: &[PriceBar]) {
            self.seen = history.len();
        }
        fn buy_signal(&self, _bar: &PriceBar) -> Signal {
            self.buys.get(self.seen - 1).copied().unwrap_or(0.0)
        }
        fn sell_signal(&self, _bar: &PriceBar) -> Signal {
            self.sell_queries.set(self.sell_queries.get() + 1);
            self.sells.get(self.seen - 1).copied().unwrap_or(0.0)
        }
        fn reset(&mut self) {
            self.seen = 0;
        }
    }

    #[test]
    fn empty_series_is_unchanged() {
        let mut strategy = Scripted::new(&[], &[]);
        let result = run_backtest(&mut strategy, "X", &[], &BacktestConfig::default());
        assert_eq!(result.trade_count, 0);
        assert_eq!(result.profit, 0.0);
        assert_eq!(result.final_balance_with_holdings, 10_000.0);
    }

    #[test]
    fn buy_takes_precedence_over_sell() {
        let bars = from_closes(&[10.0, 10.0]);
        let mut strategy = Scripted::new(&[1.0, 0.0], &[1.0, 0.0]);
        let result = run_backtest(&mut strategy, "X", &bars, &BacktestConfig::default());
        assert_eq!(result.trade_count, 1);
        assert_eq!(result.ledger[0].side, TradeSide::Buy);
        assert_eq!(strategy.sell_queries.get(), 1);
    }

    #[test]
    fn volume_is_floored_multiple_of_signal() {
        let bars = from_closes(&[10.0]);
        let mut strategy = Scripted::new(&[0.75], &[]);
        let config = BacktestConfig {
            multiplier: 10.0,
            ..BacktestConfig::default()
        };
        let result = run_backtest(&mut strategy, "X", &bars, &config);
        assert_eq!(result.ledger[0].volume, 7);
        assert_eq!(result.final_holdings, 7);
    }

    #[test]
    fn zero_volume_orders_are_sent_unless_skipped() {
        let bars = from_closes(&[10.0]);
        let mut strategy = Scripted::new(&[0.5], &[]);
        let result = run_backtest(&mut strategy, "X", &bars, &BacktestConfig::default());
        assert_eq!(result.trade_count, 1);
        assert_eq!(result.ledger[0].volume, 0);

        let skip = BacktestConfig {
            skip_zero_volume: true,
            ..BacktestConfig::default()
        };
        strategy.reset();
        let result = run_backtest(&mut strategy, "X", &bars, &skip);
        assert_eq!(result.trade_count, 0);
    }

    #[test]
    fn final_accounting_marks_holdings_at_last_close() {
        let bars = from_closes(&[10.0, 12.0, 15.0]);
        let mut strategy = Scripted::new(&[3.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        let config = BacktestConfig {
            initial_balance: 100.0,
            multiplier: 1.0,
            skip_zero_volume: false,
        };
        let result = run_backtest(&mut strategy, "X", &bars, &config);
        // buy 3 @ 10, sell 1 @ 12
        assert_abs_diff_eq!(result.final_balance, 82.0, epsilon = 1e-9);
        assert_eq!(result.final_holdings, 2);
        assert_abs_diff_eq!(result.final_balance_with_holdings, 112.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.profit, -18.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.profit_with_holdings, 12.0, epsilon = 1e-9);
        assert_eq!(result.trade_count, 2);
        assert_eq!(result.filled_trades(), 2);
    }

    #[test]
    fn failed_trades_do_not_abort_the_run() {
        let bars = from_closes(&[10.0, 10.0, 10.0]);
        let mut strategy = Scripted::new(&[0.0, 50.0, 1.0], &[1.0, 0.0, 0.0]);
        let config = BacktestConfig {
            initial_balance: 100.0,
            ..BacktestConfig::default()
        };
        let result = run_backtest(&mut strategy, "X", &bars, &config);
        let statuses: Vec<TradeStatus> = result.ledger.iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            vec![
                TradeStatus::InsufficientAssets,
                TradeStatus::InsufficientFunds,
                TradeStatus::Success
            ]
        );
    }

    #[test]
    fn records_carry_bar_timestamps() {
        let bars = from_closes(&[10.0, 10.0]);
        let mut strategy = Scripted::new(&[0.0, 1.0], &[]);
        let result = run_backtest(&mut strategy, "X", &bars, &BacktestConfig::default());
        assert_eq!(result.ledger[0].timestamp, bars[1].timestamp);
        assert_eq!(
            ledger_span(&result.ledger),
            Some((bars[1].timestamp, bars[1].timestamp))
        );
    }

    #[test]
    fn universe_is_symbol_major_and_resets() {
        let closes = [10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 6.0, 8.0, 10.0, 12.0, 9.0, 5.0, 4.0];
        let universe = vec![
            PriceSeries::from_bars("AAA", from_closes(&closes)),
            PriceSeries::from_bars("BBB", from_closes(&closes)),
        ];
        let mut strategies: Vec<Box<dyn Strategy>> = vec![
            Box::new(MovingAverageCrossover::new(2, 4)),
            Box::new(Scripted::new(&[], &[])),
        ];
        let results = run_universe(&mut strategies, &universe, &BacktestConfig::default());
        let order: Vec<(&str, &str)> = results
            .iter()
            .map(|r| (r.symbol.as_str(), r.strategy.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("AAA", "Moving Average Crossover"),
                ("AAA", "Scripted"),
                ("BBB", "Moving Average Crossover"),
                ("BBB", "Scripted"),
            ]
        );
        // Identical series must replay identically after reset.
        assert_eq!(results[0].ledger.len(), results[2].ledger.len());
        assert_eq!(results[0].profit, results[2].profit);
    }

    #[test]
    fn run_fresh_resets_before_replay() {
        // Ends with the short average below the long one; without a reset the
        // opening sell at bar 3 would not repeat.
        let closes = [10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 6.0, 8.0, 10.0, 12.0, 9.0, 5.0, 4.0];
        let series = PriceSeries::from_bars("AAA", from_closes(&closes));
        let mut strategy = MovingAverageCrossover::new(2, 4);
        let config = BacktestConfig::default();

        let first = run_fresh(&mut strategy, &series, &config);
        let second = run_fresh(&mut strategy, &series, &config);
        assert_eq!(first.ledger.len(), 3);
        assert_eq!(first.ledger, second.ledger);

        let stale = run_backtest(&mut strategy, "AAA", series.bars(), &config);
        assert_eq!(stale.ledger.len(), 2);
    }

    #[test]
    fn order_volume_clamps() {
        assert_eq!(order_volume(1.0, 1.0), 1);
        assert_eq!(order_volume(2.0, 0.49), 0);
        assert_eq!(order_volume(1.0, -3.0), 0);
        assert_eq!(order_volume(1.0, f64::NAN), 0);
    }
}
