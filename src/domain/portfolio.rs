//! Cash and holdings state for one backtest run.
//!
//! Only the broker mutates a portfolio. Holdings are whole units, so they can
//! never go negative; cash is debited only after a funds check.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    holdings: HashMap<String, u64>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Portfolio {
            cash: initial_capital,
            holdings: HashMap::new(),
        }
    }

    /// Units held of `symbol`; an absent entry counts as zero.
    pub fn holdings(&self, symbol: &str) -> u64 {
        self.holdings.get(symbol).copied().unwrap_or(0)
    }

    pub(crate) fn credit_units(&mut self, symbol: &str, volume: u64) {
        *self.holdings.entry(symbol.to_string()).or_insert(0) += volume;
    }

    /// Caller must have checked `holdings(symbol) >= volume`.
    pub(crate) fn debit_units(&mut self, symbol: &str, volume: u64) {
        if let Some(held) = self.holdings.get_mut(symbol) {
            *held = held.saturating_sub(volume);
        }
    }

    /// Cash plus holdings of `symbol` valued at `price`.
    pub fn mark_to_market(&self, symbol: &str, price: f64) -> f64 {
        self.cash + self.holdings(symbol) as f64 * price
    }
}
