//! Immediate-execution broker over a [`Portfolio`].
//!
//! Every execution attempt is appended to the ledger, whether it fills or is
//! rejected; a rejection leaves cash and holdings untouched.

use chrono::NaiveDateTime;
use std::fmt;
use tracing::debug;

use super::portfolio::Portfolio;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "buy"),
            TradeSide::Sell => write!(f, "sell"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeStatus {
    Success,
    InsufficientFunds,
    InsufficientAssets,
    InvalidPrice,
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeStatus::Success => write!(f, "success"),
            TradeStatus::InsufficientFunds => write!(f, "insufficient_funds"),
            TradeStatus::InsufficientAssets => write!(f, "insufficient_assets"),
            TradeStatus::InvalidPrice => write!(f, "invalid_price"),
        }
    }
}

/// One execution attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub timestamp: NaiveDateTime,
    pub side: TradeSide,
    pub symbol: String,
    pub price: f64,
    pub volume: u64,
    pub status: TradeStatus,
}

impl TradeRecord {
    pub fn is_filled(&self) -> bool {
        self.status == TradeStatus::Success
    }
}

#[derive(Debug, Clone)]
pub struct Broker {
    portfolio: Portfolio,
    ledger: Vec<TradeRecord>,
}

impl Broker {
    pub fn new(initial_balance: f64) -> Self {
        Broker {
            portfolio: Portfolio::new(initial_balance),
            ledger: Vec::new(),
        }
    }

    /// Attempts a market order at `price`. Returns whether it filled.
    ///
    /// A buy fills iff `balance >= price * volume`; a sell fills iff the
    /// symbol's holdings cover `volume`. Negative or non-finite prices never fill.
    pub fn execute_trade(
        &mut self,
        side: TradeSide,
        symbol: &str,
        price: f64,
        volume: u64,
        timestamp: NaiveDateTime,
    ) -> bool {
        let status = match side {
            _ if !price.is_finite() || price < 0.0 => TradeStatus::InvalidPrice,
            TradeSide::Buy => {
                let cost = price * volume as f64;
                if self.portfolio.cash >= cost {
                    self.portfolio.cash -= cost;
                    self.portfolio.credit_units(symbol, volume);
                    TradeStatus::Success
                } else {
                    TradeStatus::InsufficientFunds
                }
            }
            TradeSide::Sell => {
                if self.portfolio.holdings(symbol) >= volume {
                    self.portfolio.cash += price * volume as f64;
                    self.portfolio.debit_units(symbol, volume);
                    TradeStatus::Success
                } else {
                    TradeStatus::InsufficientAssets
                }
            }
        };

        debug!(
            %side,
            symbol,
            price,
            volume,
            %status,
            balance = self.portfolio.cash,
            "trade attempt"
        );

        self.ledger.push(TradeRecord {
            timestamp,
            side,
            symbol: symbol.to_string(),
            price,
            volume,
            status,
        });
        status == TradeStatus::Success
    }

    pub fn balance(&self) -> f64 {
        self.portfolio.cash
    }

    pub fn holdings(&self, symbol: &str) -> u64 {
        self.portfolio.holdings(symbol)
    }

    pub fn ledger(&self) -> &[TradeRecord] {
        &self.ledger
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn into_ledger(self) -> Vec<TradeRecord> {
        self.ledger
    }
}
