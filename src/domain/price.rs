//! Price bars and the ordered series a backtest replays.

use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Chronologically ordered bars for one symbol.
///
/// Insertion order is chronological order; the series only grows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>) -> Self {
        PriceSeries {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    pub fn from_bars(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        PriceSeries {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn push(&mut self, bar: PriceBar) {
        self.bars.push(bar);
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PriceBar> {
        self.bars.get(index)
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// Bars `0..=index`: everything observable at bar `index`.
    pub fn window(&self, index: usize) -> &[PriceBar] {
        let end = (index + 1).min(self.bars.len());
        &self.bars[..end]
    }

    pub fn closes(&self) -> Vec<f64> {
        closes(&self.bars)
    }
}

pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}
