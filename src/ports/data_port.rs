//! Data access port trait.

use crate::domain::error::SignalbenchError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `symbol` in chronological order, limited to the inclusive
    /// date bounds when given.
    fn fetch_series(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, SignalbenchError>;

    fn list_symbols(&self) -> Result<Vec<String>, SignalbenchError>;
}
