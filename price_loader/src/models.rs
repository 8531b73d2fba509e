//! Diesel models mapping to the `stock_prices` table.
//!
//! [`PriceBar`] is the validated, persistable form of a fetched bar. Rows are
//! write-once: the loader only ever inserts them (see [`crate::upsert`]).

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::schema::stock_prices;

/// A row in [`crate::schema::stock_prices`]: one trading day for one symbol.
///
/// The natural key is `(symbol, date)`.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = stock_prices)]
#[diesel(check_for_backend(diesel::pg::Pg, diesel::sqlite::Sqlite))]
pub struct PriceBar {
    /// Upper-case ticker (e.g., "AAPL").
    pub symbol: String,
    /// Exchange-local trading date.
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Highest price of the day.
    pub high: f64,
    /// Lowest price of the day.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Shares traded.
    pub volume: i64,
    /// Cash dividend going ex on this date, `0.0` when none.
    pub dividends: f64,
    /// Split ratio effective on this date, `0.0` when none.
    pub stock_splits: f64,
}

/// Insertable form of [`PriceBar`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = stock_prices)]
pub struct NewPriceBar<'a> {
    /// Upper-case ticker.
    pub symbol: &'a str,
    /// Exchange-local trading date.
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Highest price of the day.
    pub high: f64,
    /// Lowest price of the day.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Shares traded.
    pub volume: i64,
    /// Cash dividend, `0.0` when none.
    pub dividends: f64,
    /// Split ratio, `0.0` when none.
    pub stock_splits: f64,
}

impl<'a> From<&'a PriceBar> for NewPriceBar<'a> {
    fn from(bar: &'a PriceBar) -> Self {
        Self {
            symbol: &bar.symbol,
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            dividends: bar.dividends,
            stock_splits: bar.stock_splits,
        }
    }
}
