//! Canonical in-memory representation of a daily bar as a provider returns it.
//!
//! This struct is the standard output of every [`DataProvider`](crate::providers::DataProvider)
//! implementation. Nothing here is validated yet: any price or volume may be
//! missing, and it is up to the consumer to decide what to do with such rows.

use chrono::NaiveDate;

/// A single daily OHLCV bar plus the corporate actions recorded on that day.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bar {
    /// Exchange-local trading date.
    pub date: NaiveDate,

    /// Opening price.
    pub open: Option<f64>,

    /// Highest price of the day.
    pub high: Option<f64>,

    /// Lowest price of the day.
    pub low: Option<f64>,

    /// Closing price.
    pub close: Option<f64>,

    /// Shares traded. Kept as a float because providers report gaps as
    /// `null`/NaN in the same column.
    pub volume: Option<f64>,

    /// Cash dividend going ex on this date, if any.
    pub dividends: Option<f64>,

    /// Split ratio (new shares per old share) effective on this date, if any.
    pub stock_splits: Option<f64>,
}

impl Bar {
    /// A bar for `date` with all values missing.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            ..Default::default()
        }
    }
}
