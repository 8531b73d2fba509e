//! A collection of daily bars for a specific symbol.

use crate::models::bar::Bar;

/// Represents the complete daily series fetched for a single symbol.
///
/// Bars are ordered by ascending date. An empty series is a valid result: the
/// symbol exists but the provider has nothing for the requested window.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    /// The symbol this data represents (e.g., "AAPL").
    pub symbol: String,
    /// The collection of daily bars.
    pub bars: Vec<Bar>,
}

impl BarSeries {
    /// Builds a series, sorting `bars` by date.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    /// Returns `true` when the provider returned no bars.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
