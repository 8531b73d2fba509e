//! Yahoo Finance v8 chart API provider (daily bars, dividends and splits).

pub mod params;
pub mod provider;
pub mod response;

pub use params::{Adjustment, YahooChartParams};
pub use provider::YahooProvider;
