//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, which serves as a unified interface
//! for fetching daily bar data from any market data vendor (e.g., Yahoo Finance).
//!
//! Each concrete provider implementation should implement [`DataProvider`] to handle
//! vendor-specific API logic and response decoding.
//!
//! The trait is designed for async usage and supports dynamic dispatch (`dyn DataProvider`)
//! for runtime selection of providers.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use market_data_ingestor::models::{
//!     bar_series::BarSeries,
//!     request_params::BarsRequestParams,
//! };
//! use market_data_ingestor::providers::{DataProvider, DataSourceError};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl DataProvider for MyProvider {
//!     async fn fetch_bars(
//!         &self,
//!         params: BarsRequestParams,
//!     ) -> Result<BarSeries, DataSourceError> {
//!         Ok(BarSeries::new(params.symbol, vec![]))
//!     }
//! }
//! ```

pub mod yahoo;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{bar_series::BarSeries, request_params::BarsRequestParams};

/// Trait for fetching daily bar data from a market data provider.
#[async_trait]
pub trait DataProvider {
    /// Fetches the daily bars described by `params`.
    ///
    /// # Returns
    ///
    /// * `Ok(BarSeries)` - The bars for the symbol, ascending by date. May be empty.
    /// * `Err(DataSourceError)` - The lookup failed or the symbol is unknown.
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<BarSeries, DataSourceError>;
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DataSourceError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider does not know the symbol, or it has been de-listed.
    #[snafu(display("Symbol {symbol} not found: {message}"))]
    SymbolNotFound {
        symbol: String,
        message: String,
        backtrace: Backtrace,
    },

    /// The provider's API returned an error message.
    #[snafu(display("API error: {message}"))]
    Api {
        message: String,
        backtrace: Backtrace,
    },

    /// The response body could not be decoded.
    #[snafu(display("Failed to decode provider response: {source}"))]
    Decode {
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// The response decoded but its content is inconsistent.
    #[snafu(display("Malformed provider response: {message}"))]
    Malformed {
        message: String,
        backtrace: Backtrace,
    },
}
