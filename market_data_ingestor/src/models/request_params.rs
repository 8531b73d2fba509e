use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::providers::yahoo::YahooChartParams;

/// Length of the history window requested for every symbol.
pub const LOOKBACK_DAYS: i64 = 365;

/// Universal parameters for requesting daily bars from any market data provider.
///
/// This struct is vendor-agnostic and is the standard input for all
/// [`DataProvider`](crate::providers::DataProvider) implementations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BarsRequestParams {
    /// Upper-case ticker to request (e.g., `"AAPL"`).
    pub symbol: String,

    /// Start of the requested time range (inclusive, UTC).
    pub start: DateTime<Utc>,

    /// End of the requested time range (inclusive, UTC).
    pub end: DateTime<Utc>,

    /// Optional, provider-specific parameters.
    #[serde(default)]
    pub provider_specific: ProviderParams,
}

impl BarsRequestParams {
    /// Request covering the [`LOOKBACK_DAYS`] days that end at `now`.
    pub fn trailing_year(symbol: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.into(),
            start: now - Duration::days(LOOKBACK_DAYS),
            end: now,
            provider_specific: ProviderParams::None,
        }
    }

    /// Replaces the provider-specific parameters.
    pub fn with_provider_params(mut self, params: ProviderParams) -> Self {
        self.provider_specific = params;
        self
    }
}

/// An enum to hold provider-specific request parameters.
///
/// This allows callers to specify per-request options for a particular
/// provider without cluttering the universal `BarsRequestParams`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ProviderParams {
    #[default]
    None,
    Yahoo(YahooChartParams),
}
