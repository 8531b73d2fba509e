use serde::{Deserialize, Serialize};

use crate::models::request_params::{BarsRequestParams, ProviderParams};

/// Specifies the corporate action adjustment for stored prices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    /// Prices as traded.
    Raw,
    /// Open/high/low/close scaled by the dividend and split adjusted close.
    #[default]
    All,
}

/// Yahoo-specific parameters for a chart request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct YahooChartParams {
    #[serde(default)]
    pub adjustment: Adjustment,
}

/// Pulls the Yahoo options out of the universal params, falling back to defaults.
pub fn chart_params(params: &BarsRequestParams) -> YahooChartParams {
    match &params.provider_specific {
        ProviderParams::Yahoo(p) => p.clone(),
        ProviderParams::None => YahooChartParams::default(),
    }
}

/// Builds the query string for the chart endpoint.
pub fn construct_params(params: &BarsRequestParams) -> Vec<(String, String)> {
    vec![
        ("period1".to_string(), params.start.timestamp().to_string()),
        ("period2".to_string(), params.end.timestamp().to_string()),
        ("interval".to_string(), "1d".to_string()),
        ("events".to_string(), "div|split".to_string()),
        ("includeAdjustedClose".to_string(), "true".to_string()),
    ]
}
