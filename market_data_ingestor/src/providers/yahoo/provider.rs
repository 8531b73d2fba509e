use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use snafu::ResultExt;
use tracing::debug;

use crate::{
    models::{bar::Bar, bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{
        ApiSnafu, ClientBuildSnafu, DataProvider, DataSourceError, DecodeSnafu, MalformedSnafu,
        ProviderInitError, ReqwestSnafu, SymbolNotFoundSnafu,
        yahoo::{
            params::{Adjustment, chart_params, construct_params},
            response::{ChartEnvelope, ChartResult, Events},
        },
    },
};

const BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct YahooProvider {
    client: Client,
    base_url: String,
}

impl YahooProvider {
    /// Creates a provider talking to the public Yahoo Finance chart endpoint.
    pub fn new() -> Result<Self, ProviderInitError> {
        Self::with_base_url(BASE_URL)
    }

    /// Creates a provider against another chart endpoint (a mirror or a local fake).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderInitError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl DataProvider for YahooProvider {
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<BarSeries, DataSourceError> {
        let options = chart_params(&params);
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), params.symbol);
        debug!(symbol = %params.symbol, %url, start = %params.start, end = %params.end, "requesting chart");

        let response = self
            .client
            .get(&url)
            .query(&construct_params(&params))
            .send()
            .await
            .context(ReqwestSnafu)?;

        let status = response.status();
        let body = response.text().await.context(ReqwestSnafu)?;

        match serde_json::from_str::<ChartEnvelope>(&body) {
            // Yahoo reports unknown symbols as a 404 that still carries a chart error.
            Ok(envelope) if status.is_success() || envelope.chart.error.is_some() => {
                series_from_chart(&params.symbol, envelope, options.adjustment)
            }
            Err(source) if status.is_success() => Err(source).context(DecodeSnafu),
            _ => ApiSnafu {
                message: format!("HTTP {status}: {}", body.chars().take(200).collect::<String>()),
            }
            .fail(),
        }
    }
}

/// Turns a decoded chart response into an ascending [`BarSeries`].
pub fn series_from_chart(
    symbol: &str,
    envelope: ChartEnvelope,
    adjustment: Adjustment,
) -> Result<BarSeries, DataSourceError> {
    let chart = envelope.chart;

    if let Some(err) = chart.error {
        if err.code == "Not Found" {
            return SymbolNotFoundSnafu {
                symbol,
                message: err.description,
            }
            .fail();
        }
        return ApiSnafu {
            message: format!("{}: {}", err.code, err.description),
        }
        .fail();
    }

    let Some(result) = chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(BarSeries::new(symbol, vec![]));
    };

    let bars = bars_from_result(symbol, result, adjustment)?;
    Ok(BarSeries::new(symbol, bars))
}

fn bars_from_result(
    symbol: &str,
    result: ChartResult,
    adjustment: Adjustment,
) -> Result<Vec<Bar>, DataSourceError> {
    let offset = result.meta.gmtoffset;
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .unwrap_or_default();
    let (dividends, splits) = events_by_date(&result.events, offset)?;

    let at = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let date = local_date(ts, offset)?;
        let mut bar = Bar {
            date,
            open: at(&quote.open, i),
            high: at(&quote.high, i),
            low: at(&quote.low, i),
            close: at(&quote.close, i),
            volume: at(&quote.volume, i),
            dividends: dividends.get(&date).copied(),
            stock_splits: splits.get(&date).copied(),
        };
        if adjustment == Adjustment::All {
            apply_adjusted_close(&mut bar, at(&adjclose, i));
        }
        bars.push(bar);
    }

    let bar_dates: BTreeSet<NaiveDate> = bars.iter().map(|b| b.date).collect();
    let orphaned = dividends
        .keys()
        .chain(splits.keys())
        .filter(|d| !bar_dates.contains(d))
        .count();
    if orphaned > 0 {
        debug!(symbol, orphaned, "dropping corporate actions without a matching bar");
    }

    Ok(bars)
}

fn events_by_date(
    events: &Events,
    offset: i64,
) -> Result<(HashMap<NaiveDate, f64>, HashMap<NaiveDate, f64>), DataSourceError> {
    let mut dividends = HashMap::new();
    for event in events.dividends.values() {
        *dividends.entry(local_date(event.date, offset)?).or_insert(0.0) += event.amount;
    }

    let mut splits = HashMap::new();
    for event in events.splits.values() {
        if event.denominator != 0.0 {
            splits.insert(local_date(event.date, offset)?, event.numerator / event.denominator);
        }
    }

    Ok((dividends, splits))
}

fn local_date(ts: i64, offset: i64) -> Result<NaiveDate, DataSourceError> {
    match DateTime::from_timestamp(ts.saturating_add(offset), 0) {
        Some(dt) => Ok(dt.date_naive()),
        None => MalformedSnafu {
            message: format!("timestamp {ts} out of range"),
        }
        .fail(),
    }
}

/// Scales open/high/low by `adjclose / close` and replaces close.
///
/// Bars without a usable close or adjusted close stay as traded.
fn apply_adjusted_close(bar: &mut Bar, adjclose: Option<f64>) {
    let (Some(close), Some(adj)) = (bar.close, adjclose) else {
        return;
    };
    if close == 0.0 || !close.is_finite() || !adj.is_finite() {
        return;
    }
    let ratio = adj / close;
    bar.open = bar.open.map(|v| v * ratio);
    bar.high = bar.high.map(|v| v * ratio);
    bar.low = bar.low.map(|v| v * ratio);
    bar.close = Some(adj);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn decode(body: &str) -> ChartEnvelope {
        serde_json::from_str(body).expect("fixture decodes")
    }

    // Two sessions of a NYSE listing (14:30 UTC open, -5h offset) with a
    // dividend on the second and a missing volume on the first.
    const TWO_DAYS: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "MSFT", "gmtoffset": -18000},
                "timestamp": [1704205800, 1704292200],
                "events": {
                    "dividends": {"1704292200": {"amount": 0.75, "date": 1704292200}},
                    "splits": {"1704205800": {"date": 1704205800, "numerator": 4, "denominator": 1, "splitRatio": "4:1"}}
                },
                "indicators": {
                    "quote": [{
                        "open":   [373.86, 369.01],
                        "high":   [375.90, 373.26],
                        "low":    [366.77, 368.51],
                        "close":  [370.87, 370.60],
                        "volume": [null, 23083500]
                    }],
                    "adjclose": [{"adjclose": [185.435, 370.60]}]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn raw_series_keeps_quotes_and_joins_events() {
        let series = series_from_chart("MSFT", decode(TWO_DAYS), Adjustment::Raw).unwrap();

        assert_eq!(series.symbol, "MSFT");
        assert_eq!(series.bars.len(), 2);

        let first = &series.bars[0];
        assert_eq!(first.date, d(2024, 1, 2));
        assert_eq!(first.open, Some(373.86));
        assert_eq!(first.close, Some(370.87));
        assert_eq!(first.volume, None);
        assert_eq!(first.dividends, None);
        assert_eq!(first.stock_splits, Some(4.0));

        let second = &series.bars[1];
        assert_eq!(second.date, d(2024, 1, 3));
        assert_eq!(second.volume, Some(23083500.0));
        assert_eq!(second.dividends, Some(0.75));
        assert_eq!(second.stock_splits, None);
    }

    #[test]
    fn adjusted_series_scales_by_adjclose_ratio() {
        let series = series_from_chart("MSFT", decode(TWO_DAYS), Adjustment::All).unwrap();

        let first = &series.bars[0];
        assert_eq!(first.close, Some(185.435));
        let open = first.open.unwrap();
        assert!((open - 373.86 * 0.5).abs() < 1e-9, "open was {open}");

        let second = &series.bars[1];
        assert_eq!(second.open, Some(369.01));
        assert_eq!(second.close, Some(370.60));
    }

    #[test]
    fn local_date_respects_exchange_offset() {
        // 2024-01-07 23:00 UTC is already Monday morning in Sydney (+11h).
        assert_eq!(local_date(1704668400, 39600).unwrap(), d(2024, 1, 8));
        assert_eq!(local_date(1704668400, 0).unwrap(), d(2024, 1, 7));
    }

    #[test]
    fn not_found_error_maps_to_symbol_not_found() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = series_from_chart("ZZZQQQ", decode(body), Adjustment::All).unwrap_err();

        match err {
            DataSourceError::SymbolNotFound { symbol, message, .. } => {
                assert_eq!(symbol, "ZZZQQQ");
                assert_eq!(message, "No data found, symbol may be delisted");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn other_chart_errors_map_to_api_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input"}}}"#;
        let err = series_from_chart("AAPL", decode(body), Adjustment::All).unwrap_err();
        assert_eq!(err.to_string(), "API error: Bad Request: Invalid input");
    }

    #[test]
    fn result_without_timestamps_is_an_empty_series() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":-18000},"indicators":{"quote":[{}],"adjclose":[{}]}}],"error":null}}"#;
        let series = series_from_chart("ZZZQQQ", decode(body), Adjustment::All).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn short_quote_columns_leave_missing_values() {
        let body = r#"{"chart":{"result":[{
            "meta":{"gmtoffset":0},
            "timestamp":[1704153600, 1704240000],
            "indicators":{"quote":[{"open":[1.0],"high":[1.0],"low":[1.0],"close":[1.0],"volume":[10]}]}
        }],"error":null}}"#;
        let series = series_from_chart("X", decode(body), Adjustment::All).unwrap();

        assert_eq!(series.bars[0].close, Some(1.0));
        assert_eq!(series.bars[1], Bar::empty(d(2024, 1, 3)));
    }
}
