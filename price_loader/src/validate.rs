//! Row validation: turns a fetched [`Bar`] into a persistable [`PriceBar`].
//!
//! A row is rejected when any of open/high/low/close/volume is missing, NaN,
//! infinite or negative. Missing or non-finite dividends and splits become `0.0`.
//! Checks are per row only.

use market_data_ingestor::models::bar::Bar;
use thiserror::Error;

use crate::models::PriceBar;

/// Why a fetched row was not persisted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowRejection {
    /// A required value is null.
    #[error("{0} is missing")]
    Missing(&'static str),
    /// A required value is NaN.
    #[error("{0} is not a number")]
    NotANumber(&'static str),
    /// A required value is infinite.
    #[error("{0} is infinite")]
    Infinite(&'static str),
    /// A required value is below zero.
    #[error("{0} is negative")]
    Negative(&'static str),
    /// The volume does not fit the volume column.
    #[error("volume {0} is out of range")]
    VolumeOutOfRange(f64),
}

/// Validates `bar` for `symbol`.
///
/// Fractional volumes are truncated toward zero.
pub fn validate_bar(symbol: &str, bar: &Bar) -> Result<PriceBar, RowRejection> {
    let open = required("open", bar.open)?;
    let high = required("high", bar.high)?;
    let low = required("low", bar.low)?;
    let close = required("close", bar.close)?;
    let volume = required("volume", bar.volume)?;

    if volume >= i64::MAX as f64 {
        return Err(RowRejection::VolumeOutOfRange(volume));
    }

    Ok(PriceBar {
        symbol: symbol.to_string(),
        date: bar.date,
        open,
        high,
        low,
        close,
        volume: volume.trunc() as i64,
        dividends: or_zero(bar.dividends),
        stock_splits: or_zero(bar.stock_splits),
    })
}

fn required(field: &'static str, value: Option<f64>) -> Result<f64, RowRejection> {
    match value {
        None => Err(RowRejection::Missing(field)),
        Some(v) if v.is_nan() => Err(RowRejection::NotANumber(field)),
        Some(v) if v.is_infinite() => Err(RowRejection::Infinite(field)),
        Some(v) if v < 0.0 => Err(RowRejection::Negative(field)),
        Some(v) => Ok(v),
    }
}

fn or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}
