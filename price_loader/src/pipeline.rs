//! The load loop: fetch, validate and store each symbol in turn.
//!
//! Failures are contained at the level they happen. A provider error abandons
//! one symbol, a rejected row skips one row, and neither stops the run.

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use market_data_ingestor::models::request_params::{BarsRequestParams, ProviderParams};
use market_data_ingestor::providers::DataProvider;
use tracing::{error, info, warn};

use crate::models::PriceBar;
use crate::report::{RunReport, SymbolReport, SymbolTally};
use crate::upsert::{PriceStore, UpsertOutcome, upsert_batch};
use crate::validate::validate_bar;

/// Loads daily bars from a provider into a store, one symbol at a time.
pub struct Pipeline<'a, P: ?Sized, C> {
    provider: &'a P,
    conn: &'a mut C,
    provider_params: ProviderParams,
    now: DateTime<Utc>,
}

impl<'a, P, C> Pipeline<'a, P, C>
where
    P: DataProvider + ?Sized,
    C: PriceStore,
{
    /// A pipeline whose fetch window ends now.
    pub fn new(provider: &'a P, conn: &'a mut C, provider_params: ProviderParams) -> Self {
        Self {
            provider,
            conn,
            provider_params,
            now: Utc::now(),
        }
    }

    /// Pins the end of the fetch window.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Processes `symbols` in order and returns one report per symbol.
    ///
    /// A symbol listed more than once is processed only the first time.
    pub async fn run(&mut self, symbols: &[String]) -> RunReport {
        let mut report = RunReport::default();
        let mut seen = IndexSet::with_capacity(symbols.len());
        for symbol in symbols {
            if !seen.insert(symbol.as_str()) {
                warn!(symbol = %symbol, "Symbol listed twice, skipping repeat");
                continue;
            }
            report.push(self.process_symbol(symbol).await);
        }
        info!(symbols = report.len(), "All symbols processed");
        report
    }

    /// Fetches, validates and stores one symbol.
    pub async fn process_symbol(&mut self, symbol: &str) -> SymbolReport {
        info!(symbol, "Downloading data");
        let params = BarsRequestParams::trailing_year(symbol, self.now)
            .with_provider_params(self.provider_params.clone());

        let series = match self.provider.fetch_bars(params).await {
            Ok(series) => series,
            Err(e) => {
                error!(symbol, reason = %e, "Fetch failed, skipping symbol");
                return SymbolReport::failed(symbol, e.to_string());
            }
        };

        if series.is_empty() {
            info!(symbol, "No historical data found, skipping");
            return SymbolReport::empty(symbol);
        }
        info!(symbol, rows = series.bars.len(), "Downloaded data");

        let mut tally = SymbolTally::default();
        let mut rows: Vec<PriceBar> = Vec::with_capacity(series.bars.len());
        for bar in &series.bars {
            match validate_bar(symbol, bar) {
                Ok(row) => rows.push(row),
                Err(reason) => {
                    warn!(symbol, date = %bar.date, reason = %reason, "Skipping invalid row");
                    tally.invalid += 1;
                }
            }
        }

        let outcomes = match upsert_batch(&mut *self.conn, &rows) {
            Ok(outcomes) => outcomes,
            Err(e) => {
                error!(symbol, reason = %e, "Transaction failed, symbol rolled back");
                return SymbolReport::failed(symbol, e.to_string());
            }
        };

        for (row, outcome) in rows.iter().zip(&outcomes) {
            if let UpsertOutcome::Failed(reason) = outcome {
                warn!(symbol, date = %row.date, reason = %reason, "Row insert failed");
            }
            tally.record(outcome);
        }

        info!(
            symbol,
            inserted = tally.inserted,
            skipped = tally.skipped(),
            errored = tally.errored,
            "Symbol processed"
        );
        SymbolReport::processed(symbol, tally)
    }
}
