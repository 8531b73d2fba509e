#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Integer, Text};
use market_data_ingestor::models::bar::Bar;
use market_data_ingestor::models::bar_series::BarSeries;
use market_data_ingestor::models::request_params::BarsRequestParams;
use market_data_ingestor::providers::{ApiSnafu, DataProvider, DataSourceError};
use price_loader::db::{connection, migrate};
use price_loader::models::PriceBar;
use price_loader::schema::stock_prices;
use tempfile::TempDir;

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}

#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = Integer, column_name = "timeout")]
    busy_timeout: i32,
}

pub struct TestDb {
    _dir: TempDir,    // keep alive for the life of the test
    pub path: String, // <tmpdir>/prices.db
}

/// Fresh SQLite file with the embedded migrations applied.
pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("prices.db");
    let path = p.to_string_lossy().to_string();

    let mut conn = connection::connect_sqlite(&path).expect("connect");
    migrate::run_pending(&mut conn).expect("migrations");
    (TestDb { _dir: dir, path }, conn)
}

pub fn assert_sqlite_pragmas(conn: &mut SqliteConnection) {
    let jm: JournalMode = sql_query("PRAGMA journal_mode;").get_result(conn).unwrap();
    assert_eq!(jm.journal_mode.to_lowercase(), "wal");

    let bt: BusyTimeout = sql_query("PRAGMA busy_timeout;").get_result(conn).unwrap();
    assert_eq!(bt.busy_timeout, 5000);
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A complete fetched bar; prices derive from `seed` so rows differ.
pub fn bar(date: NaiveDate, seed: f64) -> Bar {
    Bar {
        date,
        open: Some(100.0 + seed),
        high: Some(101.0 + seed),
        low: Some(99.0 + seed),
        close: Some(100.5 + seed),
        volume: Some(1_000_000.0 + seed),
        dividends: None,
        stock_splits: None,
    }
}

/// `n` consecutive daily bars starting at 2024-01-02.
pub fn bars(n: usize) -> Vec<Bar> {
    let start = day(2024, 1, 2);
    (0..n)
        .map(|i| bar(start + chrono::Duration::days(i as i64), i as f64))
        .collect()
}

/// A validated row as the store sees it.
pub fn price_bar(symbol: &str, date: NaiveDate, open: f64) -> PriceBar {
    PriceBar {
        symbol: symbol.to_string(),
        date,
        open,
        high: open + 1.0,
        low: open - 0.5,
        close: open + 0.5,
        volume: 1_000,
        dividends: 0.0,
        stock_splits: 0.0,
    }
}

pub fn count_rows(conn: &mut SqliteConnection, symbol: &str) -> i64 {
    stock_prices::table
        .filter(stock_prices::symbol.eq(symbol))
        .count()
        .get_result(conn)
        .expect("count")
}

pub fn load_rows(conn: &mut SqliteConnection, symbol: &str) -> Vec<PriceBar> {
    stock_prices::table
        .filter(stock_prices::symbol.eq(symbol))
        .order(stock_prices::date.asc())
        .select(PriceBar::as_select())
        .load(conn)
        .expect("load")
}

pub enum Canned {
    Bars(Vec<Bar>),
    Fail(&'static str),
}

/// Serves canned responses per symbol; unknown symbols get an empty series.
#[derive(Default)]
pub struct StubProvider {
    responses: HashMap<String, Canned>,
}

impl StubProvider {
    pub fn with(mut self, symbol: &str, response: Canned) -> Self {
        self.responses.insert(symbol.to_string(), response);
        self
    }
}

#[async_trait]
impl DataProvider for StubProvider {
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<BarSeries, DataSourceError> {
        match self.responses.get(&params.symbol) {
            Some(Canned::Bars(bars)) => Ok(BarSeries::new(params.symbol, bars.clone())),
            Some(Canned::Fail(message)) => ApiSnafu { message: *message }.fail(),
            None => Ok(BarSeries::new(params.symbol, vec![])),
        }
    }
}

pub fn symbols(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
