//! Loads a trailing year of daily prices per symbol into a `stock_prices` table.
//!
//! The flow for one run is [`config::LoaderConfig`] → [`pipeline::Pipeline`],
//! which fetches each symbol through a
//! [`DataProvider`](market_data_ingestor::providers::DataProvider), filters rows with
//! [`validate::validate_bar`], writes them with [`upsert::upsert_batch`] and
//! collects a [`report::RunReport`].

#![deny(missing_docs)]

pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod upsert;
pub mod validate;
