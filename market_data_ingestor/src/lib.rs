//! Fetching side of the price loader: vendor-agnostic daily bar models and the
//! [`providers::DataProvider`] trait with its Yahoo Finance implementation.

pub mod models;
pub mod providers;
