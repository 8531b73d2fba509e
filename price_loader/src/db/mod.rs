//! Database utilities for connections and schema migrations.
//!
//! This module provides:
//! - Connection helpers: [`connection::connect_postgres`] for the production store and
//!   [`connection::connect_sqlite`] (WAL, 5000ms busy_timeout) for local files.
//! - Embedded Diesel migrations and the [`migrate::run_pending`] runner, which works
//!   on either backend.
//!
//! Example:
//! ```no_run
//! use price_loader::db::{connection, migrate};
//!
//! let db_path = std::env::temp_dir().join("price_loader_example.db");
//! let mut conn = connection::connect_sqlite(db_path.to_str().unwrap()).expect("connect");
//! migrate::run_pending(&mut conn).expect("migrations");
//! ```
//!
//! Note: Building with PostgreSQL support requires the system libpq (e.g., libpq-dev on Debian/Ubuntu).

pub mod connection;
pub mod migrate;

use thiserror::Error;

/// Errors raised while opening or preparing the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("Failed to connect to {target}: {source}")]
    Connect {
        /// Human-readable description of the store (never includes the password).
        target: String,
        /// Underlying diesel error.
        #[source]
        source: diesel::ConnectionError,
    },

    /// A connection-level statement failed.
    #[error("Database error: {0}")]
    Query(#[from] diesel::result::Error),

    /// Embedded migrations could not be applied.
    #[error("Failed to apply migrations: {0}")]
    Migration(String),
}
