//! set up migrations

use diesel::backend::Backend;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::db::StoreError;

/// Embedded Diesel migrations bundled with this crate.
///
/// The only migration creates `stock_prices` with `IF NOT EXISTS`, so it is safe
/// on a database where the table was created by hand.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Runs pending migrations on an open connection and returns how many were applied.
pub fn run_pending<DB: Backend>(conn: &mut impl MigrationHarness<DB>) -> Result<usize, StoreError> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::Migration(e.to_string()))?;
    Ok(applied.len())
}
