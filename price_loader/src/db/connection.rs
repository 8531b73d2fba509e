//! Connection helpers for the two supported backends.

use diesel::connection::SimpleConnection;
use diesel::{Connection, PgConnection, SqliteConnection};
use secrecy::ExposeSecret;

use crate::config::DbConfig;
use crate::db::StoreError;

/// Open the PostgreSQL connection described by `config`.
pub fn connect_postgres(config: &DbConfig) -> Result<PgConnection, StoreError> {
    PgConnection::establish(config.connection_string().expose_secret()).map_err(|source| {
        StoreError::Connect {
            target: config.display_target(),
            source,
        }
    })
}

/// Open a SQLite connection and apply connection-wide PRAGMAs.
pub fn connect_sqlite(path: &str) -> Result<SqliteConnection, StoreError> {
    let mut conn = SqliteConnection::establish(path).map_err(|source| StoreError::Connect {
        target: format!("sqlite file {path}"),
        source,
    })?;

    conn.batch_execute("PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000;")?;
    Ok(conn)
}
