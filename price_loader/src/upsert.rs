//! Insert-if-absent writes of [`PriceBar`]s.
//!
//! ## Conflict policy
//! Inserts use `ON CONFLICT (symbol, date) DO NOTHING`: the first stored row for a
//! key is permanent and later fetches never refresh it, even if the provider has
//! since restated a value (e.g. a corrected dividend).
//!
//! ## Transactions
//! [`upsert_batch`] runs one transaction per symbol. Every row inside it gets its
//! own nested transaction (a `SAVEPOINT`), so a row the store rejects is rolled
//! back alone and the rest of the batch is still committed.

use diesel::prelude::*;
use diesel::{PgConnection, SqliteConnection};

use crate::models::{NewPriceBar, PriceBar};
use crate::schema::stock_prices;

/// A diesel connection that can insert price bars.
pub trait PriceStore: Connection {
    /// Inserts one row, ignoring a conflict on `(symbol, date)`.
    ///
    /// Returns the number of affected rows (`0` on conflict).
    fn insert_price_bar(&mut self, row: &NewPriceBar<'_>) -> QueryResult<usize>;
}

macro_rules! impl_price_store {
    ($($conn:ty),+) => {
        $(
            impl PriceStore for $conn {
                fn insert_price_bar(&mut self, row: &NewPriceBar<'_>) -> QueryResult<usize> {
                    diesel::insert_into(stock_prices::table)
                        .values(row)
                        .on_conflict((stock_prices::symbol, stock_prices::date))
                        .do_nothing()
                        .execute(self)
                }
            }
        )+
    };
}

impl_price_store!(PgConnection, SqliteConnection);

/// Result of writing one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The row was new and has been written.
    Inserted,
    /// A row with the same `(symbol, date)` already exists; nothing changed.
    Conflicted,
    /// The store rejected the row; its work was rolled back.
    Failed(String),
}

/// Writes `bar` inside its own nested transaction.
///
/// Called inside an open transaction this is a savepoint; a failure rolls back to
/// it and leaves the enclosing transaction usable.
pub fn upsert_bar<C: PriceStore>(conn: &mut C, bar: &PriceBar) -> UpsertOutcome {
    let row = NewPriceBar::from(bar);
    match conn.transaction::<_, diesel::result::Error, _>(|conn| conn.insert_price_bar(&row)) {
        Ok(0) => UpsertOutcome::Conflicted,
        Ok(_) => UpsertOutcome::Inserted,
        Err(e) => UpsertOutcome::Failed(e.to_string()),
    }
}

/// Writes every bar of one symbol in a single transaction.
///
/// Row failures do not abort the batch; they show up as
/// [`UpsertOutcome::Failed`] at the row's position. An `Err` means the batch
/// transaction itself failed (begin or commit) and nothing was kept.
pub fn upsert_batch<C: PriceStore>(
    conn: &mut C,
    bars: &[PriceBar],
) -> QueryResult<Vec<UpsertOutcome>> {
    conn.transaction(|conn| Ok(bars.iter().map(|bar| upsert_bar(conn, bar)).collect()))
}
