mod common;

use common::{count_rows, day, load_rows, price_bar, setup_db};

use price_loader::upsert::{UpsertOutcome, upsert_bar, upsert_batch};

#[test]
fn first_write_inserts_and_replay_conflicts() {
    let (_db, mut conn) = setup_db();
    let row = price_bar("MSFT", day(2024, 1, 2), 370.87);

    assert_eq!(upsert_bar(&mut conn, &row), UpsertOutcome::Inserted);
    assert_eq!(upsert_bar(&mut conn, &row), UpsertOutcome::Conflicted);
    assert_eq!(count_rows(&mut conn, "MSFT"), 1);
}

#[test]
fn replay_with_restated_values_keeps_stored_row() {
    let (_db, mut conn) = setup_db();
    let original = price_bar("MSFT", day(2024, 1, 2), 370.87);
    let restated = price_bar("MSFT", day(2024, 1, 2), 999.0);

    upsert_batch(&mut conn, std::slice::from_ref(&original)).expect("first batch");
    let outcomes = upsert_batch(&mut conn, &[restated]).expect("second batch");

    assert_eq!(outcomes, vec![UpsertOutcome::Conflicted]);
    assert_eq!(load_rows(&mut conn, "MSFT"), vec![original]);
}

#[test]
fn failed_row_is_rolled_back_alone() {
    let (_db, mut conn) = setup_db();
    // the store's CHECK constraint rejects the negative open
    let batch = vec![
        price_bar("AAPL", day(2024, 1, 2), 185.0),
        price_bar("AAPL", day(2024, 1, 3), -1.0),
        price_bar("AAPL", day(2024, 1, 4), 184.0),
    ];

    let outcomes = upsert_batch(&mut conn, &batch).expect("batch");

    assert_eq!(outcomes[0], UpsertOutcome::Inserted);
    assert!(matches!(outcomes[1], UpsertOutcome::Failed(_)));
    assert_eq!(outcomes[2], UpsertOutcome::Inserted);

    let stored = load_rows(&mut conn, "AAPL");
    assert_eq!(stored, vec![batch[0].clone(), batch[2].clone()]);
}

#[test]
fn empty_batch_is_a_no_op() {
    let (_db, mut conn) = setup_db();
    assert!(upsert_batch(&mut conn, &[]).expect("batch").is_empty());
    assert_eq!(count_rows(&mut conn, "AAPL"), 0);
}
