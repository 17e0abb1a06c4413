use inventory_core::db::open_db_in_memory;
use inventory_core::{SqliteBookStore, StoreError};
use rusqlite::types::Value;
use rusqlite::Connection;

fn sample_values() -> Vec<(&'static str, Value)> {
    vec![
        ("productName", Value::Text("Dune".to_string())),
        ("price", Value::Real(9.99)),
        ("quantity", Value::Integer(5)),
        ("supplierName", Value::Text("Acme".to_string())),
        (
            "supplierPhoneNumber",
            Value::Text("+1-555-0100".to_string()),
        ),
    ]
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteBookStore::try_new(&conn);
    match result {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_books_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA user_version = 1;").unwrap();

    let result = SqliteBookStore::try_new(&conn);
    assert!(matches!(
        result,
        Err(StoreError::MissingRequiredTable("books"))
    ));
}

#[test]
fn insert_and_query_roundtrip_raw_rows() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::try_new(&conn).unwrap();

    let id = store.insert(&sample_values()).unwrap();
    assert!(id > 0);

    let rows = store.query(None, None, &[], None).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["_id"], Value::Integer(id));
    assert_eq!(rows[0]["productName"], Value::Text("Dune".to_string()));
    assert_eq!(rows[0]["price"], Value::Real(9.99));
    assert_eq!(rows[0]["quantity"], Value::Integer(5));
}

#[test]
fn projection_limits_returned_columns() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::try_new(&conn).unwrap();
    store.insert(&sample_values()).unwrap();

    let rows = store
        .query(Some(&["productName", "quantity"]), None, &[], None)
        .unwrap();
    assert_eq!(rows[0].len(), 2);
    assert!(rows[0].contains_key("productName"));
    assert!(rows[0].contains_key("quantity"));
    assert!(!rows[0].contains_key("price"));
}

#[test]
fn unknown_projection_column_is_a_store_error() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::try_new(&conn).unwrap();

    let result = store.query(Some(&["noSuchColumn"]), None, &[], None);
    assert!(matches!(result, Err(StoreError::Db(_))));
}

#[test]
fn predicate_and_order_shape_query_results() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::try_new(&conn).unwrap();

    for (name, quantity) in [("A", 1), ("B", 5), ("C", 9)] {
        let mut values = sample_values();
        values[0] = ("productName", Value::Text(name.to_string()));
        values[2] = ("quantity", Value::Integer(quantity));
        store.insert(&values).unwrap();
    }

    let rows = store
        .query(
            None,
            Some("quantity > ?"),
            &[Value::Integer(2)],
            Some("quantity DESC"),
        )
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["productName"], Value::Text("C".to_string()));
    assert_eq!(rows[1]["productName"], Value::Text("B".to_string()));
}

#[test]
fn update_and_delete_report_row_counts() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::try_new(&conn).unwrap();
    let id = store.insert(&sample_values()).unwrap();

    let changed = store
        .update(
            &[("quantity", Value::Integer(10))],
            Some("_id = ?"),
            &[Value::Integer(id)],
        )
        .unwrap();
    assert_eq!(changed, 1);

    let missed = store
        .update(
            &[("quantity", Value::Integer(1))],
            Some("_id = ?"),
            &[Value::Integer(id + 1000)],
        )
        .unwrap();
    assert_eq!(missed, 0);

    let removed = store
        .delete(Some("_id = ?"), &[Value::Integer(id)])
        .unwrap();
    assert_eq!(removed, 1);

    assert!(store.query(None, None, &[], None).unwrap().is_empty());
}

#[test]
fn empty_write_set_is_rejected_at_store_level() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::try_new(&conn).unwrap();

    assert!(matches!(store.insert(&[]), Err(StoreError::EmptyWriteSet)));
    assert!(matches!(
        store.update(&[], None, &[]),
        Err(StoreError::EmptyWriteSet)
    ));
}
