//! End-to-end scenarios (spec §8.3), driven through the façade's `Connection`/
//! `Cursor` API against the in-memory backing store and an in-memory catalog.

use std::collections::HashMap;

use golembase_catalog::InMemoryCatalogStore;
use golembase_core::data::DataValue;
use golembase_core::err::DbError;
use golembase_facade::cursor::Execution;
use golembase_facade::Connection;
use golembase_store::MemoryStore;

fn conn_str(app_id: &str, schema_id: &str) -> String {
    format!(
        "rpc_url=https://rpc.example;ws_url=wss://rpc.example;private_key=0xabc;app_id={app_id};schema_id={schema_id}"
    )
}

fn params() -> HashMap<String, DataValue> {
    HashMap::new()
}

fn bind(pairs: &[(&str, DataValue)]) -> HashMap<String, DataValue> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn rows(execution: Execution) -> Vec<golembase_translator::Row> {
    match execution {
        Execution::Rows(rows) => rows,
        Execution::RowCount(_) => panic!("expected a row set"),
    }
}

#[tokio::test]
async fn ddl_persistence_then_show_and_describe() {
    golembase_logging::init_for_tests();
    let catalog_store = InMemoryCatalogStore::default();
    let backing_store = MemoryStore::default();
    let conn = Connection::open(&conn_str("acme", "acme_main"), &catalog_store, &backing_store).unwrap();
    let cursor = conn.cursor();

    cursor
        .execute(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR(50))",
            &params(),
        )
        .await
        .unwrap();

    let tables = rows(cursor.execute("SHOW TABLES", &params()).await.unwrap());
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].get("table_name"), Some(&DataValue::Utf8String("users".into())));

    let described = rows(cursor.execute("DESCRIBE users", &params()).await.unwrap());
    assert_eq!(described.len(), 2);
    assert_eq!(described[0].get("column_name"), Some(&DataValue::Utf8String("id".into())));
    assert_eq!(described[1].get("column_name"), Some(&DataValue::Utf8String("name".into())));
}

#[tokio::test]
async fn insert_then_select_with_predicate() {
    golembase_logging::init_for_tests();
    let catalog_store = InMemoryCatalogStore::default();
    let backing_store = MemoryStore::default();
    let conn = Connection::open(&conn_str("acme", "acme_main"), &catalog_store, &backing_store).unwrap();
    let cursor = conn.cursor();

    cursor
        .execute(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR(50))",
            &params(),
        )
        .await
        .unwrap();
    cursor
        .execute(
            "INSERT INTO users (id, name) VALUES (:id, :name)",
            &bind(&[("id", DataValue::Integer(1)), ("name", DataValue::Utf8String("a".into()))]),
        )
        .await
        .unwrap();
    cursor
        .execute(
            "INSERT INTO users (id, name) VALUES (:id, :name)",
            &bind(&[("id", DataValue::Integer(2)), ("name", DataValue::Utf8String("b".into()))]),
        )
        .await
        .unwrap();

    let found = rows(
        cursor
            .execute("SELECT * FROM users WHERE id > :min_id", &bind(&[("min_id", DataValue::Integer(1))]))
            .await
            .unwrap(),
    );
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get("id"), Some(&DataValue::Integer(2)));
    assert_eq!(found[0].get("name"), Some(&DataValue::Utf8String("b".into())));
}

#[tokio::test]
async fn range_query_over_negative_integers() {
    golembase_logging::init_for_tests();
    let catalog_store = InMemoryCatalogStore::default();
    let backing_store = MemoryStore::default();
    let conn = Connection::open(&conn_str("acme", "acme_main"), &catalog_store, &backing_store).unwrap();
    let cursor = conn.cursor();

    cursor.execute("CREATE TABLE t (delta INTEGER)", &params()).await.unwrap();
    cursor
        .execute("CREATE INDEX idx_delta ON t (delta)", &params())
        .await
        .unwrap();
    for delta in [-5, 0, 5] {
        cursor
            .execute(
                "INSERT INTO t (delta) VALUES (:delta)",
                &bind(&[("delta", DataValue::Integer(delta))]),
            )
            .await
            .unwrap();
    }

    let found = rows(
        cursor
            .execute(
                "SELECT delta FROM t WHERE delta >= :min ORDER BY delta",
                &bind(&[("min", DataValue::Integer(-1))]),
            )
            .await
            .unwrap(),
    );
    let values: Vec<_> = found.iter().map(|r| r.get("delta").cloned().unwrap()).collect();
    assert_eq!(values, vec![DataValue::Integer(0), DataValue::Integer(5)]);
}

#[tokio::test]
async fn decimal_range_query() {
    golembase_logging::init_for_tests();
    let catalog_store = InMemoryCatalogStore::default();
    let backing_store = MemoryStore::default();
    let conn = Connection::open(&conn_str("acme", "acme_main"), &catalog_store, &backing_store).unwrap();
    let cursor = conn.cursor();

    cursor
        .execute("CREATE TABLE t (price DECIMAL(6,2))", &params())
        .await
        .unwrap();
    cursor
        .execute("CREATE INDEX idx_price ON t (price)", &params())
        .await
        .unwrap();
    for price in ["-10.50", "0.00", "10.50"] {
        cursor
            .execute(
                "INSERT INTO t (price) VALUES (:price)",
                &bind(&[("price", DataValue::Decimal(price.parse().unwrap()))]),
            )
            .await
            .unwrap();
    }

    let found = rows(
        cursor
            .execute(
                "SELECT price FROM t WHERE price > :min ORDER BY price",
                &bind(&[("min", DataValue::Decimal("-1.00".parse().unwrap()))]),
            )
            .await
            .unwrap(),
    );
    let values: Vec<_> = found.iter().map(|r| r.get("price").cloned().unwrap()).collect();
    assert_eq!(
        values,
        vec![
            DataValue::Decimal("0.00".parse().unwrap()),
            DataValue::Decimal("10.50".parse().unwrap()),
        ]
    );
}

#[tokio::test]
async fn tenant_isolation_between_app_ids() {
    golembase_logging::init_for_tests();
    let catalog_store_a = InMemoryCatalogStore::default();
    let catalog_store_b = InMemoryCatalogStore::default();
    let backing_store = MemoryStore::default();

    let conn_a = Connection::open(&conn_str("tenant_a", "tenant_a_main"), &catalog_store_a, &backing_store).unwrap();
    let conn_b = Connection::open(&conn_str("tenant_b", "tenant_b_main"), &catalog_store_b, &backing_store).unwrap();
    let cursor_a = conn_a.cursor();
    let cursor_b = conn_b.cursor();

    cursor_a
        .execute("CREATE TABLE users (id INTEGER PRIMARY KEY)", &params())
        .await
        .unwrap();
    cursor_b
        .execute("CREATE TABLE users (id INTEGER PRIMARY KEY)", &params())
        .await
        .unwrap();

    cursor_a
        .execute("INSERT INTO users (id) VALUES (:id)", &bind(&[("id", DataValue::Integer(1))]))
        .await
        .unwrap();

    let a_rows = rows(cursor_a.execute("SELECT * FROM users", &params()).await.unwrap());
    let b_rows = rows(cursor_b.execute("SELECT * FROM users", &params()).await.unwrap());
    assert_eq!(a_rows.len(), 1);
    assert!(b_rows.is_empty());
}

#[tokio::test]
async fn non_indexable_predicate_is_rejected() {
    golembase_logging::init_for_tests();
    let catalog_store = InMemoryCatalogStore::default();
    let backing_store = MemoryStore::default();
    let conn = Connection::open(&conn_str("acme", "acme_main"), &catalog_store, &backing_store).unwrap();
    let cursor = conn.cursor();

    cursor.execute("CREATE TABLE t (x DOUBLE)", &params()).await.unwrap();

    let err = cursor
        .execute("SELECT * FROM t WHERE x > :min", &bind(&[("min", DataValue::Float64(1.0))]))
        .await
        .unwrap_err();
    assert!(matches!(DbError::downcast(&err), Some(DbError::NotSupported(_))));
}
