//! Autoincrement counter entity (spec §4.4.1): a singleton per `(app_id, table, column)`
//! read-modify-write with no locking. Races hand out duplicate values; the core only
//! detects this after the fact (spec §5/§9), it never prevents it.

use serde_json::json;

use golembase_core::err::{DbError, Result};
use golembase_store::{BackingStore, EntityUpdate, NewEntity};

pub const COUNTER_ROW_TYPE: &str = "counter";

fn counter_relation(app_id: &str, table_name: &str, column: &str) -> String {
    format!("{app_id}.{table_name}.{column}")
}

/// Returns the next value and persists it as the new counter state. The counter
/// entity's own BTL is effectively unbounded — it must outlive every row it assigns
/// ids to, which the per-table `entity_ttl` does not guarantee.
pub async fn next_autoincrement(store: &dyn BackingStore, app_id: &str, table_name: &str, column: &str) -> Result<i64> {
    let relation = counter_relation(app_id, table_name, column);
    let predicate = format!(r#"row_type="{COUNTER_ROW_TYPE}" && relation="{relation}""#);
    let existing = store.query_entities(&predicate).await?;

    let (next, key) = match existing.into_iter().next() {
        Some(m) => (read_next(&m.storage_value)? + 1, Some(m.entity_key)),
        None => (1, None),
    };

    let entity = NewEntity {
        payload: serde_json::to_vec(&json!({ "next": next })).expect("counter payload serializes"),
        btl: u64::MAX,
        string_annotations: [
            ("row_type".to_string(), COUNTER_ROW_TYPE.to_string()),
            ("relation".to_string(), relation),
        ]
        .into_iter()
        .collect(),
        numeric_annotations: Default::default(),
    };

    match key {
        Some(key) => {
            store.update_entities(vec![EntityUpdate { key, entity }]).await?;
        }
        None => {
            store.create_entities(vec![entity]).await?;
        }
    }

    Ok(next)
}

fn read_next(payload: &[u8]) -> Result<i64> {
    let json: serde_json::Value =
        serde_json::from_slice(payload).map_err(|e| DbError::internal(format!("malformed counter payload: {e}")))?;
    json.get("next")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| DbError::internal("counter payload missing 'next'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use golembase_store::MemoryStore;

    #[tokio::test]
    async fn increments_across_calls() {
        let store = MemoryStore::default();
        assert_eq!(next_autoincrement(&store, "app", "t", "id").await.unwrap(), 1);
        assert_eq!(next_autoincrement(&store, "app", "t", "id").await.unwrap(), 2);
        assert_eq!(next_autoincrement(&store, "app", "t", "id").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn counters_are_scoped_per_table_and_column() {
        let store = MemoryStore::default();
        assert_eq!(next_autoincrement(&store, "app", "t1", "id").await.unwrap(), 1);
        assert_eq!(next_autoincrement(&store, "app", "t2", "id").await.unwrap(), 1);
    }
}
