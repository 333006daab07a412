use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use golembase_core::err::{DbError, Result};

use crate::client::BackingStore;
use crate::entity::{EntityKey, EntityUpdate, NewEntity, QueryMatch, Receipt};
use crate::predicate;

struct StoredEntity {
    payload: Vec<u8>,
    string_annotations: HashMap<String, String>,
    numeric_annotations: HashMap<String, u64>,
    expiration_block: u64,
}

/// In-memory reference implementation of [`BackingStore`], used by tests and by
/// `golembase-e2e` in place of the real RPC client, modeled on `ansilo-connectors-memory`.
pub struct MemoryStore {
    entities: Mutex<HashMap<EntityKey, StoredEntity>>,
    next_key: Mutex<u64>,
    current_block: Mutex<u64>,
    account_address: String,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("0x0000000000000000000000000000000000000000")
    }
}

impl MemoryStore {
    pub fn new(account_address: impl Into<String>) -> Self {
        Self {
            entities: Mutex::new(HashMap::new()),
            next_key: Mutex::new(1),
            current_block: Mutex::new(0),
            account_address: account_address.into(),
        }
    }

    fn alloc_key(&self) -> EntityKey {
        let mut next = self.next_key.lock().unwrap();
        let key = EntityKey::new(next.to_be_bytes().to_vec());
        *next += 1;
        key
    }

    fn current_block(&self) -> u64 {
        *self.current_block.lock().unwrap()
    }
}

#[async_trait]
impl BackingStore for MemoryStore {
    async fn create_entities(&self, entities: Vec<NewEntity>) -> Result<Vec<Receipt>> {
        let block = self.current_block();
        let mut store = self.entities.lock().unwrap();
        let mut receipts = Vec::with_capacity(entities.len());
        for e in entities {
            let key = self.alloc_key();
            let expiration_block = block + e.btl;
            store.insert(
                key.clone(),
                StoredEntity {
                    payload: e.payload,
                    string_annotations: e.string_annotations,
                    numeric_annotations: e.numeric_annotations,
                    expiration_block,
                },
            );
            receipts.push(Receipt {
                entity_key: key,
                expiration_block,
            });
        }
        Ok(receipts)
    }

    async fn update_entities(&self, updates: Vec<EntityUpdate>) -> Result<Vec<Receipt>> {
        let block = self.current_block();
        let mut store = self.entities.lock().unwrap();
        let mut receipts = Vec::with_capacity(updates.len());
        for u in updates {
            if !store.contains_key(&u.key) {
                return Err(DbError::operational(format!(
                    "update_entities: unknown entity key {}",
                    u.key
                )));
            }
            let expiration_block = block + u.entity.btl;
            store.insert(
                u.key.clone(),
                StoredEntity {
                    payload: u.entity.payload,
                    string_annotations: u.entity.string_annotations,
                    numeric_annotations: u.entity.numeric_annotations,
                    expiration_block,
                },
            );
            receipts.push(Receipt {
                entity_key: u.key,
                expiration_block,
            });
        }
        Ok(receipts)
    }

    async fn delete_entities(&self, keys: Vec<EntityKey>) -> Result<Vec<Receipt>> {
        let mut store = self.entities.lock().unwrap();
        let mut receipts = Vec::with_capacity(keys.len());
        for key in keys {
            let removed = store.remove(&key);
            let expiration_block = removed.map(|e| e.expiration_block).unwrap_or(0);
            receipts.push(Receipt {
                entity_key: key,
                expiration_block,
            });
        }
        Ok(receipts)
    }

    async fn query_entities(&self, predicate: &str) -> Result<Vec<QueryMatch>> {
        let pred = predicate::parse(predicate)?;
        let store = self.entities.lock().unwrap();
        let mut matches = vec![];
        for (key, entity) in store.iter() {
            if predicate::eval(&pred, &entity.string_annotations, &entity.numeric_annotations) {
                matches.push(QueryMatch {
                    entity_key: key.clone(),
                    storage_value: entity.payload.clone(),
                });
            }
        }
        Ok(matches)
    }

    async fn get_account_address(&self) -> Result<String> {
        Ok(self.account_address.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(rel: &str, age: u64) -> NewEntity {
        NewEntity {
            payload: format!("{{\"age\":{age}}}").into_bytes(),
            btl: 100,
            string_annotations: [
                ("row_type".to_string(), "json".to_string()),
                ("relation".to_string(), rel.to_string()),
            ]
            .into_iter()
            .collect(),
            numeric_annotations: [("idx_age".to_string(), age)].into_iter().collect(),
        }
    }

    #[tokio::test]
    async fn create_then_query_roundtrip() {
        let store = MemoryStore::default();
        store
            .create_entities(vec![entity("app.t", 10), entity("app.t", 40)])
            .await
            .unwrap();

        let results = store
            .query_entities(r#"row_type="json" && relation="app.t" && idx_age>20"#)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].storage_value, b"{\"age\":40}");
    }

    #[tokio::test]
    async fn update_preserves_key_delete_removes_it() {
        let store = MemoryStore::default();
        let receipts = store.create_entities(vec![entity("app.t", 10)]).await.unwrap();
        let key = receipts[0].entity_key.clone();

        store
            .update_entities(vec![EntityUpdate {
                key: key.clone(),
                entity: entity("app.t", 99),
            }])
            .await
            .unwrap();
        let results = store.query_entities(r#"idx_age=99"#).await.unwrap();
        assert_eq!(results.len(), 1);

        store.delete_entities(vec![key]).await.unwrap();
        let results = store.query_entities(r#"relation="app.t""#).await.unwrap();
        assert!(results.is_empty());
    }
}
