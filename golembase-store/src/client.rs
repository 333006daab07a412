use async_trait::async_trait;
use golembase_core::err::Result;

use crate::entity::{EntityKey, EntityUpdate, NewEntity, QueryMatch, Receipt};

/// The backing store, consumed as an opaque asynchronous RPC (spec §6.1). These five
/// operations are the only suspension points in the whole adapter (spec §5);
/// `watch_logs` exists on the real store but is out of core and not modeled here.
#[async_trait]
pub trait BackingStore: Send + Sync {
    async fn create_entities(&self, entities: Vec<NewEntity>) -> Result<Vec<Receipt>>;

    async fn update_entities(&self, updates: Vec<EntityUpdate>) -> Result<Vec<Receipt>>;

    async fn delete_entities(&self, keys: Vec<EntityKey>) -> Result<Vec<Receipt>>;

    async fn query_entities(&self, predicate: &str) -> Result<Vec<QueryMatch>>;

    async fn get_account_address(&self) -> Result<String>;
}
