pub mod counter;
pub mod predicate_compile;
pub mod read;
pub mod row;
pub mod serializer;
pub mod write;

pub use row::Row;

use std::collections::HashMap;

use golembase_catalog::Table;
use golembase_core::data::DataValue;
use golembase_core::err::Result;
use golembase_plan::{Delete, Insert, Select, Update};
use golembase_store::BackingStore;

/// Lowers one analyzed statement into backing-store calls for a single tenant
/// (spec §4.4). One instance is built per statement execution, given the table
/// from the catalog and the bound parameter values.
pub struct Translator<'a> {
    store: &'a dyn BackingStore,
    app_id: &'a str,
}

impl<'a> Translator<'a> {
    pub fn new(store: &'a dyn BackingStore, app_id: &'a str) -> Self {
        Self { store, app_id }
    }

    pub async fn insert(
        &self,
        table: &Table,
        table_name: &str,
        insert: &Insert,
        params: &HashMap<u32, DataValue>,
    ) -> Result<()> {
        write::execute_insert(self.store, table, self.app_id, table_name, insert, params).await
    }

    pub async fn update(
        &self,
        table: &Table,
        table_name: &str,
        update: &Update,
        params: &HashMap<u32, DataValue>,
    ) -> Result<u64> {
        write::execute_update(self.store, table, self.app_id, table_name, update, params).await
    }

    pub async fn delete(
        &self,
        table: &Table,
        table_name: &str,
        delete: &Delete,
        params: &HashMap<u32, DataValue>,
    ) -> Result<u64> {
        write::execute_delete(self.store, table, self.app_id, table_name, delete, params).await
    }

    pub async fn select(
        &self,
        table: &Table,
        table_name: &str,
        select: &Select,
        params: &HashMap<u32, DataValue>,
    ) -> Result<Vec<Row>> {
        read::execute_select(self.store, table, self.app_id, table_name, select, params).await
    }
}
