use std::sync::Mutex;

use golembase_catalog::{CatalogStore, Schema};
use golembase_core::err::Result;
use golembase_plan::Ddl;

/// Holds one tenant's loaded schema in memory and persists it back through a
/// [`CatalogStore`] after every successful DDL statement (spec §4.2/§6.2).
pub struct CatalogHandle<'a> {
    store: &'a dyn CatalogStore,
    schema: Mutex<Schema>,
}

impl<'a> CatalogHandle<'a> {
    pub fn load(store: &'a dyn CatalogStore, schema_id: &str) -> Result<Self> {
        let schema = store.load(schema_id)?;
        Ok(Self {
            store,
            schema: Mutex::new(schema),
        })
    }

    pub fn with_schema<T>(&self, f: impl FnOnce(&Schema) -> T) -> T {
        f(&self.schema.lock().unwrap())
    }

    pub fn apply(&self, stmt: Ddl) -> Result<()> {
        let mut schema = self.schema.lock().unwrap();
        golembase_catalog::apply_ddl(&mut schema, stmt)?;
        self.store.save(&schema)
    }
}
