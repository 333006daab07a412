use golembase_catalog::CatalogStore;
use golembase_core::err::Result;
use golembase_store::BackingStore;

use crate::catalog_handle::CatalogHandle;
use crate::cursor::Cursor;
use crate::params::ConnectionParams;

/// The adapter's entry point (spec §4.6/§6.2): parses a connection string, loads the
/// tenant's schema, and hands out cursors bound to one `(store, app_id, schema)`
/// triple. Borrows its backing store and catalog store rather than owning them, so
/// callers control their lifetime (a shared RPC client, an in-memory test double).
pub struct Connection<'a> {
    store: &'a dyn BackingStore,
    catalog: CatalogHandle<'a>,
    params: ConnectionParams,
}

impl<'a> Connection<'a> {
    pub fn open(
        conn_str: &str,
        catalog_store: &'a dyn CatalogStore,
        backing_store: &'a dyn BackingStore,
    ) -> Result<Self> {
        let params = ConnectionParams::parse(conn_str)?;
        let catalog = CatalogHandle::load(catalog_store, &params.schema_id)?;
        Ok(Self {
            store: backing_store,
            catalog,
            params,
        })
    }

    pub fn app_id(&self) -> &str {
        &self.params.app_id
    }

    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(self.store, &self.catalog, self.params.app_id.clone())
    }
}
