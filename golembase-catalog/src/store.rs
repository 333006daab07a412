use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use golembase_core::err::{Context, DbError, Result};

use crate::schema::Schema;

/// Separates "where the catalog's bytes live" from "what the bytes mean" (the `Schema`
/// type), so tests can swap the filesystem for memory without touching `apply_ddl`.
pub trait CatalogStore: Send + Sync {
    fn load(&self, schema_id: &str) -> Result<Schema>;
    fn save(&self, schema: &Schema) -> Result<()>;
}

/// Persists one TOML file per schema under a platform user-data directory
/// (spec §6.2: `golembase/schemas/<schema_id>.toml`). Saves are atomic: written to a
/// temp file in the same directory, then renamed into place.
pub struct FileCatalogStore {
    root: PathBuf,
}

impl FileCatalogStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Uses the platform user-data directory (`~/.local/share` on Linux, etc.).
    pub fn platform_default() -> Result<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| DbError::internal("could not resolve platform user-data directory"))?;
        Ok(Self::new(base.join("golembase").join("schemas")))
    }

    fn path_for(&self, schema_id: &str) -> PathBuf {
        self.root.join(format!("{schema_id}.toml"))
    }
}

impl CatalogStore for FileCatalogStore {
    fn load(&self, schema_id: &str) -> Result<Schema> {
        let path = self.path_for(schema_id);
        if !path.exists() {
            return Ok(Schema::empty(schema_id));
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading catalog file {}", path.display()))?;
        toml::from_str(&text)
            .map_err(|e| DbError::internal(format!("corrupt catalog file {}: {e}", path.display())))
    }

    fn save(&self, schema: &Schema) -> Result<()> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("creating catalog directory {}", self.root.display()))?;
        let text = toml::to_string_pretty(schema)
            .map_err(|e| DbError::internal(format!("serializing catalog: {e}")))?;

        let tmp = tempfile::NamedTempFile::new_in(&self.root)
            .with_context(|| format!("creating temp file in {}", self.root.display()))?;
        std::fs::write(tmp.path(), text.as_bytes())
            .with_context(|| "writing catalog temp file".to_string())?;
        tmp.persist(self.path_for(&schema.schema_id))
            .map_err(|e| DbError::operational(format!("renaming catalog file into place: {e}")))?;
        Ok(())
    }
}

/// Reference store for tests: no filesystem, no atomicity concerns.
#[derive(Default)]
pub struct InMemoryCatalogStore {
    schemas: Mutex<HashMap<String, Schema>>,
}

impl CatalogStore for InMemoryCatalogStore {
    fn load(&self, schema_id: &str) -> Result<Schema> {
        let schemas = self.schemas.lock().unwrap();
        Ok(schemas
            .get(schema_id)
            .cloned()
            .unwrap_or_else(|| Schema::empty(schema_id)))
    }

    fn save(&self, schema: &Schema) -> Result<()> {
        let mut schemas = self.schemas.lock().unwrap();
        schemas.insert(schema.schema_id.clone(), schema.clone());
        Ok(())
    }
}
