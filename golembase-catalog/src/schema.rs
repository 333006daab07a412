use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use golembase_plan::ColumnDef;

/// A single-column index record (spec §3.1 — composite indexes are not expressible).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub column_name: String,
}

/// A `UNIQUE` constraint recorded as metadata only (spec §7 — never enforced).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueConstraint {
    pub column_name: String,
}

/// A `FOREIGN KEY` constraint recorded as metadata only (spec §7 — never enforced).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub column_name: String,
    pub ref_table: String,
    pub ref_column: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Table {
    pub entity_ttl: u64,
    pub columns: Vec<ColumnDef>,
    #[serde(default)]
    pub indexes: Vec<Index>,
    #[serde(default)]
    pub unique_constraints: Vec<UniqueConstraint>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.primary_key)
    }

    pub fn is_indexed(&self, column: &str) -> bool {
        self.indexes.iter().any(|i| i.column_name == column)
    }
}

/// A tenant's table registry, persisted as one TOML file keyed by `schema_id`
/// (spec §3.1/§4.2). Unknown keys in the file are tolerated so older readers survive
/// additions (spec §6.3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Schema {
    pub schema_id: String,
    #[serde(default)]
    pub tables: HashMap<String, Table>,
}

impl Schema {
    pub fn empty(schema_id: impl Into<String>) -> Self {
        Self {
            schema_id: schema_id.into(),
            tables: HashMap::new(),
        }
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Finds the `(table, column)` a named index belongs to, searching every table's
    /// index list — a standalone `DROP INDEX <name>` carries no table reference.
    pub fn find_index(&self, index_name: &str) -> Option<(String, String)> {
        self.tables.iter().find_map(|(table_name, table)| {
            table
                .indexes
                .iter()
                .find(|i| i.name == index_name)
                .map(|i| (table_name.clone(), i.column_name.clone()))
        })
    }
}
