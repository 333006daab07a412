use std::collections::HashMap;

use golembase_core::data::{DataType, DataValue};
use golembase_core::err::{DbError, Result};
use golembase_plan::Query;
use golembase_sql::{analyze, Analyzed};
use golembase_store::BackingStore;
use golembase_translator::{Row, Translator};

use crate::catalog_handle::CatalogHandle;
use crate::introspection;
use crate::paramstyle;
use crate::retry::ReadRetry;

/// Binds caller-supplied named parameters against the placeholders an analyzed
/// statement actually references, checking each bound value's declared type
/// against the column it will flow into (spec §4.3/§7: `DataError` on mismatch).
fn bind_params(analyzed: &Analyzed, named: &HashMap<String, DataValue>) -> Result<HashMap<u32, DataValue>> {
    let mut bound = HashMap::with_capacity(analyzed.params.len());
    for p in &analyzed.params {
        let value = named
            .get(&p.name)
            .ok_or_else(|| DbError::programming(format!("missing value for parameter '{}'", p.name)))?;
        if !value.is_null() && !type_compatible(value, &p.r#type) {
            return Err(DbError::data(format!(
                "parameter '{}' expects {:?}, got {value:?}",
                p.name, p.r#type
            )));
        }
        bound.insert(p.id, value.clone());
    }
    Ok(bound)
}

/// Whether a bound value's shape matches a declared column type's family, ignoring
/// length/precision options (those are checked later by the codec, spec §4.1).
fn type_compatible(value: &DataValue, declared: &DataType) -> bool {
    matches!(
        (value, declared),
        (DataValue::TinyInt(_), DataType::TinyInt)
            | (DataValue::SmallInt(_), DataType::SmallInt)
            | (DataValue::Integer(_), DataType::Integer)
            | (DataValue::BigInt(_), DataType::BigInt)
            | (DataValue::Boolean(_), DataType::Boolean)
            | (DataValue::DateTime(_), DataType::DateTime)
            | (DataValue::Utf8String(_), DataType::Varchar(_))
            | (DataValue::Utf8String(_), DataType::Char(_))
            | (DataValue::Utf8String(_), DataType::Text)
            | (DataValue::Decimal(_), DataType::Decimal(_))
            | (DataValue::Float32(_), DataType::Float)
            | (DataValue::Float64(_), DataType::Double)
            | (DataValue::Float64(_), DataType::Real)
            | (DataValue::Binary(_), DataType::Blob)
            | (DataValue::Binary(_), DataType::VarBinary)
    )
}

/// Result of executing one statement (spec §4.6): either a row set, for `SELECT`/
/// introspection, or the count of rows an `INSERT`/`UPDATE`/`DELETE` affected.
#[derive(Debug)]
pub enum Execution {
    Rows(Vec<Row>),
    RowCount(u64),
}

/// One statement's lifecycle: parse against the catalog, route to the translator or
/// to introspection, bind parameters, execute. Mirrors a DB-API cursor: one
/// `execute` call per statement, against a schema shared across the connection.
pub struct Cursor<'a> {
    store: &'a dyn BackingStore,
    catalog: &'a CatalogHandle<'a>,
    app_id: String,
    read_retry: ReadRetry,
}

impl<'a> Cursor<'a> {
    pub fn new(store: &'a dyn BackingStore, catalog: &'a CatalogHandle<'a>, app_id: impl Into<String>) -> Self {
        Self {
            store,
            catalog,
            app_id: app_id.into(),
            read_retry: ReadRetry::default(),
        }
    }

    /// Parses and executes one SQL statement, binding `named` against any
    /// placeholders it declares (spec §4.6). Accepts `:name` or canonical
    /// `%(name)s` placeholders.
    pub async fn execute(&self, sql: &str, named: &HashMap<String, DataValue>) -> Result<Execution> {
        let normalized = paramstyle::normalize_to_pyformat(sql);
        let analyzed = self.catalog.with_schema(|schema| analyze(&normalized, schema))?;
        let params = bind_params(&analyzed, named)?;

        match analyzed.query {
            Query::Ddl(ddl) => {
                self.catalog.apply(ddl)?;
                Ok(Execution::RowCount(0))
            }
            Query::ShowTables => Ok(Execution::Rows(self.catalog.with_schema(introspection::show_tables))),
            Query::DescribeTable(name) => {
                let rows = self.catalog.with_schema(|schema| introspection::describe_table(schema, &name))?;
                Ok(Execution::Rows(rows))
            }
            Query::SelectConstant(value) => Ok(Execution::Rows(introspection::select_constant(value))),
            Query::Insert(insert) => {
                let table = self.table(&insert.table)?;
                let translator = Translator::new(self.store, &self.app_id);
                translator.insert(&table, &insert.table, &insert, &params).await?;
                Ok(Execution::RowCount(1))
            }
            Query::Update(update) => {
                let table = self.table(&update.table)?;
                let translator = Translator::new(self.store, &self.app_id);
                let n = translator.update(&table, &update.table.clone(), &update, &params).await?;
                Ok(Execution::RowCount(n))
            }
            Query::Delete(delete) => {
                let table = self.table(&delete.table)?;
                let translator = Translator::new(self.store, &self.app_id);
                let n = translator.delete(&table, &delete.table.clone(), &delete, &params).await?;
                Ok(Execution::RowCount(n))
            }
            Query::Select(select) => {
                let table = self.table(&select.table)?;
                let translator = Translator::new(self.store, &self.app_id);
                let rows = self
                    .read_retry
                    .run(|| translator.select(&table, &select.table, &select, &params))
                    .await?;
                Ok(Execution::Rows(rows))
            }
        }
    }

    fn table(&self, name: &str) -> Result<golembase_catalog::Table> {
        self.catalog
            .with_schema(|schema| schema.table(name).cloned())
            .ok_or_else(|| DbError::programming(format!("unknown table {name}")))
    }
}
