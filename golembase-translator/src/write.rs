//! Write path (spec §4.4.1): INSERT encodes and creates one entity; UPDATE/DELETE
//! locate rows via the read path then re-encode or remove them.

use std::collections::HashMap;

use golembase_catalog::Table;
use golembase_core::data::{DataType, DataValue};
use golembase_core::err::{DbError, Result};
use golembase_plan::{ColumnDefault, Delete, Expr, Insert, Update};
use golembase_store::{BackingStore, EntityUpdate};

use crate::counter::next_autoincrement;
use crate::predicate_compile::{compile_query, eval_expr, reject_non_indexable};
use crate::serializer::{decode_row, encode_entity};

pub async fn execute_insert(
    store: &dyn BackingStore,
    table: &Table,
    app_id: &str,
    table_name: &str,
    insert: &Insert,
    params: &HashMap<u32, DataValue>,
) -> Result<()> {
    let mut values = Vec::with_capacity(table.columns.len());
    for col in &table.columns {
        let value = match insert.columns.iter().position(|c| c == &col.name) {
            Some(pos) => resolve_value(&insert.values[pos], params)?,
            None => default_value(store, app_id, table_name, col).await?,
        };
        values.push((col.name.clone(), value));
    }

    let entity = encode_entity(table, app_id, table_name, &values)?;
    store.create_entities(vec![entity]).await?;
    Ok(())
}

async fn default_value(
    store: &dyn BackingStore,
    app_id: &str,
    table_name: &str,
    col: &golembase_plan::ColumnDef,
) -> Result<DataValue> {
    match &col.default {
        Some(ColumnDefault::Literal(v)) => Ok(v.clone()),
        Some(ColumnDefault::CurrentTimestamp) => Ok(DataValue::DateTime(chrono::Utc::now().naive_utc())),
        Some(ColumnDefault::Autoincrement) => {
            let next = next_autoincrement(store, app_id, table_name, &col.name).await?;
            coerce_autoincrement(next, &col.sql_type)
        }
        None if col.nullable => Ok(DataValue::Null),
        None => Err(DbError::programming(format!(
            "column {} has no value and no default",
            col.name
        ))),
    }
}

fn coerce_autoincrement(next: i64, sql_type: &DataType) -> Result<DataValue> {
    Ok(match sql_type {
        DataType::TinyInt => {
            DataValue::TinyInt(i8::try_from(next).map_err(|_| DbError::data("autoincrement overflowed TINYINT"))?)
        }
        DataType::SmallInt => {
            DataValue::SmallInt(i16::try_from(next).map_err(|_| DbError::data("autoincrement overflowed SMALLINT"))?)
        }
        DataType::Integer => {
            DataValue::Integer(i32::try_from(next).map_err(|_| DbError::data("autoincrement overflowed INTEGER"))?)
        }
        DataType::BigInt => DataValue::BigInt(next),
        other => return Err(DbError::programming(format!("AUTOINCREMENT is not supported for {other:?}"))),
    })
}

fn resolve_value(expr: &Expr, params: &HashMap<u32, DataValue>) -> Result<DataValue> {
    match expr {
        Expr::Constant(v) => Ok(v.clone()),
        Expr::Parameter(p) => params
            .get(&p.id)
            .cloned()
            .ok_or_else(|| DbError::programming(format!("unbound parameter #{}", p.id))),
        other => Err(DbError::internal(format!("{other:?} is not a value expression"))),
    }
}

pub async fn execute_update(
    store: &dyn BackingStore,
    table: &Table,
    app_id: &str,
    table_name: &str,
    update: &Update,
    params: &HashMap<u32, DataValue>,
) -> Result<u64> {
    if let Some(expr) = &update.r#where {
        reject_non_indexable(expr, table)?;
    }
    let query = compile_query(table, app_id, table_name, update.r#where.as_ref(), params);
    let matches = store.query_entities(&query).await?;

    let mut updates = Vec::new();
    for m in &matches {
        let row = decode_row(table, &m.storage_value)?;
        if let Some(expr) = &update.r#where {
            if !eval_expr(expr, &row, params)? {
                continue;
            }
        }
        let mut values = row.0.clone();
        for (column, expr) in &update.assignments {
            let value = resolve_value(expr, params)?;
            if let Some(slot) = values.iter_mut().find(|(c, _)| c == column) {
                slot.1 = value;
            }
        }
        let entity = encode_entity(table, app_id, table_name, &values)?;
        updates.push(EntityUpdate {
            key: m.entity_key.clone(),
            entity,
        });
    }

    let count = updates.len() as u64;
    if !updates.is_empty() {
        store.update_entities(updates).await?;
    }
    Ok(count)
}

pub async fn execute_delete(
    store: &dyn BackingStore,
    table: &Table,
    app_id: &str,
    table_name: &str,
    delete: &Delete,
    params: &HashMap<u32, DataValue>,
) -> Result<u64> {
    if let Some(expr) = &delete.r#where {
        reject_non_indexable(expr, table)?;
    }
    let query = compile_query(table, app_id, table_name, delete.r#where.as_ref(), params);
    let matches = store.query_entities(&query).await?;

    let mut keys = Vec::new();
    for m in &matches {
        if let Some(expr) = &delete.r#where {
            let row = decode_row(table, &m.storage_value)?;
            if !eval_expr(expr, &row, params)? {
                continue;
            }
        }
        keys.push(m.entity_key.clone());
    }

    let count = keys.len() as u64;
    if !keys.is_empty() {
        store.delete_entities(keys).await?;
    }
    Ok(count)
}
