//! Read path (spec §4.4.2/§4.4.3): compile, query, decode, post-filter, then apply
//! ORDER BY / LIMIT / OFFSET in-core over the decoded sequence.

use std::collections::HashMap;

use golembase_catalog::Table;
use golembase_core::data::DataValue;
use golembase_core::err::{DbError, Result};
use golembase_plan::{OrderDirection, Select};
use golembase_store::BackingStore;

use crate::predicate_compile::{compile_query, eval_expr, order_values, reject_non_indexable};
use crate::row::Row;
use crate::serializer::decode_row;

pub async fn execute_select(
    store: &dyn BackingStore,
    table: &Table,
    app_id: &str,
    table_name: &str,
    select: &Select,
    params: &HashMap<u32, DataValue>,
) -> Result<Vec<Row>> {
    if let Some(expr) = &select.r#where {
        reject_non_indexable(expr, table)?;
    }
    let query = compile_query(table, app_id, table_name, select.r#where.as_ref(), params);
    let matches = store.query_entities(&query).await?;

    let pk_column = table.primary_key().map(|c| c.name.clone());
    let mut seen_pks: Vec<DataValue> = Vec::with_capacity(matches.len());

    let mut rows = Vec::with_capacity(matches.len());
    for m in &matches {
        let row = decode_row(table, &m.storage_value)?;
        if let Some(expr) = &select.r#where {
            if !eval_expr(expr, &row, params)? {
                continue;
            }
        }
        if let Some(pk) = &pk_column {
            if let Some(value) = row.get(pk) {
                if seen_pks.iter().any(|seen| seen == value) {
                    return Err(DbError::integrity(format!(
                        "duplicate primary key {value:?} found for '{table_name}.{pk}'"
                    )));
                }
                seen_pks.push(value.clone());
            }
        }
        rows.push(row);
    }

    // Apply orderings in reverse so the first in `order_by` wins ties — a stable
    // multi-key sort built from successive single-key stable sorts.
    for ordering in select.order_by.iter().rev() {
        rows.sort_by(|a, b| {
            let ord = order_values(a.get(&ordering.column), b.get(&ordering.column));
            match ordering.direction {
                OrderDirection::Asc => ord,
                OrderDirection::Desc => ord.reverse(),
            }
        });
    }

    let rows: Vec<Row> = rows.into_iter().skip(select.offset as usize).collect();
    let rows: Vec<Row> = match select.limit {
        Some(limit) => rows.into_iter().take(limit as usize).collect(),
        None => rows,
    };

    Ok(project(rows, &select.columns))
}

fn project(rows: Vec<Row>, columns: &[String]) -> Vec<Row> {
    if columns.is_empty() {
        return rows;
    }
    rows.into_iter()
        .map(|row| {
            let projected = columns
                .iter()
                .map(|name| (name.clone(), row.get(name).cloned().unwrap_or(DataValue::Null)))
                .collect();
            Row(projected)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use golembase_core::data::DataType;
    use golembase_plan::{ColumnDef, CompareOp, CreateTable, Ddl, Expr, Ordering};
    use golembase_store::MemoryStore;

    async fn users_table_with_rows(store: &MemoryStore) -> Table {
        let mut schema = golembase_catalog::Schema::empty("s1");
        golembase_catalog::apply_ddl(
            &mut schema,
            Ddl::CreateTable(CreateTable {
                table: "users".into(),
                entity_ttl: 1000,
                columns: vec![
                    ColumnDef {
                        name: "id".into(),
                        sql_type: DataType::Integer,
                        nullable: false,
                        default: None,
                        indexed: true,
                        primary_key: true,
                    },
                    ColumnDef {
                        name: "name".into(),
                        sql_type: DataType::Text,
                        nullable: true,
                        default: None,
                        indexed: true,
                        primary_key: false,
                    },
                ],
            }),
        )
        .unwrap();
        let table = schema.table("users").unwrap().clone();

        for (id, name) in [(1i32, "a"), (2, "b")] {
            let values = vec![
                ("id".to_string(), DataValue::Integer(id)),
                ("name".to_string(), DataValue::Utf8String(name.to_string())),
            ];
            let entity = crate::serializer::encode_entity(&table, "app", "users", &values).unwrap();
            store.create_entities(vec![entity]).await.unwrap();
        }
        table
    }

    #[tokio::test]
    async fn select_with_where_returns_matching_row() {
        let store = MemoryStore::default();
        let table = users_table_with_rows(&store).await;
        let select = Select {
            table: "users".into(),
            columns: vec![],
            r#where: Some(Expr::compare(Expr::column("id"), CompareOp::Gt, Expr::constant(DataValue::Integer(1)))),
            order_by: vec![],
            limit: None,
            offset: 0,
        };
        let rows = execute_select(&store, &table, "app", "users", &select, &HashMap::new())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name").unwrap(), &DataValue::Utf8String("b".into()));
    }

    #[tokio::test]
    async fn duplicate_primary_key_is_integrity_error() {
        let store = MemoryStore::default();
        let table = users_table_with_rows(&store).await;
        // Force a second row with the same primary-key value onto the backing store,
        // bypassing the write path (which would itself reject this).
        let values = vec![
            ("id".to_string(), DataValue::Integer(1)),
            ("name".to_string(), DataValue::Utf8String("dup".to_string())),
        ];
        let entity = crate::serializer::encode_entity(&table, "app", "users", &values).unwrap();
        store.create_entities(vec![entity]).await.unwrap();

        let select = Select {
            table: "users".into(),
            columns: vec![],
            r#where: None,
            order_by: vec![],
            limit: None,
            offset: 0,
        };
        let err = execute_select(&store, &table, "app", "users", &select, &HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(DbError::downcast(&err), Some(DbError::Integrity(_))));
    }

    #[tokio::test]
    async fn order_by_and_limit_apply_in_core() {
        let store = MemoryStore::default();
        let table = users_table_with_rows(&store).await;
        let select = Select {
            table: "users".into(),
            columns: vec!["id".to_string()],
            r#where: None,
            order_by: vec![Ordering {
                column: "id".into(),
                direction: OrderDirection::Desc,
            }],
            limit: Some(1),
            offset: 0,
        };
        let rows = execute_select(&store, &table, "app", "users", &select, &HashMap::new())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("id").unwrap(), &DataValue::Integer(2));
    }
}
