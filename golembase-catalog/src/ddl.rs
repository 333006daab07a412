use golembase_core::err::{DbError, Result};
use golembase_plan::Ddl;

use crate::schema::{ForeignKey, Index, Schema, Table, UniqueConstraint};

/// The only mutator of a [`Schema`] (spec §4.2). Mutates in place; callers are
/// responsible for persisting the result via a [`crate::CatalogStore`].
pub fn apply_ddl(schema: &mut Schema, stmt: Ddl) -> Result<()> {
    match stmt {
        Ddl::CreateTable(ct) => {
            if schema.tables.contains_key(&ct.table) {
                return Err(DbError::programming(format!("table {} already exists", ct.table)));
            }
            let pk_count = ct.columns.iter().filter(|c| c.primary_key).count();
            if pk_count > 1 {
                return Err(DbError::programming("at most one column may be PRIMARY KEY"));
            }
            let indexes = ct
                .columns
                .iter()
                .filter(|c| c.indexed || c.primary_key)
                .map(|c| Index {
                    name: format!("idx_{}", c.name),
                    column_name: c.name.clone(),
                })
                .collect();
            schema.tables.insert(
                ct.table,
                Table {
                    entity_ttl: ct.entity_ttl,
                    columns: ct.columns,
                    indexes,
                    unique_constraints: vec![],
                    foreign_keys: vec![],
                },
            );
        }
        Ddl::DropTable { table } => {
            if schema.tables.remove(&table).is_none() {
                return Err(DbError::programming(format!("unknown table {table}")));
            }
        }
        Ddl::CreateIndex { table, column, name } => {
            let t = table_mut(schema, &table)?;
            require_column(t, &column)?;
            if t.indexes.iter().any(|i| i.name == name) {
                return Err(DbError::programming(format!("index {name} already exists")));
            }
            if !t.is_indexed(&column) {
                t.indexes.push(Index { name, column_name: column.clone() });
            }
            if let Some(c) = t.columns.iter_mut().find(|c| c.name == column) {
                c.indexed = true;
            }
        }
        Ddl::DropIndex { name } => {
            let (table, column) = schema
                .find_index(&name)
                .ok_or_else(|| DbError::programming(format!("unknown index {name}")))?;
            let t = table_mut(schema, &table)?;
            t.indexes.retain(|i| i.name != name);
            if !t.is_indexed(&column) {
                if let Some(c) = t.columns.iter_mut().find(|c| c.name == column) {
                    c.indexed = false;
                }
            }
        }
        Ddl::AddColumn { table, column } => {
            let t = table_mut(schema, &table)?;
            if t.column(&column.name).is_some() {
                return Err(DbError::programming(format!("column {} already exists", column.name)));
            }
            if column.indexed {
                t.indexes.push(Index {
                    name: format!("idx_{}", column.name),
                    column_name: column.name.clone(),
                });
            }
            t.columns.push(column);
        }
        Ddl::AddUniqueConstraint { table, column } => {
            let t = table_mut(schema, &table)?;
            require_column(t, &column)?;
            t.unique_constraints.push(UniqueConstraint { column_name: column });
        }
        Ddl::AddForeignKey {
            table,
            column,
            ref_table,
            ref_column,
        } => {
            let t = table_mut(schema, &table)?;
            require_column(t, &column)?;
            t.foreign_keys.push(ForeignKey {
                column_name: column,
                ref_table,
                ref_column,
            });
        }
    }
    Ok(())
}

fn table_mut<'a>(schema: &'a mut Schema, name: &str) -> Result<&'a mut Table> {
    schema
        .tables
        .get_mut(name)
        .ok_or_else(|| DbError::programming(format!("unknown table {name}")))
}

fn require_column(table: &Table, column: &str) -> Result<()> {
    if table.column(column).is_none() {
        return Err(DbError::programming(format!("unknown column {column}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use golembase_core::data::DataType;
    use golembase_plan::{ColumnDef, CreateTable};

    fn col(name: &str, ty: DataType, indexed: bool, pk: bool) -> ColumnDef {
        ColumnDef {
            name: name.to_string(),
            sql_type: ty,
            nullable: !pk,
            default: None,
            indexed,
            primary_key: pk,
        }
    }

    #[test]
    fn create_table_indexes_primary_key_implicitly() {
        let mut schema = Schema::empty("s1");
        apply_ddl(
            &mut schema,
            Ddl::CreateTable(CreateTable {
                table: "users".into(),
                entity_ttl: 100,
                columns: vec![
                    col("id", DataType::Integer, false, true),
                    col("name", DataType::Text, false, false),
                ],
            }),
        )
        .unwrap();
        let t = schema.table("users").unwrap();
        assert!(t.is_indexed("id"));
        assert!(!t.is_indexed("name"));
    }

    #[test]
    fn create_table_rejects_duplicate() {
        let mut schema = Schema::empty("s1");
        let ct = || {
            Ddl::CreateTable(CreateTable {
                table: "users".into(),
                entity_ttl: 1,
                columns: vec![],
            })
        };
        apply_ddl(&mut schema, ct()).unwrap();
        assert!(apply_ddl(&mut schema, ct()).is_err());
    }

    #[test]
    fn create_index_then_drop_index() {
        let mut schema = Schema::empty("s1");
        apply_ddl(
            &mut schema,
            Ddl::CreateTable(CreateTable {
                table: "t".into(),
                entity_ttl: 1,
                columns: vec![col("x", DataType::Integer, false, false)],
            }),
        )
        .unwrap();
        apply_ddl(
            &mut schema,
            Ddl::CreateIndex {
                table: "t".into(),
                column: "x".into(),
                name: "idx_x".into(),
            },
        )
        .unwrap();
        assert!(schema.table("t").unwrap().is_indexed("x"));
        apply_ddl(&mut schema, Ddl::DropIndex { name: "idx_x".into() }).unwrap();
        assert!(!schema.table("t").unwrap().is_indexed("x"));
    }

    #[test]
    fn unique_and_foreign_key_are_recorded_not_enforced() {
        let mut schema = Schema::empty("s1");
        apply_ddl(
            &mut schema,
            Ddl::CreateTable(CreateTable {
                table: "t".into(),
                entity_ttl: 1,
                columns: vec![col("x", DataType::Integer, false, false)],
            }),
        )
        .unwrap();
        apply_ddl(
            &mut schema,
            Ddl::AddUniqueConstraint {
                table: "t".into(),
                column: "x".into(),
            },
        )
        .unwrap();
        assert_eq!(schema.table("t").unwrap().unique_constraints.len(), 1);
    }
}
