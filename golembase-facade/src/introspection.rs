use golembase_catalog::Schema;
use golembase_core::data::DataValue;
use golembase_core::err::{DbError, Result};
use golembase_translator::Row;

/// `SHOW TABLES` (spec §4.6): one row per table, in catalog order, under a single
/// `table_name` column.
pub fn show_tables(schema: &Schema) -> Vec<Row> {
    let mut names: Vec<&String> = schema.tables.keys().collect();
    names.sort();
    names
        .into_iter()
        .map(|name| Row(vec![("table_name".to_string(), DataValue::Utf8String(name.clone()))]))
        .collect()
}

/// `DESCRIBE <table>` (spec §4.6): one row per column, naming type/nullability/
/// indexing/primary-key/default, answered from the catalog alone.
pub fn describe_table(schema: &Schema, table_name: &str) -> Result<Vec<Row>> {
    let table = schema
        .table(table_name)
        .ok_or_else(|| DbError::programming(format!("unknown table {table_name}")))?;

    Ok(table
        .columns
        .iter()
        .map(|col| {
            Row(vec![
                ("column_name".to_string(), DataValue::Utf8String(col.name.clone())),
                ("data_type".to_string(), DataValue::Utf8String(format!("{:?}", col.sql_type))),
                ("nullable".to_string(), DataValue::Boolean(col.nullable)),
                ("indexed".to_string(), DataValue::Boolean(table.is_indexed(&col.name))),
                ("primary_key".to_string(), DataValue::Boolean(col.primary_key)),
                (
                    "has_default".to_string(),
                    DataValue::Boolean(col.default.is_some()),
                ),
            ])
        })
        .collect())
}

/// `SELECT <constant>` (spec §4.6): a driver sanity-check statement, never touching
/// the catalog or the backing store.
pub fn select_constant(value: DataValue) -> Vec<Row> {
    vec![Row(vec![("?column?".to_string(), value)])]
}

#[cfg(test)]
mod tests {
    use super::*;
    use golembase_core::data::DataType;
    use golembase_plan::{ColumnDef, CreateTable, Ddl};

    fn schema_with_users() -> Schema {
        let mut schema = Schema::empty("s1");
        golembase_catalog::apply_ddl(
            &mut schema,
            Ddl::CreateTable(CreateTable {
                table: "users".into(),
                entity_ttl: 100,
                columns: vec![ColumnDef {
                    name: "id".into(),
                    sql_type: DataType::Integer,
                    nullable: false,
                    default: None,
                    indexed: true,
                    primary_key: true,
                }],
            }),
        )
        .unwrap();
        schema
    }

    #[test]
    fn show_tables_lists_catalog_tables() {
        let rows = show_tables(&schema_with_users());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("table_name"), Some(&DataValue::Utf8String("users".to_string())));
    }

    #[test]
    fn describe_table_lists_columns() {
        let rows = describe_table(&schema_with_users(), "users").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("primary_key"), Some(&DataValue::Boolean(true)));
    }

    #[test]
    fn describe_unknown_table_is_programming_error() {
        let err = describe_table(&schema_with_users(), "bogus").unwrap_err();
        assert!(matches!(DbError::downcast(&err), Some(DbError::Programming(_))));
    }

    #[test]
    fn select_constant_echoes_value() {
        let rows = select_constant(DataValue::Integer(1));
        assert_eq!(rows[0].get("?column?"), Some(&DataValue::Integer(1)));
    }
}
