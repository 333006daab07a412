use sqlparser::ast::{
    AlterTableOperation, ColumnDef as AstColumnDef, ColumnOption, Expr as AstExpr, ObjectName,
    ObjectType, Statement, TableConstraint,
};

use golembase_core::err::{DbError, Result};
use golembase_plan::{ColumnDef, ColumnDefault, CreateTable, Ddl};

use crate::literal::value_from_ast;
use crate::types::sql_type_from_ast;

/// Applied when a `CREATE TABLE` omits an explicit TTL. `sqlparser`'s generic dialect
/// has no table-option syntax for it, so it is configured separately by operators who
/// need a different value; this keeps new tables usable out of the box.
pub const DEFAULT_ENTITY_TTL: u64 = 100_000;

pub fn analyze_ddl(stmt: Statement) -> Result<Ddl> {
    match stmt {
        Statement::CreateTable { name, columns, constraints, .. } => {
            create_table(object_name(&name)?, columns, constraints)
        }
        Statement::Drop {
            object_type: ObjectType::Table,
            names,
            ..
        } => Ok(Ddl::DropTable {
            table: object_name(names.first().ok_or_else(|| DbError::programming("DROP TABLE requires a table name"))?)?,
        }),
        Statement::CreateIndex {
            name, table_name, columns, ..
        } => {
            let column = columns
                .first()
                .ok_or_else(|| DbError::not_supported("CREATE INDEX requires exactly one column"))?;
            if columns.len() > 1 {
                return Err(DbError::not_supported(
                    "composite indexes are not expressible at this layer",
                ));
            }
            let AstExpr::Identifier(ident) = &column.expr else {
                return Err(DbError::not_supported("CREATE INDEX column must be a plain identifier"));
            };
            Ok(Ddl::CreateIndex {
                table: object_name(&table_name)?,
                column: ident.value.clone(),
                name: object_name(&name)?,
            })
        }
        Statement::Drop {
            object_type: ObjectType::Index,
            names,
            ..
        } => Ok(Ddl::DropIndex {
            name: object_name(names.first().ok_or_else(|| DbError::programming("DROP INDEX requires an index name"))?)?,
        }),
        Statement::AlterTable { name, operation } => alter_table(object_name(&name)?, operation),
        other => Err(DbError::not_supported(format!("unsupported DDL statement: {other}"))),
    }
}

fn create_table(
    table: String,
    columns: Vec<AstColumnDef>,
    constraints: Vec<TableConstraint>,
) -> Result<Ddl> {
    let mut primary_key_columns: Vec<String> = constraints
        .iter()
        .filter_map(|c| match c {
            TableConstraint::Unique { columns, is_primary: true, .. } => {
                Some(columns.iter().map(|i| i.value.clone()).collect::<Vec<_>>())
            }
            _ => None,
        })
        .flatten()
        .collect();

    let mut cols = Vec::with_capacity(columns.len());
    for c in columns {
        let mut col = column_def(c)?;
        if primary_key_columns.iter().any(|n| n == &col.name) {
            col.primary_key = true;
            col.nullable = false;
            col.indexed = true;
        }
        cols.push(col);
    }
    primary_key_columns.clear();

    let pk_count = cols.iter().filter(|c| c.primary_key).count();
    if pk_count > 1 {
        return Err(DbError::programming("at most one column may be PRIMARY KEY"));
    }

    Ok(Ddl::CreateTable(CreateTable {
        table,
        entity_ttl: DEFAULT_ENTITY_TTL,
        columns: cols,
    }))
}

fn column_def(c: AstColumnDef) -> Result<ColumnDef> {
    let sql_type = sql_type_from_ast(&c.data_type)?;
    let mut nullable = true;
    let mut primary_key = false;
    let mut default = None;
    let mut indexed = false;

    for opt in &c.options {
        match &opt.option {
            ColumnOption::NotNull => nullable = false,
            ColumnOption::Null => nullable = true,
            ColumnOption::Unique { is_primary: true } => {
                primary_key = true;
                nullable = false;
                indexed = true;
            }
            ColumnOption::Unique { is_primary: false } => {}
            ColumnOption::Default(expr) => default = Some(column_default(expr, &sql_type)?),
            ColumnOption::DialectSpecific(tokens) => {
                let text = tokens.iter().map(|t| t.to_string()).collect::<String>().to_uppercase();
                if text.contains("AUTO_INCREMENT") || text.contains("AUTOINCREMENT") {
                    default = Some(ColumnDefault::Autoincrement);
                }
            }
            _ => {}
        }
    }

    Ok(ColumnDef {
        name: c.name.value,
        sql_type,
        nullable,
        default,
        indexed,
        primary_key,
    })
}

fn column_default(expr: &AstExpr, sql_type: &golembase_core::data::DataType) -> Result<ColumnDefault> {
    match expr {
        AstExpr::Function(f) if f.name.to_string().eq_ignore_ascii_case("CURRENT_TIMESTAMP") => {
            Ok(ColumnDefault::CurrentTimestamp)
        }
        AstExpr::Value(v) => Ok(ColumnDefault::Literal(value_from_ast(v, Some(sql_type))?)),
        other => Err(DbError::not_supported(format!("unsupported DEFAULT expression: {other}"))),
    }
}

fn alter_table(table: String, operation: AlterTableOperation) -> Result<Ddl> {
    match operation {
        AlterTableOperation::AddColumn { column_def: def, .. } => Ok(Ddl::AddColumn {
            table,
            column: column_def(def)?,
        }),
        AlterTableOperation::AddConstraint(TableConstraint::Unique { columns, is_primary: false, .. }) => {
            let column = single_column(columns)?;
            Ok(Ddl::AddUniqueConstraint { table, column })
        }
        AlterTableOperation::AddConstraint(TableConstraint::ForeignKey {
            columns,
            foreign_table,
            referred_columns,
            ..
        }) => {
            let column = single_column(columns)?;
            let ref_column = single_column(referred_columns)?;
            Ok(Ddl::AddForeignKey {
                table,
                column,
                ref_table: object_name(&foreign_table)?,
                ref_column,
            })
        }
        other => Err(DbError::not_supported(format!("unsupported ALTER TABLE operation: {other}"))),
    }
}

fn single_column(idents: Vec<sqlparser::ast::Ident>) -> Result<String> {
    if idents.len() != 1 {
        return Err(DbError::not_supported("only single-column constraints are supported"));
    }
    Ok(idents.into_iter().next().unwrap().value)
}

fn object_name(name: &ObjectName) -> Result<String> {
    name.0
        .last()
        .map(|i| i.value.clone())
        .ok_or_else(|| DbError::programming("empty table name"))
}
