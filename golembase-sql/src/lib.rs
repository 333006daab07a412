pub mod ddl;
pub mod dml;
pub mod literal;
pub mod params;
pub mod predicate;
pub mod preprocess;
pub mod types;

use sqlparser::ast::Statement;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

use golembase_catalog::Schema;
use golembase_core::err::{DbError, Result};
use golembase_plan::Query;

pub use params::ParamInfo;

/// The output of analyzing one SQL statement: a resolved plan plus the named
/// parameters it references, in the order the façade should bind them (spec §4.3).
#[derive(Debug, Clone, PartialEq)]
pub struct Analyzed {
    pub query: Query,
    pub params: Vec<ParamInfo>,
}

/// Parses `sql` (with parameters in the canonical `%(name)s` form, spec §6.2),
/// resolves every identifier against `schema`, and produces a typed plan.
pub fn analyze(sql: &str, schema: &Schema) -> Result<Analyzed> {
    let rewritten = preprocess::rewrite_pyformat_params(sql);
    let statements = Parser::parse_sql(&GenericDialect {}, &rewritten)
        .map_err(|e| DbError::programming(format!("SQL parse error: {e}")))?;
    if statements.len() != 1 {
        return Err(DbError::programming("exactly one SQL statement is required per execute"));
    }
    let stmt = statements.into_iter().next().unwrap();
    let mut params = params::ParamRegistry::default();

    let query = analyze_statement(stmt, schema, &mut params)?;
    Ok(Analyzed {
        query,
        params: params.finish(),
    })
}

fn analyze_statement(
    stmt: Statement,
    schema: &Schema,
    params: &mut params::ParamRegistry,
) -> Result<Query> {
    match stmt {
        Statement::CreateTable { .. }
        | Statement::Drop { .. }
        | Statement::CreateIndex { .. }
        | Statement::AlterTable { .. } => Ok(Query::Ddl(ddl::analyze_ddl(stmt)?)),

        Statement::Insert {
            table_name,
            columns,
            source,
            ..
        } => {
            let name = table_name
                .0
                .last()
                .map(|i| i.value.clone())
                .ok_or_else(|| DbError::programming("empty table name"))?;
            let table = resolve_table(schema, &name)?;
            Ok(Query::Insert(dml::analyze_insert(name, table, columns, source, params)?))
        }

        Statement::Update {
            table,
            assignments,
            selection,
            ..
        } => {
            let name = dml::table_name_of(std::slice::from_ref(&table))?;
            let t = resolve_table(schema, &name)?;
            Ok(Query::Update(dml::analyze_update(name, t, assignments, selection, params)?))
        }

        Statement::Delete { from, selection, .. } => {
            let name = dml::table_name_of(&from)?;
            let t = resolve_table(schema, &name)?;
            Ok(Query::Delete(dml::analyze_delete(name, t, selection, params)?))
        }

        Statement::Query(q) => {
            let sqlparser::ast::SetExpr::Select(select) = *q.body else {
                return Err(DbError::not_supported("only simple SELECT statements are supported"));
            };
            if let Some(v) = dml::select_constant(&select) {
                return Ok(Query::SelectConstant(literal::value_from_ast(v, None)?));
            }
            let name = dml::table_name_of(&select.from)?;
            let t = resolve_table(schema, &name)?;
            Ok(Query::Select(dml::analyze_select(
                name, t, select, q.order_by, q.limit, q.offset, params,
            )?))
        }

        Statement::ShowTables { .. } => Ok(Query::ShowTables),

        Statement::ExplainTable {
            describe_alias: true,
            table_name,
        } => Ok(Query::DescribeTable(
            table_name
                .0
                .last()
                .map(|i| i.value.clone())
                .ok_or_else(|| DbError::programming("empty table name"))?,
        )),

        other => Err(DbError::not_supported(format!("unsupported statement: {other}"))),
    }
}

fn resolve_table<'a>(schema: &'a Schema, name: &str) -> Result<&'a golembase_catalog::Table> {
    schema
        .table(name)
        .ok_or_else(|| DbError::programming(format!("unknown table {name}")))
}
