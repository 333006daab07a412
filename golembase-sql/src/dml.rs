use sqlparser::ast::{
    Expr as AstExpr, Offset, OrderByExpr, Query as AstQuery, Select as AstSelect, SelectItem, SetExpr,
    TableFactor, TableWithJoins, Value as AstValue,
};

use golembase_catalog::Table;
use golembase_core::err::{DbError, Result};
use golembase_plan::{Delete, Insert, OrderDirection, Ordering, Select, Update};

use crate::literal::value_from_ast;
use crate::params::ParamRegistry;
use crate::predicate::analyze_predicate;

/// Rows the backing store returns per query call (spec §4.3/§7). `ORDER BY` on a
/// non-indexed column sorts in-core over the *entire* matching set before paging, so a
/// `LIMIT` larger than this would force an unbounded full scan; such a request is
/// rejected rather than silently executed.
pub const BACKING_STORE_PAGE_SIZE: u64 = 1000;

pub fn table_name_of(tables: &[TableWithJoins]) -> Result<String> {
    let first = tables
        .first()
        .ok_or_else(|| DbError::not_supported("statement must reference exactly one table"))?;
    match &first.relation {
        TableFactor::Table { name, .. } => Ok(name
            .0
            .last()
            .map(|i| i.value.clone())
            .ok_or_else(|| DbError::programming("empty table name"))?),
        _ => Err(DbError::not_supported("only plain table references are supported")),
    }
}

pub fn analyze_insert(
    table_name: String,
    table: &Table,
    columns: Vec<sqlparser::ast::Ident>,
    source: Box<AstQuery>,
    params: &mut ParamRegistry,
) -> Result<Insert> {
    let SetExpr::Values(values) = *source.body else {
        return Err(DbError::not_supported("INSERT requires a VALUES clause"));
    };
    if values.rows.len() != 1 {
        return Err(DbError::not_supported(
            "only single-row INSERT is supported at this layer",
        ));
    }
    let row = values.rows.into_iter().next().unwrap();

    let column_names: Vec<String> = if columns.is_empty() {
        table.columns.iter().map(|c| c.name.clone()).collect()
    } else {
        columns.into_iter().map(|i| i.value).collect()
    };
    if column_names.len() != row.len() {
        return Err(DbError::programming("INSERT column count does not match value count"));
    }

    let mut exprs = Vec::with_capacity(row.len());
    for (name, expr) in column_names.iter().zip(row.iter()) {
        let col = table
            .column(name)
            .ok_or_else(|| DbError::programming(format!("unknown column {name}")))?;
        exprs.push(value_expr(expr, &col.sql_type, params)?);
    }

    Ok(Insert {
        table: table_name,
        columns: column_names,
        values: exprs,
    })
}

pub fn analyze_update(
    table_name: String,
    table: &Table,
    assignments: Vec<sqlparser::ast::Assignment>,
    selection: Option<AstExpr>,
    params: &mut ParamRegistry,
) -> Result<Update> {
    let mut out = Vec::with_capacity(assignments.len());
    for a in assignments {
        let name = a
            .id
            .last()
            .map(|i| i.value.clone())
            .ok_or_else(|| DbError::programming("empty assignment target"))?;
        let col = table
            .column(&name)
            .ok_or_else(|| DbError::programming(format!("unknown column {name}")))?;
        let value = value_expr(&a.value, &col.sql_type, params)?;
        out.push((name, value));
    }
    let r#where = selection.map(|e| analyze_predicate(&e, table, params)).transpose()?;
    Ok(Update {
        table: table_name,
        assignments: out,
        r#where,
    })
}

pub fn analyze_delete(
    table_name: String,
    table: &Table,
    selection: Option<AstExpr>,
    params: &mut ParamRegistry,
) -> Result<Delete> {
    let r#where = selection.map(|e| analyze_predicate(&e, table, params)).transpose()?;
    Ok(Delete {
        table: table_name,
        r#where,
    })
}

pub fn analyze_select(
    table_name: String,
    table: &Table,
    select: Box<AstSelect>,
    order_by: Vec<OrderByExpr>,
    limit: Option<AstExpr>,
    offset: Option<Offset>,
    params: &mut ParamRegistry,
) -> Result<Select> {
    let columns = projected_columns(&select.projection)?;
    let r#where = select
        .selection
        .as_ref()
        .map(|e| analyze_predicate(e, table, params))
        .transpose()?;

    let limit = limit.map(number_literal_u64).transpose()?;
    let offset = offset.map(|o| number_literal_u64(o.value)).transpose()?.unwrap_or(0);

    let mut orderings = Vec::with_capacity(order_by.len());
    for o in order_by {
        let AstExpr::Identifier(ident) = o.expr else {
            return Err(DbError::not_supported("ORDER BY must reference a plain column"));
        };
        table
            .column(&ident.value)
            .ok_or_else(|| DbError::programming(format!("unknown column {}", ident.value)))?;
        if !table.is_indexed(&ident.value) && limit.is_none_or(|n| n > BACKING_STORE_PAGE_SIZE) {
            return Err(DbError::not_supported(format!(
                "ORDER BY on non-indexed column '{}' requires a LIMIT of at most {BACKING_STORE_PAGE_SIZE} rows",
                ident.value
            )));
        }
        orderings.push(Ordering {
            column: ident.value,
            direction: if o.asc == Some(false) {
                OrderDirection::Desc
            } else {
                OrderDirection::Asc
            },
        });
    }

    Ok(Select {
        table: table_name,
        columns,
        r#where,
        order_by: orderings,
        limit,
        offset,
    })
}

/// `SELECT <literal>` with no `FROM` — the introspection surface (spec §4.6).
pub fn select_constant(select: &AstSelect) -> Option<&AstValue> {
    if !select.from.is_empty() || select.projection.len() != 1 {
        return None;
    }
    match &select.projection[0] {
        SelectItem::UnnamedExpr(AstExpr::Value(v)) => Some(v),
        _ => None,
    }
}

fn projected_columns(projection: &[SelectItem]) -> Result<Vec<String>> {
    if projection.len() == 1 && matches!(projection[0], SelectItem::Wildcard(_)) {
        return Ok(vec![]);
    }
    projection
        .iter()
        .map(|item| match item {
            SelectItem::UnnamedExpr(AstExpr::Identifier(ident)) => Ok(ident.value.clone()),
            other => Err(DbError::not_supported(format!("unsupported SELECT item: {other}"))),
        })
        .collect()
}

fn value_expr(
    expr: &AstExpr,
    expected: &golembase_core::data::DataType,
    params: &mut ParamRegistry,
) -> Result<golembase_plan::Expr> {
    match expr {
        AstExpr::Value(AstValue::Placeholder(p)) => {
            let name = p.trim_start_matches([':', '@', '?']);
            let id = params.id_for(name, expected.clone());
            Ok(golembase_plan::Expr::Parameter(golembase_plan::Parameter {
                id,
                r#type: expected.clone(),
            }))
        }
        AstExpr::Value(v) => Ok(golembase_plan::Expr::Constant(value_from_ast(v, Some(expected))?)),
        other => Err(DbError::not_supported(format!("unsupported value expression: {other}"))),
    }
}

fn number_literal_u64(expr: AstExpr) -> Result<u64> {
    match expr {
        AstExpr::Value(AstValue::Number(s, _)) => {
            s.parse().map_err(|_| DbError::programming(format!("'{s}' is not a valid LIMIT/OFFSET")))
        }
        other => Err(DbError::not_supported(format!("unsupported LIMIT/OFFSET expression: {other}"))),
    }
}
