use sqlparser::ast::{BinaryOperator, Expr as AstExpr, UnaryOperator, Value as AstValue};

use golembase_catalog::Table;
use golembase_core::err::{DbError, Result};
use golembase_plan::{CompareOp, Expr};

use crate::literal::value_from_ast;
use crate::params::ParamRegistry;

/// Normalizes a `WHERE`-clause AST into the plan's predicate tree: leaves are
/// `(column, op, literal|parameter)`, internal nodes are `AND`/`OR`/`NOT` (spec §4.3).
pub fn analyze_predicate(expr: &AstExpr, table: &Table, params: &mut ParamRegistry) -> Result<Expr> {
    match expr {
        AstExpr::Nested(inner) => analyze_predicate(inner, table, params),
        AstExpr::BinaryOp { left, op, right } => analyze_binary_op(left, op.clone(), right, table, params),
        AstExpr::UnaryOp {
            op: UnaryOperator::Not,
            expr,
        } => Ok(Expr::Not(Box::new(analyze_predicate(expr, table, params)?))),
        AstExpr::IsNull(inner) => Ok(Expr::IsNull(Box::new(column_ref(inner, table)?))),
        AstExpr::IsNotNull(inner) => Ok(Expr::IsNotNull(Box::new(column_ref(inner, table)?))),
        AstExpr::Like {
            negated,
            expr,
            pattern,
            escape_char: None,
        } => {
            let column = column_ref(expr, table)?;
            let prefix = prefix_pattern(pattern)?;
            let like = Expr::LikePrefix(Box::new(column), prefix);
            Ok(if *negated { Expr::Not(Box::new(like)) } else { like })
        }
        other => Err(DbError::not_supported(format!(
            "unsupported WHERE-clause construct: {other}"
        ))),
    }
}

fn analyze_binary_op(
    left: &AstExpr,
    op: BinaryOperator,
    right: &AstExpr,
    table: &Table,
    params: &mut ParamRegistry,
) -> Result<Expr> {
    match op {
        BinaryOperator::And => Ok(Expr::And(vec![
            analyze_predicate(left, table, params)?,
            analyze_predicate(right, table, params)?,
        ])),
        BinaryOperator::Or => Ok(Expr::Or(vec![
            analyze_predicate(left, table, params)?,
            analyze_predicate(right, table, params)?,
        ])),
        BinaryOperator::Eq
        | BinaryOperator::NotEq
        | BinaryOperator::Lt
        | BinaryOperator::LtEq
        | BinaryOperator::Gt
        | BinaryOperator::GtEq => analyze_comparison(left, op, right, table, params),
        other => Err(DbError::not_supported(format!(
            "operator {other} is not supported in a WHERE clause"
        ))),
    }
}

/// A comparison must have exactly one column side; the other side is normalized to
/// `(column, op, literal)` by flipping the operator if the column appears on the right
/// (e.g. `30 < age` becomes `age > 30`). Column-to-column and arithmetic comparisons
/// are Non-goals and are rejected.
fn analyze_comparison(
    left: &AstExpr,
    op: BinaryOperator,
    right: &AstExpr,
    table: &Table,
    params: &mut ParamRegistry,
) -> Result<Expr> {
    let (column_name, op, literal_expr, literal_on_right) = match (ident_name(left), ident_name(right)) {
        (Some(name), None) => (name, op, right, true),
        (None, Some(name)) => (name, flip_operator(op), left, false),
        (Some(_), Some(_)) => {
            return Err(DbError::not_supported("column-to-column comparisons are not supported"))
        }
        (None, None) => {
            return Err(DbError::not_supported(
                "comparisons must have a column on one side",
            ))
        }
    };
    let _ = literal_on_right;

    let column = table
        .column(&column_name)
        .ok_or_else(|| DbError::programming(format!("unknown column {column_name}")))?;
    let compare_op = compare_op(op)?;

    let rhs = match literal_expr {
        AstExpr::Value(AstValue::Placeholder(p)) => {
            let name = p.trim_start_matches([':', '@', '?']);
            let id = params.id_for(name, column.sql_type.clone());
            Expr::Parameter(golembase_plan::Parameter {
                id,
                r#type: column.sql_type.clone(),
            })
        }
        AstExpr::Value(v) => Expr::Constant(value_from_ast(v, Some(&column.sql_type))?),
        other => {
            return Err(DbError::not_supported(format!(
                "unsupported expression in comparison: {other}"
            )))
        }
    };

    Ok(Expr::compare(Expr::column(column_name), compare_op, rhs))
}

fn ident_name(expr: &AstExpr) -> Option<String> {
    match expr {
        AstExpr::Identifier(ident) => Some(ident.value.clone()),
        AstExpr::CompoundIdentifier(parts) => parts.last().map(|i| i.value.clone()),
        _ => None,
    }
}

fn column_ref(expr: &AstExpr, table: &Table) -> Result<Expr> {
    let name = ident_name(expr).ok_or_else(|| {
        DbError::not_supported("IS [NOT] NULL is only supported directly on a column")
    })?;
    table
        .column(&name)
        .ok_or_else(|| DbError::programming(format!("unknown column {name}")))?;
    Ok(Expr::column(name))
}

fn flip_operator(op: BinaryOperator) -> BinaryOperator {
    match op {
        BinaryOperator::Lt => BinaryOperator::Gt,
        BinaryOperator::LtEq => BinaryOperator::GtEq,
        BinaryOperator::Gt => BinaryOperator::Lt,
        BinaryOperator::GtEq => BinaryOperator::LtEq,
        other => other,
    }
}

fn compare_op(op: BinaryOperator) -> Result<CompareOp> {
    Ok(match op {
        BinaryOperator::Eq => CompareOp::Eq,
        BinaryOperator::NotEq => CompareOp::NotEq,
        BinaryOperator::Lt => CompareOp::Lt,
        BinaryOperator::LtEq => CompareOp::Le,
        BinaryOperator::Gt => CompareOp::Gt,
        BinaryOperator::GtEq => CompareOp::Ge,
        other => return Err(DbError::not_supported(format!("unsupported comparison operator {other}"))),
    })
}

/// Only a single trailing `%` is an acceptable prefix pattern at this layer (spec §4.3/§9).
fn prefix_pattern(pattern: &AstExpr) -> Result<String> {
    let AstExpr::Value(AstValue::SingleQuotedString(s)) = pattern else {
        return Err(DbError::not_supported("LIKE pattern must be a string literal"));
    };
    let Some(prefix) = s.strip_suffix('%') else {
        return Err(DbError::not_supported(
            "only a trailing '%' wildcard is supported in LIKE",
        ));
    };
    if prefix.contains(['%', '_']) {
        return Err(DbError::not_supported(
            "only a single trailing '%' wildcard is supported in LIKE",
        ));
    }
    Ok(prefix.to_string())
}
