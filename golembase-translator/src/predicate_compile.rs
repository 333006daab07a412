//! Read-path predicate compilation (spec §4.4.2): normalizes a resolved `Expr` tree
//! into the backing store's query language, tenant-scoped, falling back to an
//! always-applied in-core post-filter for anything the store grammar cannot express.

use std::cmp::Ordering;
use std::collections::HashMap;

use golembase_catalog::Table;
use golembase_core::data::codec;
use golembase_core::data::DataValue;
use golembase_core::err::{DbError, Result};
use golembase_plan::{CompareOp, Expr};

use crate::row::Row;
use crate::serializer::{relation, ROW_TYPE};

/// Rejects any predicate referencing a non-indexable column (spec §4.1.6) — a hard
/// error regardless of where in the tree it appears, unlike the soft store-fragment
/// fallback below.
pub fn reject_non_indexable(expr: &Expr, table: &Table) -> Result<()> {
    let mut error = None;
    expr.walk(&mut |node| {
        if error.is_some() {
            return;
        }
        let column = match node {
            Expr::Compare(l, _, r) => l.as_column().or_else(|| r.as_column()),
            Expr::LikePrefix(c, _) => c.as_column(),
            Expr::IsNull(c) | Expr::IsNotNull(c) => c.as_column(),
            _ => None,
        };
        if let Some(name) = column {
            if let Some(col) = table.column(name) {
                if !col.sql_type.is_indexable_type() {
                    error = Some(DbError::not_supported(format!("column {name} is not indexable")));
                }
            }
        }
    });
    match error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Builds the full predicate string sent to `query_entities`: tenant scope always,
/// plus a best-effort store-expressible fragment of `expr`. Anything the fragment
/// drops (IS NULL/IS NOT NULL, NOT LIKE, `!=`, deeper NOT pushes) is still applied
/// by [`eval_expr`] against the decoded row — the fragment only narrows the scan.
pub fn compile_query(table: &Table, app_id: &str, table_name: &str, expr: Option<&Expr>, params: &HashMap<u32, DataValue>) -> String {
    let mut parts = vec![
        format!("row_type=\"{ROW_TYPE}\""),
        format!("relation=\"{}\"", relation(app_id, table_name)),
    ];
    if let Some(expr) = expr {
        if let Some(fragment) = compile(expr, table, params) {
            parts.push(fragment);
        }
    }
    parts.join(" && ")
}

fn compile(expr: &Expr, table: &Table, params: &HashMap<u32, DataValue>) -> Option<String> {
    match expr {
        Expr::Compare(l, op, r) => compile_compare(l, *op, r, table, params),
        Expr::LikePrefix(c, prefix) => compile_like(c, prefix, table),
        Expr::IsNull(_) | Expr::IsNotNull(_) => None,
        Expr::Not(inner) => compile_not(inner, table, params),
        Expr::And(items) => {
            let parts: Vec<String> = items.iter().filter_map(|i| compile(i, table, params)).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(" && "))
            }
        }
        Expr::Or(items) => {
            let parts: Option<Vec<String>> = items.iter().map(|i| compile(i, table, params)).collect();
            parts.map(|v| format!("({})", v.join(" || ")))
        }
        _ => None,
    }
}

fn compile_compare(l: &Expr, op: CompareOp, r: &Expr, table: &Table, params: &HashMap<u32, DataValue>) -> Option<String> {
    let Expr::Column(name) = l else { return None };
    let col = table.column(name)?;
    let symbol = op.store_symbol()?;
    let value = resolve_literal(r, params)?;
    let formatted = format_store_value(&value, col)?;
    Some(format!("idx_{name}{symbol}{formatted}"))
}

fn compile_like(c: &Expr, prefix: &str, table: &Table) -> Option<String> {
    let Expr::Column(name) = c else { return None };
    table.column(name)?;
    Some(format!("idx_{name} ~ \"{}*\"", escape_store_string(prefix)))
}

fn compile_not(inner: &Expr, table: &Table, params: &HashMap<u32, DataValue>) -> Option<String> {
    match inner {
        Expr::Compare(l, op, r) => compile_compare(l, op.negate()?, r, table, params),
        _ => None,
    }
}

fn resolve_literal(expr: &Expr, params: &HashMap<u32, DataValue>) -> Option<DataValue> {
    match expr {
        Expr::Constant(v) => Some(v.clone()),
        Expr::Parameter(p) => params.get(&p.id).cloned(),
        _ => None,
    }
}

fn format_store_value(value: &DataValue, col: &golembase_plan::ColumnDef) -> Option<String> {
    if col.sql_type.is_numeric_annotation() {
        let encoded = codec::encode_annotation_u64(value, &col.sql_type).ok()?;
        Some(encoded.to_string())
    } else {
        let encoded = codec::encode_annotation_string(value, &col.sql_type).ok()??;
        Some(format!("\"{}\"", escape_store_string(&encoded)))
    }
}

fn escape_store_string(s: &str) -> String {
    s.replace('"', "\\\"")
}

/// In-core evaluation of the full predicate tree against a decoded row (spec
/// §4.4.2 step 5). This is always applied, so the store fragment above only needs
/// to be a correct-or-conservative pre-filter.
pub fn eval_expr(expr: &Expr, row: &Row, params: &HashMap<u32, DataValue>) -> Result<bool> {
    Ok(match expr {
        Expr::Compare(l, op, r) => {
            let lv = eval_value(l, row, params)?;
            let rv = eval_value(r, row, params)?;
            if lv.is_null() || rv.is_null() {
                false
            } else {
                compare_typed(&lv, &rv)?.map(|ord| matches_op(ord, *op)).unwrap_or(false)
            }
        }
        Expr::LikePrefix(c, prefix) => match eval_value(c, row, params)? {
            DataValue::Utf8String(s) => s.starts_with(prefix.as_str()),
            _ => false,
        },
        Expr::IsNull(c) => eval_value(c, row, params)?.is_null(),
        Expr::IsNotNull(c) => !eval_value(c, row, params)?.is_null(),
        Expr::And(items) => {
            for item in items {
                if !eval_expr(item, row, params)? {
                    return Ok(false);
                }
            }
            true
        }
        Expr::Or(items) => {
            for item in items {
                if eval_expr(item, row, params)? {
                    return Ok(true);
                }
            }
            false
        }
        Expr::Not(inner) => !eval_expr(inner, row, params)?,
        other => return Err(DbError::internal(format!("{other:?} is not a boolean predicate node"))),
    })
}

fn eval_value(expr: &Expr, row: &Row, params: &HashMap<u32, DataValue>) -> Result<DataValue> {
    match expr {
        Expr::Column(name) => Ok(row.get(name).cloned().unwrap_or(DataValue::Null)),
        Expr::Constant(v) => Ok(v.clone()),
        Expr::Parameter(p) => params
            .get(&p.id)
            .cloned()
            .ok_or_else(|| DbError::programming(format!("unbound parameter #{}", p.id))),
        other => Err(DbError::internal(format!("{other:?} is not a value node"))),
    }
}

fn matches_op(ord: Ordering, op: CompareOp) -> bool {
    match op {
        CompareOp::Eq => ord == Ordering::Equal,
        CompareOp::NotEq => ord != Ordering::Equal,
        CompareOp::Lt => ord == Ordering::Less,
        CompareOp::Le => ord != Ordering::Greater,
        CompareOp::Gt => ord == Ordering::Greater,
        CompareOp::Ge => ord != Ordering::Less,
    }
}

fn compare_typed(l: &DataValue, r: &DataValue) -> Result<Option<Ordering>> {
    Ok(Some(match (l, r) {
        (DataValue::TinyInt(a), DataValue::TinyInt(b)) => a.cmp(b),
        (DataValue::SmallInt(a), DataValue::SmallInt(b)) => a.cmp(b),
        (DataValue::Integer(a), DataValue::Integer(b)) => a.cmp(b),
        (DataValue::BigInt(a), DataValue::BigInt(b)) => a.cmp(b),
        (DataValue::Boolean(a), DataValue::Boolean(b)) => a.cmp(b),
        (DataValue::DateTime(a), DataValue::DateTime(b)) => a.cmp(b),
        (DataValue::Utf8String(a), DataValue::Utf8String(b)) => a.cmp(b),
        (DataValue::Decimal(a), DataValue::Decimal(b)) => a.cmp(b),
        (DataValue::Float32(a), DataValue::Float32(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (DataValue::Float64(a), DataValue::Float64(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (DataValue::Binary(a), DataValue::Binary(b)) => a.cmp(b),
        _ => return Err(DbError::internal("comparison between mismatched value kinds")),
    }))
}

/// Ordering used for `ORDER BY` (spec §4.4.3); NULLs sort first, matching the
/// teacher's executor-side sort in `ansilo-connectors-memory`.
pub(crate) fn order_values(a: Option<&DataValue>, b: Option<&DataValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => match (x.is_null(), y.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => compare_typed(x, y).ok().flatten().unwrap_or(Ordering::Equal),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use golembase_core::data::DataType;
    use golembase_plan::{ColumnDef, CreateTable, Ddl};

    fn table() -> Table {
        let mut schema = golembase_catalog::Schema::empty("s1");
        golembase_catalog::apply_ddl(
            &mut schema,
            Ddl::CreateTable(CreateTable {
                table: "t".into(),
                entity_ttl: 1,
                columns: vec![
                    ColumnDef {
                        name: "age".into(),
                        sql_type: DataType::Integer,
                        nullable: true,
                        default: None,
                        indexed: true,
                        primary_key: false,
                    },
                    ColumnDef {
                        name: "name".into(),
                        sql_type: DataType::Varchar(Default::default()),
                        nullable: true,
                        default: None,
                        indexed: true,
                        primary_key: false,
                    },
                ],
            }),
        )
        .unwrap();
        schema.table("t").unwrap().clone()
    }

    #[test]
    fn compiles_and_predicate_with_tenant_scope() {
        let table = table();
        let expr = Expr::And(vec![
            Expr::compare(Expr::column("age"), CompareOp::Gt, Expr::constant(DataValue::Integer(30))),
            Expr::compare(Expr::column("name"), CompareOp::Eq, Expr::constant(DataValue::Utf8String("Al".into()))),
        ]);
        let query = compile_query(&table, "app", "t", Some(&expr), &HashMap::new());
        assert_eq!(
            query,
            "row_type=\"json\" && relation=\"app.t\" && idx_age>9223372036854775838 && idx_name=\"Al\""
        );
    }

    #[test]
    fn compiles_like_prefix() {
        let table = table();
        let expr = Expr::LikePrefix(Box::new(Expr::column("name")), "Al".to_string());
        let query = compile_query(&table, "app", "t", Some(&expr), &HashMap::new());
        assert!(query.ends_with("idx_name ~ \"Al*\""));
    }

    #[test]
    fn non_indexable_column_is_rejected() {
        let mut schema = golembase_catalog::Schema::empty("s1");
        golembase_catalog::apply_ddl(
            &mut schema,
            Ddl::CreateTable(CreateTable {
                table: "t".into(),
                entity_ttl: 1,
                columns: vec![ColumnDef {
                    name: "x".into(),
                    sql_type: DataType::Double,
                    nullable: true,
                    default: None,
                    indexed: false,
                    primary_key: false,
                }],
            }),
        )
        .unwrap();
        let table = schema.table("t").unwrap();
        let expr = Expr::compare(Expr::column("x"), CompareOp::Gt, Expr::constant(DataValue::Float64(1.0)));
        assert!(reject_non_indexable(&expr, table).is_err());
    }
}
