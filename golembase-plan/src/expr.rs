use serde::{Deserialize, Serialize};

use golembase_core::data::{DataType, DataValue};

/// An expression node in a resolved plan (spec §4.3). Pared down from a general SQL
/// expression tree to the operator set this store's predicate language can express:
/// comparisons, prefix LIKE, null checks, and boolean combinators. No arithmetic, no
/// column-to-column comparisons, no subqueries, no joins, no aggregates (spec Non-goals).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Column(String),
    Constant(DataValue),
    Parameter(Parameter),
    Compare(Box<Expr>, CompareOp, Box<Expr>),
    /// `column LIKE '<prefix>%'` — only a trailing wildcard is supported at this layer.
    LikePrefix(Box<Expr>, String),
    IsNull(Box<Expr>),
    IsNotNull(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
    NotEq,
}

impl CompareOp {
    pub fn negate(self) -> Option<CompareOp> {
        Some(match self {
            CompareOp::Eq => CompareOp::NotEq,
            CompareOp::NotEq => CompareOp::Eq,
            CompareOp::Lt => CompareOp::Ge,
            CompareOp::Le => CompareOp::Gt,
            CompareOp::Gt => CompareOp::Le,
            CompareOp::Ge => CompareOp::Lt,
        })
    }

    /// Whether the backing-store predicate grammar (spec §6.1) has a direct operator
    /// for this comparison. `!=` has none; the store's grammar has no `<>`/`!=` token.
    pub fn store_symbol(self) -> Option<&'static str> {
        Some(match self {
            CompareOp::Eq => "=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::NotEq => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: u32,
    pub r#type: DataType,
}

impl Expr {
    pub fn column(name: impl Into<String>) -> Self {
        Expr::Column(name.into())
    }

    pub fn constant(value: DataValue) -> Self {
        Expr::Constant(value)
    }

    pub fn compare(left: Expr, op: CompareOp, right: Expr) -> Self {
        Expr::Compare(Box::new(left), op, Box::new(right))
    }

    /// Visits every node in the tree, `NOT`-pushing is left to the translator; this is a
    /// read-only traversal used to collect parameters or check support.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Expr)) {
        f(self);
        match self {
            Expr::Column(_) | Expr::Constant(_) | Expr::Parameter(_) => {}
            Expr::Compare(l, _, r) => {
                l.walk(f);
                r.walk(f);
            }
            Expr::LikePrefix(c, _) => c.walk(f),
            Expr::IsNull(c) | Expr::IsNotNull(c) | Expr::Not(c) => c.walk(f),
            Expr::And(items) | Expr::Or(items) => {
                for i in items {
                    i.walk(f);
                }
            }
        }
    }

    pub fn walk_any(&self, mut f: impl FnMut(&Expr) -> bool) -> bool {
        let mut found = false;
        self.walk(&mut |e| {
            if f(e) {
                found = true;
            }
        });
        found
    }

    pub fn as_parameter(&self) -> Option<&Parameter> {
        match self {
            Expr::Parameter(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_column(&self) -> Option<&str> {
        match self {
            Expr::Column(c) => Some(c.as_str()),
            _ => None,
        }
    }
}
