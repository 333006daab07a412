use serde::{Deserialize, Serialize};

use golembase_core::data::{DataType, DataValue};

use crate::expr::Expr;

/// A fully resolved statement, ready for the translator (spec §4.3/§4.4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Query {
    Ddl(Ddl),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    Select(Select),
    ShowTables,
    DescribeTable(String),
    SelectConstant(DataValue),
}

impl Query {
    /// Every expression embedded in the statement, for parameter discovery.
    pub fn exprs(&self) -> Vec<&Expr> {
        match self {
            Query::Insert(i) => i.values.iter().collect(),
            Query::Update(u) => u
                .assignments
                .iter()
                .map(|(_, e)| e)
                .chain(u.r#where.as_ref())
                .collect(),
            Query::Delete(d) => d.r#where.as_ref().into_iter().collect(),
            Query::Select(s) => s.r#where.as_ref().into_iter().collect(),
            Query::Ddl(_) | Query::ShowTables | Query::DescribeTable(_) | Query::SelectConstant(_) => {
                vec![]
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ordering {
    pub column: String,
    pub direction: OrderDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Select {
    pub table: String,
    /// Empty means `SELECT *`.
    pub columns: Vec<String>,
    pub r#where: Option<Expr>,
    pub order_by: Vec<Ordering>,
    pub limit: Option<u64>,
    pub offset: u64,
}

impl Select {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: vec![],
            r#where: None,
            order_by: vec![],
            limit: None,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub table: String,
    pub assignments: Vec<(String, Expr)>,
    pub r#where: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delete {
    pub table: String,
    pub r#where: Option<Expr>,
}

/// DDL statements supported by the catalog (spec §4.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Ddl {
    CreateTable(CreateTable),
    DropTable { table: String },
    CreateIndex { table: String, column: String, name: String },
    DropIndex { name: String },
    AddColumn { table: String, column: ColumnDef },
    AddUniqueConstraint { table: String, column: String },
    AddForeignKey {
        table: String,
        column: String,
        ref_table: String,
        ref_column: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTable {
    pub table: String,
    pub entity_ttl: u64,
    pub columns: Vec<ColumnDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub sql_type: DataType,
    pub nullable: bool,
    pub default: Option<ColumnDefault>,
    pub indexed: bool,
    pub primary_key: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnDefault {
    Literal(DataValue),
    CurrentTimestamp,
    Autoincrement,
}
