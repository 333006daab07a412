pub mod expr;
pub mod query;

pub use expr::{CompareOp, Expr, Parameter};
pub use query::{
    ColumnDef, ColumnDefault, CreateTable, Ddl, Delete, Insert, OrderDirection, Ordering, Query,
    Select, Update,
};
