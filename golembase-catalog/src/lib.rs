pub mod ddl;
pub mod schema;
pub mod store;

pub use ddl::apply_ddl;
pub use schema::{ForeignKey, Index, Schema, Table, UniqueConstraint};
pub use store::{CatalogStore, FileCatalogStore, InMemoryCatalogStore};
