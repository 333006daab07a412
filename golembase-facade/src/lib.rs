//! The adapter façade (spec §4.6): the only part of this workspace a driver talks
//! to. Parses a connection string, holds one tenant's catalog, and turns SQL text
//! plus bound parameters into backing-store calls via `golembase-translator`.

pub mod catalog_handle;
pub mod connection;
pub mod cursor;
pub mod introspection;
pub mod params;
pub mod paramstyle;
pub mod retry;

pub use connection::Connection;
pub use cursor::{Cursor, Execution};
pub use params::ConnectionParams;
