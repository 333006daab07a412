pub use anyhow::{bail, ensure, Context, Error};

/// Result alias used throughout the workspace, matching the teacher's `ansilo_core::err`
/// convention of re-exporting `anyhow` rather than inventing a bespoke error trait.
pub type Result<T> = anyhow::Result<T>;

/// The canonical DB-adapter error taxonomy (spec §7), matched against a conventional
/// DB-API hierarchy. Every error surfaced across a statement boundary is one of these.
#[derive(thiserror::Error, Debug)]
pub enum DbError {
    /// Malformed connection string, unsupported parameter style.
    #[error("interface error: {0}")]
    Interface(String),
    /// SQL parse failure, unknown table/column, catalog type mismatch, attempt to index
    /// an unsupported type.
    #[error("programming error: {0}")]
    Programming(String),
    /// Value out of range for its declared type.
    #[error("data error: {0}")]
    Data(String),
    /// Unsupported SQL construct or enforcement the store cannot provide.
    #[error("not supported: {0}")]
    NotSupported(String),
    /// Raised only when the core itself detects a violation post-hoc. Never promised.
    #[error("integrity error: {0}")]
    Integrity(String),
    /// Backing-store RPC failure or timeout.
    #[error("operational error: {0}")]
    Operational(String),
    /// Catalog file corruption, codec invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn data(msg: impl Into<String>) -> Error {
        Error::new(Self::Data(msg.into()))
    }

    pub fn not_supported(msg: impl Into<String>) -> Error {
        Error::new(Self::NotSupported(msg.into()))
    }

    pub fn programming(msg: impl Into<String>) -> Error {
        Error::new(Self::Programming(msg.into()))
    }

    pub fn interface(msg: impl Into<String>) -> Error {
        Error::new(Self::Interface(msg.into()))
    }

    pub fn integrity(msg: impl Into<String>) -> Error {
        Error::new(Self::Integrity(msg.into()))
    }

    pub fn operational(msg: impl Into<String>) -> Error {
        Error::new(Self::Operational(msg.into()))
    }

    pub fn internal(msg: impl Into<String>) -> Error {
        Error::new(Self::Internal(msg.into()))
    }

    /// Finds the taxonomy variant carried by an error, if any was attached along the way.
    pub fn downcast(err: &Error) -> Option<&DbError> {
        err.downcast_ref::<DbError>()
    }
}
