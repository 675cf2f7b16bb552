//! Failure taxonomy shared by every store and engine operation.
//!
//! Four outcomes are possible: a referenced id does not exist ([`Error::NotFound`]),
//! an input enum or range was violated ([`Error::InvalidArgument`]), the embedding
//! collaborator was unreachable ([`Error::DependencyUnavailable`]), or the
//! underlying SQLite layer failed ([`Error::Storage`]).
//!
//! `DependencyUnavailable` is always absorbed at the tools layer and turned into
//! a degraded-but-successful result (memory stored without a vector, empty
//! search). The other variants surface to the caller unchanged; the core never
//! retries.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A referenced entity id is unknown.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// An enum value or numeric range on the input was violated. Rejected
    /// before anything is persisted.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The embedding collaborator failed or is disabled. Never fatal.
    #[error("dependency unavailable: {0}")]
    DependencyUnavailable(String),

    /// Underlying persistence I/O error, propagated unchanged.
    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization failure: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
