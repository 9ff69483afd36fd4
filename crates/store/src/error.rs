use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested row does not exist (or is soft-deleted).
    #[error("not found")]
    NotFound,

    /// Backend failure (connection, query).
    #[cfg(feature = "postgres")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
