use thiserror::Error;

/// Tagged outcome of a store operation.
///
/// Callers can tell a no-op caused by absence (`NotFound`) apart from a
/// rejected write (`EmailTaken`) and from the engine being unusable
/// (`Database`), and present each case differently.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no user with id {0}")]
    NotFound(i64),
    #[error("email already in use: {0}")]
    EmailTaken(String),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
