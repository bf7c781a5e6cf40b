use thiserror::Error;

/// Boxed backend failure carried as the source of a lifecycle error.
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by the transaction lifecycle.
///
/// Exactly one of these reaches the caller when a scope fails; finalization
/// never surfaces more than one error and never swallows the last one.
#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("a transaction block cannot be nested within another transaction block")]
    NestedTransaction,

    #[error("no active transaction")]
    NoActiveTransaction,

    #[error("failed to start transaction: {0}")]
    Begin(#[source] BackendError),

    #[error("failed to commit transaction: {0}")]
    Commit(#[source] BackendError),

    #[error("failed to roll back transaction: {0}")]
    Rollback(#[source] BackendError),

    #[error("failed to close transaction handle: {0}")]
    Close(#[source] BackendError),
}
