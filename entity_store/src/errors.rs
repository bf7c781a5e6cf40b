use thiserror::Error;
use tx_context::TransactionError;

/// Errors raised by store operations.
///
/// Backend failures are surfaced unwrapped; the store never retries and
/// never intercepts constraint or connectivity errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no active transaction")]
    NoActiveTransaction,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Transaction(TransactionError),
}

impl From<TransactionError> for StoreError {
    fn from(error: TransactionError) -> Self {
        match error {
            TransactionError::NoActiveTransaction => StoreError::NoActiveTransaction,
            other => StoreError::Transaction(other),
        }
    }
}
