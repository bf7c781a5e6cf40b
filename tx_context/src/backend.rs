//! Backend adapter contract consumed by the transactional context.

use async_trait::async_trait;

use crate::errors::BackendError;

/// Adapter that opens and finalizes native transactions for one storage
/// technology.
///
/// The context calls [`close`](TransactionBackend::close) after both the
/// commit and rollback paths, so implementations should not release the
/// connection inside `commit`/`rollback` themselves.
///
/// Dropping an unfinalized `Handle` must abort its transaction (true of
/// connection types such as `sqlx::SqliteConnection`); the context relies on
/// this when a scope is cancelled before finalization runs.
#[async_trait]
pub trait TransactionBackend: Send + Sync {
    /// Native transaction/connection handle, owned exclusively by the scope
    /// that created it.
    type Handle: Send + 'static;

    /// Open a connection and begin a transaction.
    async fn start_transaction(&self) -> Result<Self::Handle, BackendError>;

    /// Commit the transaction on `handle`.
    async fn commit(&self, handle: &mut Self::Handle) -> Result<(), BackendError>;

    /// Roll back the transaction on `handle`.
    async fn rollback(&self, handle: &mut Self::Handle) -> Result<(), BackendError>;

    /// Release the underlying connection.
    async fn close(&self, handle: Self::Handle) -> Result<(), BackendError>;
}
