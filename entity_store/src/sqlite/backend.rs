//! SQLite transaction backend.

use async_trait::async_trait;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection, SqliteConnection};
use tx_context::{BackendError, TransactionBackend, TransactionalContext};

/// Transactional context bound to the SQLite backend.
pub type SqliteTxContext = TransactionalContext<SqliteBackend>;

/// Transaction backend opening one SQLite connection per scope.
///
/// Every scope gets a fresh connection with an explicit `BEGIN`; commit and
/// rollback issue the matching statement and the context closes the
/// connection afterwards. Dropping an unfinalized connection aborts the
/// transaction, which satisfies the [`TransactionBackend`] cancellation
/// requirement.
pub struct SqliteBackend {
    options: SqliteConnectOptions,
}

impl SqliteBackend {
    pub fn new(options: SqliteConnectOptions) -> Self {
        Self { options }
    }

    /// Backend for the database file at `path`, created when missing.
    pub fn from_path(path: &str) -> Self {
        Self::new(
            SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true),
        )
    }

    pub fn options(&self) -> &SqliteConnectOptions {
        &self.options
    }
}

#[async_trait]
impl TransactionBackend for SqliteBackend {
    type Handle = SqliteConnection;

    async fn start_transaction(&self) -> Result<SqliteConnection, BackendError> {
        let mut conn = self.options.connect().await?;
        sqlx::query("BEGIN").execute(&mut conn).await?;
        Ok(conn)
    }

    async fn commit(&self, handle: &mut SqliteConnection) -> Result<(), BackendError> {
        sqlx::query("COMMIT").execute(&mut *handle).await?;
        Ok(())
    }

    async fn rollback(&self, handle: &mut SqliteConnection) -> Result<(), BackendError> {
        sqlx::query("ROLLBACK").execute(&mut *handle).await?;
        Ok(())
    }

    async fn close(&self, handle: SqliteConnection) -> Result<(), BackendError> {
        handle.close().await?;
        Ok(())
    }
}
