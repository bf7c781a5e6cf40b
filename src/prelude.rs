//! Convenience re-exports for common AtomStore usage
//!
//! This prelude re-exports the most commonly used items from the AtomStore
//! ecosystem, making it easier to import everything you need with a single
//! use statement.

// Core AtomStore components
pub use crate::core::AtomStore;
pub use crate::errors::AtomStoreError;

// Re-export centralized config
pub use config::{AppConfig, ConfigError, DatabaseConfig};

// Re-export commonly used entity-store types for convenience
pub use entity_store::{
    EntityStream, Patch, Predicate, Record, SqliteBackend, SqliteStore, SqliteTxContext, Store,
    StoreError,
};

// Re-export the transaction lifecycle types
pub use tx_context::{
    ActiveHandle, BackendError, TransactionBackend, TransactionError, TransactionalContext, TxId,
};

// Common external dependencies
pub use async_trait::async_trait;
pub use futures::StreamExt;
pub use sqlx;
pub use sqlx::FromRow;
