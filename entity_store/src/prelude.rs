//! Convenience re-exports for common entity-store usage

// Core traits
pub use crate::traits::{EntityStream, Record, Store};

// Predicate and partial-update maps
pub use crate::predicate::{Patch, Predicate};

// Error types
pub use crate::errors::StoreError;

// SQLite implementations
pub use crate::sqlite::{SqliteBackend, SqliteStore, SqliteTxContext};

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use futures::StreamExt;
pub use sqlx::FromRow;
