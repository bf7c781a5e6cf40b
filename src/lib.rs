//! # AtomStore
//!
//! A Rust data-access layer built around two reusable abstractions: a
//! transaction-scoped unit of work bracketing a logical operation across one
//! or more storage objects, and a generic storage contract exposing
//! predicate-driven CRUD over an arbitrary entity type.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use atomstore::prelude::*;
//!
//! #[derive(Debug, Clone, FromRow)]
//! pub struct User {
//!     pub id: Option<i64>,
//!     pub email: String,
//!     pub is_active: bool,
//! }
//!
//! impl Record for User {
//!     fn table_name() -> &'static str {
//!         "users"
//!     }
//!
//!     fn insert_sql() -> &'static str {
//!         "INSERT INTO users (email, is_active) VALUES (?, ?)"
//!     }
//!
//!     fn bind_insert<'q>(
//!         &self,
//!         query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
//!     ) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
//!         query.bind(self.email.clone()).bind(self.is_active)
//!     }
//!
//!     fn set_generated_id(&mut self, rowid: i64) {
//!         self.id = Some(rowid);
//!     }
//!
//!     fn create_table_sql() -> String {
//!         "CREATE TABLE IF NOT EXISTS users (
//!             id INTEGER PRIMARY KEY AUTOINCREMENT,
//!             email TEXT NOT NULL,
//!             is_active BOOLEAN NOT NULL DEFAULT 0
//!         )"
//!         .to_string()
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::with_path("./app.db");
//!     let atomstore = AtomStore::new(config)?;
//!     atomstore.auto_migrate::<User>(false).await?;
//!
//!     let users = atomstore.store_for::<User>();
//!     let context = atomstore.context();
//!
//!     let created: Result<Vec<User>, StoreError> = context
//!         .atomic(|| async {
//!             users
//!                 .create(vec![User {
//!                     id: None,
//!                     email: "john@example.com".to_string(),
//!                     is_active: false,
//!                 }])
//!                 .await
//!         })
//!         .await;
//!
//!     println!("created user id: {:?}", created?[0].id);
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod migration;
pub mod prelude;

// Re-export the main public types for convenience
pub use crate::core::AtomStore;
pub use errors::AtomStoreError;

// Re-export centralized config
pub use config::{AppConfig, ConfigError, DatabaseConfig};

// Re-export internal crates used in the public API
pub use entity_store;
pub use tx_context;

// Re-export external dependencies used in public API: predicate and patch
// values are serde_json::Value, and UUID/timestamp fields bind through the
// uuid and chrono types.
pub use async_trait;
pub use chrono;
pub use futures;
pub use serde_json;
pub use sqlx;
pub use uuid;
