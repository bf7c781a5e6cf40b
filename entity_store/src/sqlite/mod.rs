//! SQLite implementations of the transaction backend and the store.

mod backend;
mod store;

pub use backend::{SqliteBackend, SqliteTxContext};
pub use store::SqliteStore;
