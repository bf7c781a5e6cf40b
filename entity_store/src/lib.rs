//! Entity Store - generic predicate-driven storage for AtomStore
//!
//! This crate provides the storage contract: an entity-agnostic CRUD
//! interface with AND-of-equalities predicate filtering, implemented per
//! storage technology and always executing against the handle of the
//! currently active transaction scope (see the `tx-context` crate).

pub mod errors;
pub mod predicate;
pub mod prelude;
pub mod sql;
pub mod sqlite;
pub mod traits;

pub use errors::StoreError;
pub use predicate::{Patch, Predicate};
pub use sqlite::{SqliteBackend, SqliteStore, SqliteTxContext};
pub use traits::{EntityStream, Record, Store};
