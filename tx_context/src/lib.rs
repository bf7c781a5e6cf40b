//! Transactional unit-of-work primitives for AtomStore
//!
//! This crate provides the transaction lifecycle used by every store object:
//! a [`TransactionalContext`] brackets one atomic unit of storage operations,
//! opening a native transaction handle on entry and guaranteeing that the
//! handle never outlives the scope that created it, on every exit path.
//!
//! The backend adapter that actually opens connections and finalizes
//! transactions is abstracted behind [`TransactionBackend`] and implemented
//! per storage technology.

pub mod backend;
pub mod context;
pub mod errors;
pub mod id;

pub use backend::TransactionBackend;
pub use context::{ActiveHandle, TransactionalContext};
pub use errors::{BackendError, TransactionError};
pub use id::TxId;
