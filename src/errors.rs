//! Error types for the AtomStore crate
//!
//! This module contains all error types that can be returned by AtomStore operations.

use config::ConfigError;
use entity_store::StoreError;
use thiserror::Error;
use tx_context::TransactionError;

#[derive(Error, Debug)]
pub enum AtomStoreError {
    #[error("Store object not found: {0}")]
    StoreNotFound(String),

    #[error("Store object already registered: {0}")]
    StoreAlreadyRegistered(String),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
