//! Core AtomStore functionality
//!
//! This module contains the main AtomStore struct and its implementation,
//! providing centralized coordination for the transactional context and the
//! store objects that share it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use config::DatabaseConfig;
use entity_store::{Record, SqliteBackend, SqliteStore, SqliteTxContext, Store};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};

use crate::errors::AtomStoreError;

/// Main AtomStore coordinator that manages the transactional context and
/// registered store objects
pub struct AtomStore {
    context: Arc<SqliteTxContext>,
    stores: HashMap<String, Box<dyn std::any::Any + Send + Sync>>,
}

impl AtomStore {
    /// Create a new AtomStore from database configuration
    pub fn new(config: DatabaseConfig) -> Result<Self, AtomStoreError> {
        let journal_mode = config.journal_mode.parse::<SqliteJournalMode>()?;
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(config.create_if_missing)
            .busy_timeout(Duration::from_secs(config.busy_timeout_seconds))
            .journal_mode(journal_mode)
            .foreign_keys(config.foreign_keys);

        Ok(Self {
            context: Arc::new(SqliteTxContext::new(SqliteBackend::new(options))),
            stores: HashMap::new(),
        })
    }

    /// Transactional context shared by this coordinator's store objects
    pub fn context(&self) -> Arc<SqliteTxContext> {
        Arc::clone(&self.context)
    }

    /// Construct a store for `T` bound to this coordinator's context
    pub fn store_for<T: Record>(&self) -> SqliteStore<T> {
        SqliteStore::new(self.context())
    }

    /// Register a store object with a given name
    pub fn register_store<S>(&mut self, name: String, store: S) -> Result<(), AtomStoreError>
    where
        S: Store + 'static,
    {
        if self.stores.contains_key(&name) {
            return Err(AtomStoreError::StoreAlreadyRegistered(name));
        }

        self.stores.insert(name, Box::new(store));
        Ok(())
    }

    /// Get a registered store object by name
    pub fn get_store<S>(&self, name: &str) -> Result<&S, AtomStoreError>
    where
        S: Store + 'static,
    {
        self.stores
            .get(name)
            .and_then(|store| store.downcast_ref::<S>())
            .ok_or_else(|| AtomStoreError::StoreNotFound(name.to_string()))
    }

    /// Get a mutable reference to a registered store object by name
    pub fn get_store_mut<S>(&mut self, name: &str) -> Result<&mut S, AtomStoreError>
    where
        S: Store + 'static,
    {
        self.stores
            .get_mut(name)
            .and_then(|store| store.downcast_mut::<S>())
            .ok_or_else(|| AtomStoreError::StoreNotFound(name.to_string()))
    }

    /// List all registered store names
    pub fn list_stores(&self) -> Vec<&String> {
        self.stores.keys().collect()
    }

    /// Remove a store object by name
    pub fn unregister_store(&mut self, name: &str) -> Result<(), AtomStoreError> {
        self.stores
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| AtomStoreError::StoreNotFound(name.to_string()))
    }

    /// Check database connection health by running a trivial query in a
    /// throwaway transaction scope
    pub async fn health_check(&self) -> Result<(), AtomStoreError> {
        let context = self.context();
        context
            .atomic(|| async {
                let mut handle = context.current_handle().await?;
                sqlx::query("SELECT 1").fetch_one(&mut *handle).await?;
                Ok::<_, AtomStoreError>(())
            })
            .await
    }
}
