use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::errors::StoreError;
use crate::predicate::{Patch, Predicate};

/// Lazy, single-pass sequence of entities produced by [`Store::get`].
pub type EntityStream<T> = BoxStream<'static, Result<T, StoreError>>;

/// Entity-agnostic CRUD with predicate filtering.
///
/// An implementation is bound to exactly one concrete entity type at
/// construction through the `Entity` associated type and executes against
/// the handle of the currently active transaction scope. Every operation
/// fails with [`StoreError::NoActiveTransaction`], before any backend
/// interaction, when no scope is active.
#[async_trait]
pub trait Store: Send + Sync {
    /// The concrete entity type this store operates over.
    type Entity: Send;

    /// Retrieve entities matching `filter`; all entities when `None`.
    ///
    /// The stream is forward-only and finite, and not restartable:
    /// re-invoking issues a fresh query. Result order is backend-defined.
    async fn get(
        &self,
        filter: Option<Predicate>,
    ) -> Result<EntityStream<Self::Entity>, StoreError>;

    /// Insert `entities` in order, assign any backend-generated identifier
    /// back onto each, and return them in the same order as given.
    ///
    /// Atomicity across the batch is whatever the enclosing transaction
    /// scope provides; this call does not open a scope of its own.
    async fn create(&self, entities: Vec<Self::Entity>) -> Result<Vec<Self::Entity>, StoreError>;

    /// Apply `patch` to every entity matching `filter`, returning the number
    /// of rows affected. An empty predicate updates every entity; no guard
    /// is imposed here.
    async fn update(&self, filter: Predicate, patch: Patch) -> Result<u64, StoreError>;

    /// Remove every entity matching `filter`, returning the number removed.
    /// Same no-guard caveat on an empty predicate.
    async fn delete(&self, filter: Predicate) -> Result<u64, StoreError>;
}
