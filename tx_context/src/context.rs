//! The transactional context (unit of work).

use std::future::Future;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::backend::TransactionBackend;
use crate::errors::TransactionError;
use crate::id::TxId;

/// Scope identifier and native handle of one active transaction.
struct ActiveTransaction<H> {
    id: TxId,
    handle: H,
}

type ActiveSlot<H> = Arc<Mutex<Option<ActiveTransaction<H>>>>;

/// Unit-of-work context bracketing storage operations in one transaction.
///
/// A context owns at most one active transaction at a time; the slot being
/// occupied is exactly the definition of "a scope is active". Entering while
/// active fails with [`TransactionError::NestedTransaction`]: transactions
/// do not nest, there are no savepoints.
///
/// A context instance is reusable across sequential scopes and belongs to
/// one logical task; logically independent concurrent tasks each use their
/// own instance so their scopes cannot collide.
pub struct TransactionalContext<B: TransactionBackend> {
    backend: B,
    active: ActiveSlot<B::Handle>,
}

impl<B: TransactionBackend> TransactionalContext<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// The backend adapter this context finalizes transactions with.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Begin a new transaction scope.
    ///
    /// Mints a fresh [`TxId`], asks the backend to start a transaction and
    /// stores the pair as the active scope. Fails with
    /// [`TransactionError::NestedTransaction`] if a scope is already active;
    /// the existing transaction is left untouched.
    pub async fn enter(&self) -> Result<TxId, TransactionError> {
        let mut slot = self.active.lock().await;
        if slot.is_some() {
            return Err(TransactionError::NestedTransaction);
        }
        let handle = self
            .backend
            .start_transaction()
            .await
            .map_err(TransactionError::Begin)?;
        let id = TxId::mint();
        tracing::debug!(scope = %id, "transaction scope entered");
        *slot = Some(ActiveTransaction { id, handle });
        Ok(id)
    }

    /// Finalize the active scope.
    ///
    /// With `success` the transaction is committed. A commit failure is
    /// logged, rollback is attempted as best-effort recovery (its own
    /// failure is logged, never returned) and the commit error is what the
    /// caller sees. Without `success` the transaction is rolled back.
    ///
    /// The scope is removed from the context *before* finalization, so the
    /// active slot is empty afterwards no matter what commit or rollback do.
    /// The handle is closed after either path; a close failure on an
    /// otherwise clean exit is returned, otherwise logged.
    pub async fn exit(&self, success: bool) -> Result<(), TransactionError> {
        let mut slot = self.active.lock().await;
        let Some(active) = slot.take() else {
            return Err(TransactionError::NoActiveTransaction);
        };
        drop(slot);
        let ActiveTransaction { id, mut handle } = active;

        let outcome = if success {
            match self.backend.commit(&mut handle).await {
                Ok(()) => Ok(()),
                Err(commit_error) => {
                    tracing::error!(
                        scope = %id,
                        error = %commit_error,
                        "transaction commit failed, attempting rollback"
                    );
                    if let Err(rollback_error) = self.backend.rollback(&mut handle).await {
                        tracing::error!(
                            scope = %id,
                            error = %rollback_error,
                            "rollback after failed commit also failed"
                        );
                    }
                    Err(TransactionError::Commit(commit_error))
                }
            }
        } else {
            self.backend.rollback(&mut handle).await.map_err(|error| {
                tracing::error!(scope = %id, error = %error, "transaction rollback failed");
                TransactionError::Rollback(error)
            })
        };

        if let Err(close_error) = self.backend.close(handle).await {
            if outcome.is_ok() {
                return Err(TransactionError::Close(close_error));
            }
            tracing::warn!(scope = %id, error = %close_error, "failed to close transaction handle");
        }

        tracing::debug!(scope = %id, committed = success && outcome.is_ok(), "transaction scope exited");
        outcome
    }

    /// Run `body` inside one transaction scope with guaranteed cleanup.
    ///
    /// Enters a scope, runs the body, then commits when the body returned
    /// `Ok` and rolls back when it returned `Err`. A body error takes
    /// precedence over any finalization error. If the returned future is
    /// dropped before finalization (task cancellation), the scope is
    /// discarded and the native handle dropped, which aborts the
    /// transaction.
    pub async fn atomic<F, Fut, T, E>(&self, body: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<TransactionError>,
    {
        self.enter().await?;
        let mut cleanup = ScopeGuard {
            active: Arc::clone(&self.active),
            armed: true,
        };
        let result = body().await;
        cleanup.armed = false;
        match self.exit(result.is_ok()).await {
            Ok(()) => result,
            Err(finalize_error) => match result {
                Err(body_error) => Err(body_error),
                Ok(_) => Err(finalize_error.into()),
            },
        }
    }

    /// Borrow the handle of the currently active scope.
    ///
    /// Fails with [`TransactionError::NoActiveTransaction`] when no scope is
    /// active. The returned guard keeps the scope locked until dropped;
    /// operations within one scope are sequential, so at most one guard is
    /// live at a time. Drop it before calling `exit` or requesting the
    /// handle again.
    pub async fn current_handle(&self) -> Result<ActiveHandle<B::Handle>, TransactionError> {
        let guard = Arc::clone(&self.active).lock_owned().await;
        if guard.is_none() {
            return Err(TransactionError::NoActiveTransaction);
        }
        Ok(ActiveHandle { guard })
    }

    /// Whether a transaction scope is currently active on this context.
    pub async fn in_scope(&self) -> bool {
        self.active.lock().await.is_some()
    }

    /// Identifier of the active scope, if any.
    pub async fn scope_id(&self) -> Option<TxId> {
        self.active.lock().await.as_ref().map(|active| active.id)
    }
}

/// Owned view of the active scope's native handle.
///
/// Dereferences to the handle; handed to store implementations so they can
/// execute against the current transaction without the caller passing it
/// through every layer.
pub struct ActiveHandle<H> {
    guard: OwnedMutexGuard<Option<ActiveTransaction<H>>>,
}

impl<H> std::fmt::Debug for ActiveHandle<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveHandle")
            .field("scope_id", &self.active().id)
            .finish_non_exhaustive()
    }
}

impl<H> ActiveHandle<H> {
    /// Scope identifier of the transaction this handle belongs to.
    pub fn scope_id(&self) -> TxId {
        self.active().id
    }

    fn active(&self) -> &ActiveTransaction<H> {
        match self.guard.as_ref() {
            Some(active) => active,
            None => unreachable!("ActiveHandle is only constructed for an occupied slot"),
        }
    }
}

impl<H> Deref for ActiveHandle<H> {
    type Target = H;

    fn deref(&self) -> &H {
        &self.active().handle
    }
}

impl<H> DerefMut for ActiveHandle<H> {
    fn deref_mut(&mut self) -> &mut H {
        match self.guard.as_mut() {
            Some(active) => &mut active.handle,
            None => unreachable!("ActiveHandle is only constructed for an occupied slot"),
        }
    }
}

/// Empties the active slot when an `atomic` future is dropped before
/// finalization, so a cancelled scope cannot leak into the next `enter`.
struct ScopeGuard<H: Send + 'static> {
    active: ActiveSlot<H>,
    armed: bool,
}

impl<H: Send + 'static> Drop for ScopeGuard<H> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match self.active.try_lock() {
            Ok(mut slot) => {
                if let Some(stale) = slot.take() {
                    tracing::warn!(
                        scope = %stale.id,
                        "transaction scope dropped before finalization, discarding handle"
                    );
                }
            }
            Err(_) => {
                // The slot is still locked, most likely by a stream that is
                // being torn down concurrently. Clear it as soon as the lock
                // frees up.
                let active = Arc::clone(&self.active);
                match tokio::runtime::Handle::try_current() {
                    Ok(runtime) => {
                        runtime.spawn(async move {
                            let mut slot = active.lock().await;
                            if let Some(stale) = slot.take() {
                                tracing::warn!(
                                    scope = %stale.id,
                                    "transaction scope dropped before finalization, discarding handle"
                                );
                            }
                        });
                    }
                    Err(_) => {
                        tracing::error!(
                            "transaction scope dropped with its slot locked and no \
                             runtime available, the scope cannot be cleared"
                        );
                    }
                }
            }
        }
    }
}
