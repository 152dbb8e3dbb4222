//! # Transaction Coordinator
//!
//! Wraps composite writes in begin/commit/rollback. The coordinator owns no
//! locks; atomicity comes entirely from the backend's transaction primitive.
//!
//! States: `Idle -> InTransaction -> Committed | RolledBack`. The backend's
//! transaction handle owns the connection lease, so the connection goes back
//! to the pool whenever the handle is consumed or dropped, whatever the
//! outcome.

use async_trait::async_trait;
use domains::StorageError;
use futures::future::BoxFuture;

/// Lifecycle of one coordinated unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Idle,
    InTransaction,
    Committed,
    RolledBack,
}

impl TxState {
    fn can_advance_to(self, next: TxState) -> bool {
        matches!(
            (self, next),
            (TxState::Idle, TxState::InTransaction)
                | (TxState::InTransaction, TxState::Committed)
                | (TxState::InTransaction, TxState::RolledBack)
        )
    }
}

/// The begin/commit/rollback primitive of a store.
#[async_trait]
pub trait TransactionBackend: Send + Sync {
    /// Handle for an open transaction. Owns its connection.
    type Tx: Send;

    async fn begin(&self) -> Result<Self::Tx, StorageError>;
    async fn commit(&self, tx: Self::Tx) -> Result<(), StorageError>;
    async fn rollback(&self, tx: Self::Tx) -> Result<(), StorageError>;
}

/// Future returned by a unit of work.
pub type TxFuture<'t, T> = BoxFuture<'t, Result<T, StorageError>>;

struct Tracker {
    operation: &'static str,
    state: TxState,
}

impl Tracker {
    fn new(operation: &'static str) -> Self {
        Self {
            operation,
            state: TxState::Idle,
        }
    }

    fn advance(&mut self, next: TxState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transaction transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::debug!(
            operation = self.operation,
            from = ?self.state,
            to = ?next,
            "transaction state"
        );
        self.state = next;
    }
}

#[derive(Debug, Clone)]
pub struct TransactionCoordinator<B> {
    backend: B,
}

impl<B: TransactionBackend> TransactionCoordinator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run `work` inside one transaction.
    ///
    /// Any error from `work` rolls back every statement it issued and is
    /// returned as [`StorageError::Aborted`]; so is a failed commit. A failed
    /// rollback is logged and never replaces the original error.
    pub async fn run<T, F>(&self, operation: &'static str, work: F) -> Result<T, StorageError>
    where
        T: Send,
        F: for<'t> FnOnce(&'t mut B::Tx) -> TxFuture<'t, T> + Send,
    {
        let mut tracker = Tracker::new(operation);
        let mut tx = self.backend.begin().await?;
        tracker.advance(TxState::InTransaction);

        match work(&mut tx).await {
            Ok(value) => match self.backend.commit(tx).await {
                Ok(()) => {
                    tracker.advance(TxState::Committed);
                    Ok(value)
                }
                Err(err) => {
                    tracker.advance(TxState::RolledBack);
                    tracing::warn!(
                        operation,
                        error = %err,
                        "commit failed, transaction rolled back"
                    );
                    Err(StorageError::aborted(operation, err))
                }
            },
            Err(err) => {
                if let Err(rollback_err) = self.backend.rollback(tx).await {
                    tracing::error!(operation, error = %rollback_err, "rollback failed");
                }
                tracker.advance(TxState::RolledBack);
                tracing::warn!(operation, error = %err, "transaction rolled back");
                Err(StorageError::aborted(operation, err))
            }
        }
    }
}
