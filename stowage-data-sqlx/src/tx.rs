//! Transaction handle and the unit-of-work runner.
//!
//! [`TxManager::run_in_transaction`] begins a transaction, hands a [`Tx`] to
//! the work closure, then commits on `Ok` and rolls back on `Err`:
//!
//! ```ignore
//! let saved = manager
//!     .run_in_transaction(|tx| async move {
//!         storage.insert(Conn::Tx(&tx), &mut roster).await?;
//!         Ok::<_, DataError>(roster)
//!     })
//!     .await?;
//! ```

use std::future::Future;
use std::sync::Arc;

use sqlx::{Database, Pool, Transaction};
use stowage_data::DataError;
use tokio::sync::{Mutex, MutexGuard};

/// A shared handle to one open transaction.
///
/// Clones refer to the same transaction. Statements issued through a `Tx`
/// run one at a time. Once [`commit`](Tx::commit) or
/// [`rollback`](Tx::rollback) has run, every clone fails with
/// [`DataError::TransactionClosed`].
pub struct Tx<DB: Database> {
    inner: Arc<Mutex<Option<Transaction<'static, DB>>>>,
}

impl<DB: Database> Clone for Tx<DB> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<DB: Database> std::fmt::Debug for Tx<DB> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tx").finish_non_exhaustive()
    }
}

impl<DB: Database> Tx<DB> {
    pub fn new(tx: Transaction<'static, DB>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(tx))),
        }
    }

    /// Lock the transaction to run raw `sqlx` statements on it.
    ///
    /// Holds `None` once the transaction has finished. Storage calls on the
    /// same handle wait until the guard is dropped.
    pub async fn lock(&self) -> MutexGuard<'_, Option<Transaction<'static, DB>>> {
        self.inner.lock().await
    }

    /// `false` once the transaction was committed or rolled back.
    pub async fn is_active(&self) -> bool {
        self.inner.lock().await.is_some()
    }

    pub async fn commit(&self) -> Result<(), DataError> {
        let tx = self.take().await?;
        tx.commit()
            .await
            .map_err(|e| DataError::TransactionCommitFailed(Box::new(e)))
    }

    pub async fn rollback(&self) -> Result<(), DataError> {
        let tx = self.take().await?;
        tx.rollback().await.map_err(DataError::database)
    }

    async fn take(&self) -> Result<Transaction<'static, DB>, DataError> {
        self.inner
            .lock()
            .await
            .take()
            .ok_or(DataError::TransactionClosed)
    }
}

/// Begins transactions on a pool and runs units of work inside them.
pub struct TxManager<DB: Database> {
    pool: Pool<DB>,
}

impl<DB: Database> Clone for TxManager<DB> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

impl<DB: Database> TxManager<DB> {
    pub fn new(pool: Pool<DB>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Pool<DB> {
        &self.pool
    }

    /// Begin a transaction for manual commit/rollback.
    ///
    /// A handle dropped without either is rolled back by the driver.
    pub async fn begin(&self) -> Result<Tx<DB>, DataError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DataError::TransactionStartFailed(Box::new(e)))?;
        tracing::debug!("transaction started");
        Ok(Tx::new(tx))
    }

    /// Run `work` inside a new transaction.
    ///
    /// - Begin failure: [`DataError::TransactionStartFailed`], `work` is not called.
    /// - `work` fails: rollback, then the work error is returned unchanged. A
    ///   rollback failure is logged and dropped.
    /// - `work` succeeds: commit. A commit failure is returned as
    ///   [`DataError::TransactionCommitFailed`].
    ///
    /// Nested calls open independent transactions; there are no savepoints.
    pub async fn run_in_transaction<F, Fut, R, E>(&self, work: F) -> Result<R, E>
    where
        F: FnOnce(Tx<DB>) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: From<DataError>,
    {
        let tx = self.begin().await?;
        match work(tx.clone()).await {
            Ok(value) => {
                tx.commit().await?;
                tracing::debug!("transaction committed");
                Ok(value)
            }
            Err(err) => {
                match tx.rollback().await {
                    Ok(()) => tracing::debug!("transaction rolled back"),
                    Err(rollback_err) => {
                        tracing::warn!(error = %rollback_err, "transaction rollback failed")
                    }
                }
                Err(err)
            }
        }
    }
}
