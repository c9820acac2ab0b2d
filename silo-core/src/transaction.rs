use crate::{
    Config, Driver, DriverTx, EntityClient, EntityKind, Error, Result, RowLabeled, RowsAffected,
    Statement,
    stream::{self, StreamExt},
};
use futures::{
    future::{self, BoxFuture},
    stream::BoxStream,
};
use std::sync::{Arc, Mutex};

/// Lifecycle of a transaction: open until exactly one of commit or rollback
/// runs, terminal afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Open,
    Committed,
    RolledBack,
}

/// Driver decorator scoping every statement to one transaction.
///
/// Carries the one-shot state machine: statements issued after the terminal
/// state fail with [`Error::TransactionClosed`] instead of reaching the
/// store, and a nested begin is rejected before any store access.
pub struct TxDriver {
    inner: Arc<dyn DriverTx>,
    state: Mutex<TxState>,
}

impl TxDriver {
    pub fn new(inner: Arc<dyn DriverTx>) -> Self {
        Self {
            inner,
            state: Mutex::new(TxState::Open),
        }
    }

    pub fn state(&self) -> TxState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn guard(&self) -> Result<()> {
        match self.state() {
            TxState::Open => Ok(()),
            _ => Err(Error::TransactionClosed),
        }
    }

    /// Move to a terminal state, failing if one was already reached.
    fn finish(&self, to: TxState) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if *state != TxState::Open {
            return Err(Error::TransactionClosed);
        }
        *state = to;
        Ok(())
    }

    pub async fn commit(&self) -> Result<()> {
        self.finish(TxState::Committed)?;
        self.inner.commit().await
    }

    pub async fn rollback(&self) -> Result<()> {
        self.finish(TxState::RolledBack)?;
        self.inner.rollback().await
    }
}

impl Driver for TxDriver {
    fn dialect(&self) -> &'static str {
        self.inner.dialect()
    }

    fn execute(&self, statement: Statement) -> BoxFuture<'_, Result<RowsAffected>> {
        match self.guard() {
            Ok(()) => self.inner.execute(statement),
            Err(e) => Box::pin(future::ready(Err(e))),
        }
    }

    fn fetch(&self, statement: Statement) -> BoxStream<'_, Result<RowLabeled>> {
        match self.guard() {
            Ok(()) => self.inner.fetch(statement),
            Err(e) => stream::once(future::ready(Err(e))).boxed(),
        }
    }

    fn begin(&self) -> BoxFuture<'_, Result<Arc<dyn DriverTx>>> {
        Box::pin(future::ready(Err(Error::NestedTransaction)))
    }

    fn close(&self) -> BoxFuture<'_, Result<()>> {
        // Closing a transactional client abandons the unit of work.
        Box::pin(async move {
            match self.finish(TxState::RolledBack) {
                Ok(()) => self.inner.rollback().await,
                Err(_) => Ok(()),
            }
        })
    }

    fn is_transactional(&self) -> bool {
        true
    }
}

/// An open unit of work: a client facade bound to one transaction.
///
/// Entity operations obtained through [`Tx::kind`] route through the
/// transaction driver, so their effects stay invisible outside until
/// [`Tx::commit`] and are fully discarded by [`Tx::rollback`].
pub struct Tx {
    pub(crate) config: Config,
    pub(crate) driver: Arc<TxDriver>,
}

impl std::fmt::Debug for Tx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tx").finish_non_exhaustive()
    }
}

impl Tx {
    /// Entity client for one kind, bound to this transaction.
    pub fn kind<E: EntityKind>(&self) -> EntityClient<E> {
        EntityClient::new(self.config.clone())
    }

    /// A full client facade bound to this transaction, for code written
    /// against [`crate::Client`]. Beginning a transaction on it fails with
    /// [`Error::NestedTransaction`].
    pub fn client(&self) -> crate::Client {
        crate::Client::from_config(self.config.clone())
    }

    /// Transaction state, for observability.
    pub fn state(&self) -> TxState {
        self.driver.state()
    }

    pub async fn commit(self) -> Result<()> {
        self.driver.commit().await
    }

    pub async fn rollback(self) -> Result<()> {
        self.driver.rollback().await
    }
}
