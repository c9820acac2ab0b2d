use crate::store::{self, Tables};
use anyhow::anyhow;
use futures::{
    future::{self, BoxFuture},
    stream::{self, BoxStream, StreamExt},
};
use silo_core::{Driver, DriverTx, Error, Result, RowLabeled, RowsAffected, Statement};
use std::sync::{
    Arc, RwLock,
    atomic::{AtomicBool, Ordering},
};

/// Snapshot transaction over the in-memory store.
///
/// Begin clones the current tables; every statement in the transaction runs
/// against the private copy. Commit swaps the copy in as the shared state,
/// rollback simply drops it. The one-shot discipline (commit or rollback at
/// most once, no statements afterwards) is enforced above the driver.
pub struct MemoryTransaction {
    base: Arc<RwLock<Tables>>,
    closed: Arc<AtomicBool>,
    working: RwLock<Tables>,
}

impl MemoryTransaction {
    pub(crate) fn new(base: Arc<RwLock<Tables>>, closed: Arc<AtomicBool>, snapshot: Tables) -> Self {
        Self {
            base,
            closed,
            working: RwLock::new(snapshot),
        }
    }

    fn guard(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::Store(anyhow!("memory driver is closed")));
        }
        Ok(())
    }
}

impl Driver for MemoryTransaction {
    fn dialect(&self) -> &'static str {
        "memory"
    }

    fn execute(&self, statement: Statement) -> BoxFuture<'_, Result<RowsAffected>> {
        Box::pin(future::ready(self.guard().and_then(|()| {
            let mut tables = self.working.write().unwrap_or_else(|e| e.into_inner());
            store::execute(&mut tables, &statement)
        })))
    }

    fn fetch(&self, statement: Statement) -> BoxStream<'_, Result<RowLabeled>> {
        let rows = self.guard().and_then(|()| {
            let mut tables = self.working.write().unwrap_or_else(|e| e.into_inner());
            store::fetch(&mut tables, &statement)
        });
        match rows {
            Ok(rows) => stream::iter(rows.into_iter().map(Ok)).boxed(),
            Err(e) => stream::once(future::ready(Err(e))).boxed(),
        }
    }

    fn begin(&self) -> BoxFuture<'_, Result<Arc<dyn DriverTx>>> {
        Box::pin(future::ready(Err(Error::NestedTransaction)))
    }

    fn close(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(future::ready(Ok(())))
    }

    fn is_transactional(&self) -> bool {
        true
    }
}

impl DriverTx for MemoryTransaction {
    fn commit(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(future::ready(self.guard().map(|()| {
            let working = std::mem::take(&mut *self.working.write().unwrap_or_else(|e| e.into_inner()));
            *self.base.write().unwrap_or_else(|e| e.into_inner()) = working;
            log::debug!(target: "silo", "memory: transaction committed");
        })))
    }

    fn rollback(&self) -> BoxFuture<'_, Result<()>> {
        log::debug!(target: "silo", "memory: transaction rolled back");
        Box::pin(future::ready(Ok(())))
    }
}
