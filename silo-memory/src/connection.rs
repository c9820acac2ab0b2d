use crate::{
    store::{self, Tables},
    transaction::MemoryTransaction,
};
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
use url::Url;

/// Process-local storage driver.
///
/// Interprets statements directly against in-memory tables, which makes the
/// whole entity layer exercisable without a SQL server. Cloning the driver
/// shares the store, like cloning a connection pool handle.
#[derive(Clone, Default)]
pub struct MemoryDriver {
    pub(crate) tables: Arc<RwLock<Tables>>,
    pub(crate) closed: Arc<AtomicBool>,
}

impl std::fmt::Debug for MemoryDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDriver").finish_non_exhaustive()
    }
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh, empty store. The URL only selects the backend, e.g.
    /// `memory://`; anything with another scheme is rejected.
    pub fn connect(url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| anyhow!("invalid connection url {:?}: {}", url, e))?;
        if url.scheme() != "memory" {
            return Err(Error::UnsupportedDriver {
                kind: url.scheme().to_string(),
            });
        }
        log::debug!(target: "silo", "memory: opened store for {}", url);
        Ok(Self::new())
    }

    pub(crate) fn guard(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::Store(anyhow!("memory driver is closed")));
        }
        Ok(())
    }
}

impl Driver for MemoryDriver {
    fn dialect(&self) -> &'static str {
        "memory"
    }

    fn execute(&self, statement: Statement) -> BoxFuture<'_, Result<RowsAffected>> {
        Box::pin(future::ready(self.guard().and_then(|()| {
            let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
            store::execute(&mut tables, &statement)
        })))
    }

    fn fetch(&self, statement: Statement) -> BoxStream<'_, Result<RowLabeled>> {
        let rows = self.guard().and_then(|()| {
            let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
            store::fetch(&mut tables, &statement)
        });
        match rows {
            Ok(rows) => stream::iter(rows.into_iter().map(Ok)).boxed(),
            Err(e) => stream::once(future::ready(Err(e))).boxed(),
        }
    }

    fn begin(&self) -> BoxFuture<'_, Result<Arc<dyn DriverTx>>> {
        Box::pin(future::ready(self.guard().map(|()| {
            let snapshot = self
                .tables
                .read()
                .unwrap_or_else(|e| e.into_inner())
                .clone();
            Arc::new(MemoryTransaction::new(
                Arc::clone(&self.tables),
                Arc::clone(&self.closed),
                snapshot,
            )) as Arc<dyn DriverTx>
        })))
    }

    fn close(&self) -> BoxFuture<'_, Result<()>> {
        self.closed.store(true, Ordering::SeqCst);
        Box::pin(future::ready(Ok(())))
    }
}
