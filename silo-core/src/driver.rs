use crate::{LogSink, Result, RowLabeled, RowsAffected, Statement};
use futures::{future::BoxFuture, stream::BoxStream};
use std::sync::Arc;

/// Capability contract of a storage backend.
///
/// Drivers take `&self` and synchronize internally: the driver handle is
/// the only resource shared between concurrent operations. Everything above
/// this trait is backend-agnostic; everything below it (SQL rendering,
/// wire protocol, in-memory interpretation) lives in driver crates.
pub trait Driver: Send + Sync + 'static {
    /// Backend name, e.g. `"memory"` or `"sqlite"`.
    fn dialect(&self) -> &'static str;

    /// Run a modify statement and report its effect.
    fn execute(&self, statement: Statement) -> BoxFuture<'_, Result<RowsAffected>>;

    /// Run a statement producing rows (selects, and inserts or updates with
    /// returning columns).
    fn fetch(&self, statement: Statement) -> BoxStream<'_, Result<RowLabeled>>;

    /// Begin a transaction. All statements issued through the returned
    /// handle are scoped to one commit/rollback unit.
    fn begin(&self) -> BoxFuture<'_, Result<Arc<dyn DriverTx>>>;

    /// Close the backend; every later call through this driver must fail.
    fn close(&self) -> BoxFuture<'_, Result<()>>;

    /// Whether statements issued here already participate in a transaction.
    fn is_transactional(&self) -> bool {
        false
    }
}

/// A driver scoped to one open transaction.
///
/// Commit and rollback are called at most once each; the transaction state
/// machine above the driver enforces that, so implementations may treat a
/// second call as undefined.
pub trait DriverTx: Driver {
    fn commit(&self) -> BoxFuture<'_, Result<()>>;
    fn rollback(&self) -> BoxFuture<'_, Result<()>>;
}

/// Decorator logging every statement through the config's log sink before
/// delegating to the wrapped driver.
pub struct DebugDriver {
    inner: Arc<dyn Driver>,
    log: LogSink,
}

impl DebugDriver {
    pub fn new(inner: Arc<dyn Driver>, log: LogSink) -> Self {
        Self { inner, log }
    }
}

impl Driver for DebugDriver {
    fn dialect(&self) -> &'static str {
        self.inner.dialect()
    }

    fn execute(&self, statement: Statement) -> BoxFuture<'_, Result<RowsAffected>> {
        (self.log)(&format!("{}: execute: {}", self.dialect(), statement));
        self.inner.execute(statement)
    }

    fn fetch(&self, statement: Statement) -> BoxStream<'_, Result<RowLabeled>> {
        (self.log)(&format!("{}: fetch: {}", self.dialect(), statement));
        self.inner.fetch(statement)
    }

    fn begin(&self) -> BoxFuture<'_, Result<Arc<dyn DriverTx>>> {
        (self.log)(&format!("{}: begin transaction", self.dialect()));
        Box::pin(async move {
            let tx = self.inner.begin().await?;
            Ok(Arc::new(DebugTx {
                inner: tx,
                log: Arc::clone(&self.log),
            }) as Arc<dyn DriverTx>)
        })
    }

    fn close(&self) -> BoxFuture<'_, Result<()>> {
        (self.log)(&format!("{}: close", self.dialect()));
        self.inner.close()
    }

    fn is_transactional(&self) -> bool {
        self.inner.is_transactional()
    }
}

struct DebugTx {
    inner: Arc<dyn DriverTx>,
    log: LogSink,
}

impl Driver for DebugTx {
    fn dialect(&self) -> &'static str {
        self.inner.dialect()
    }

    fn execute(&self, statement: Statement) -> BoxFuture<'_, Result<RowsAffected>> {
        (self.log)(&format!("{}: execute: {}", self.dialect(), statement));
        self.inner.execute(statement)
    }

    fn fetch(&self, statement: Statement) -> BoxStream<'_, Result<RowLabeled>> {
        (self.log)(&format!("{}: fetch: {}", self.dialect(), statement));
        self.inner.fetch(statement)
    }

    fn begin(&self) -> BoxFuture<'_, Result<Arc<dyn DriverTx>>> {
        self.inner.begin()
    }

    fn close(&self) -> BoxFuture<'_, Result<()>> {
        self.inner.close()
    }

    fn is_transactional(&self) -> bool {
        true
    }
}

impl DriverTx for DebugTx {
    fn commit(&self) -> BoxFuture<'_, Result<()>> {
        (self.log)(&format!("{}: commit transaction", self.dialect()));
        self.inner.commit()
    }

    fn rollback(&self) -> BoxFuture<'_, Result<()>> {
        (self.log)(&format!("{}: rollback transaction", self.dialect()));
        self.inner.rollback()
    }
}
