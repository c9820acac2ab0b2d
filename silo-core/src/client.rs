use crate::{
    Config, CreateBuilder, CreateBulkBuilder, DebugDriver, DeleteBuilder, DeleteOneBuilder, Driver,
    EntityId, EntityKind, Error, Hook, LogSink, Predicate, QueryBuilder, Result, Tx, TxDriver,
    UpdateBuilder, UpdateOneBuilder,
};
use std::{marker::PhantomData, sync::Arc};

/// Single entry point to the entity layer.
///
/// A client owns a config snapshot (driver, debug flag, log sink, shared
/// hook registry) and hands out per-kind [`EntityClient`] facades. Clients
/// are cheap to clone; clones share the driver and hook registry.
#[derive(Clone)]
pub struct Client {
    pub(crate) config: Config,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    /// Construct a client over an already-connected driver.
    pub fn new(driver: impl Driver) -> Self {
        Self {
            config: Config::new(Arc::new(driver)),
        }
    }

    /// Construct a client from an existing config; used by facades that
    /// rebind the driver (transactions, debug).
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Replace the log sink statements are traced to in debug mode.
    pub fn with_log(mut self, log: LogSink) -> Self {
        self.config.log = log;
        self
    }

    /// Entity client for one kind.
    pub fn kind<E: EntityKind>(&self) -> EntityClient<E> {
        EntityClient::new(self.config.clone())
    }

    /// Begin a transaction and return a client facade bound to it.
    ///
    /// Fails with [`Error::NestedTransaction`] without touching the store
    /// when this client is already transactional.
    pub async fn tx(&self) -> Result<Tx> {
        if self.config.driver.is_transactional() {
            return Err(Error::NestedTransaction);
        }
        let tx = self.config.driver.begin().await?;
        let driver = Arc::new(TxDriver::new(tx));
        let mut config = self.config.clone();
        config.driver = Arc::clone(&driver) as Arc<dyn Driver>;
        Ok(Tx { config, driver })
    }

    /// A client logging every statement through the log sink before it
    /// reaches the driver. Idempotent: a debug client returns itself.
    pub fn debug(&self) -> Client {
        if self.config.debug {
            return self.clone();
        }
        let mut config = self.config.clone();
        config.debug = true;
        config.driver = Arc::new(DebugDriver::new(
            Arc::clone(&self.config.driver),
            Arc::clone(&self.config.log),
        ));
        Self { config }
    }

    /// Close the underlying driver. Later operations through this client
    /// fail rather than silently doing nothing.
    pub async fn close(&self) -> Result<()> {
        self.config.driver.close().await
    }

    /// Register a mutation hook applying to every entity kind, appended in
    /// call order. Shared with every transaction and debug facade derived
    /// from this client, before or after registration.
    pub fn use_hook(&self, hook: Hook) {
        self.config.hooks.append_global(hook);
    }

    pub fn use_hooks(&self, hooks: impl IntoIterator<Item = Hook>) {
        for hook in hooks {
            self.use_hook(hook);
        }
    }
}

/// Per-kind facade: factory for builders scoped to one entity kind.
pub struct EntityClient<E: EntityKind> {
    pub(crate) config: Config,
    pub(crate) marker: PhantomData<E>,
}

impl<E: EntityKind> EntityClient<E> {
    pub(crate) fn new(config: Config) -> Self {
        Self {
            config,
            marker: PhantomData,
        }
    }

    /// Register a mutation hook scoped to this kind only.
    pub fn use_hook(&self, hook: Hook) {
        self.config.hooks.append_kind(E::KIND, hook);
    }

    pub fn create(&self) -> CreateBuilder<E> {
        CreateBuilder::new(self.config.clone())
    }

    pub fn create_bulk(
        &self,
        builders: impl IntoIterator<Item = CreateBuilder<E>>,
    ) -> CreateBulkBuilder<E> {
        CreateBulkBuilder::new(self.config.clone(), builders.into_iter().collect())
    }

    pub fn update(&self) -> UpdateBuilder<E> {
        UpdateBuilder::new(self.config.clone())
    }

    /// Update builder for the given in-process entity snapshot.
    pub fn update_one(&self, entity: &E) -> UpdateOneBuilder<E> {
        self.update_one_id(entity.id())
    }

    pub fn update_one_id(&self, id: EntityId) -> UpdateOneBuilder<E> {
        UpdateOneBuilder::new(self.config.clone(), id)
    }

    pub fn delete(&self) -> DeleteBuilder<E> {
        DeleteBuilder::new(self.config.clone())
    }

    /// Delete builder for the given in-process entity snapshot.
    pub fn delete_one(&self, entity: &E) -> DeleteOneBuilder<E> {
        self.delete_one_id(entity.id())
    }

    pub fn delete_one_id(&self, id: EntityId) -> DeleteOneBuilder<E> {
        DeleteOneBuilder::new(self.config.clone(), id)
    }

    pub fn query(&self) -> QueryBuilder<E> {
        QueryBuilder::new(self.config.clone())
    }

    /// The entity with the given identifier.
    pub async fn get(&self, id: EntityId) -> Result<E> {
        self.query().filter(Predicate::id(id)).only().await
    }

    /// Like [`EntityClient::get`] but panics instead of returning an error;
    /// for call sites that have already established the identifier exists.
    pub async fn get_x(&self, id: EntityId) -> E {
        match self.get(id).await {
            Ok(entity) => entity,
            Err(e) => panic!("{}", e),
        }
    }
}
