use crate::{
    Config, EntityId, EntityKind, Mutation, MutationResult, Op, Predicate, Result,
    builder::{Execute, run_mutation},
};
use std::marker::PhantomData;

/// Builder for a bulk delete constrained by predicates.
pub struct DeleteBuilder<E: EntityKind> {
    pub(crate) config: Config,
    pub(crate) mutation: Mutation,
    pub(crate) marker: PhantomData<E>,
}

impl<E: EntityKind> DeleteBuilder<E> {
    pub(crate) fn new(config: Config) -> Self {
        Self {
            config,
            mutation: Mutation::new::<E>(Op::Delete),
            marker: PhantomData,
        }
    }

    /// Restrict which entities the delete removes; repeated filters AND.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.mutation.add_predicate(predicate);
        self
    }

    /// Execute and return the number of entities removed.
    pub async fn exec(self) -> Result<u64> {
        let result = run_mutation(&self.config, self.mutation, Execute::new(self.config.clone()))
            .await?;
        match result {
            MutationResult::Affected(count) => Ok(count),
            MutationResult::Rows(rows) => Ok(rows.len() as u64),
        }
    }

    /// Like [`DeleteBuilder::exec`] but panics instead of returning an
    /// error.
    pub async fn exec_x(self) -> u64 {
        match self.exec().await {
            Ok(count) => count,
            Err(e) => panic!("{}", e),
        }
    }
}

/// Builder deleting exactly one entity by identifier.
pub struct DeleteOneBuilder<E: EntityKind> {
    pub(crate) config: Config,
    pub(crate) mutation: Mutation,
    pub(crate) marker: PhantomData<E>,
}

impl<E: EntityKind> DeleteOneBuilder<E> {
    pub(crate) fn new(config: Config, id: EntityId) -> Self {
        let mut mutation = Mutation::new::<E>(Op::DeleteOne);
        mutation.set_id(id);
        Self {
            config,
            mutation,
            marker: PhantomData,
        }
    }

    /// Execute; fails with a not-found error when the identifier does not
    /// exist.
    pub async fn exec(self) -> Result<()> {
        run_mutation(&self.config, self.mutation, Execute::new(self.config.clone()))
            .await
            .map(|_| ())
    }

    /// Like [`DeleteOneBuilder::exec`] but panics instead of returning an
    /// error.
    pub async fn exec_x(self) {
        if let Err(e) = self.exec().await {
            panic!("{}", e);
        }
    }
}
