use crate::{
    Config, EntityId, EntityKind, Error, Mutation, MutationResult, Op, Predicate, Result, Value,
    builder::{Execute, run_mutation},
};
use anyhow::anyhow;
use std::marker::PhantomData;

/// Builder for a bulk update constrained by predicates.
pub struct UpdateBuilder<E: EntityKind> {
    pub(crate) config: Config,
    pub(crate) mutation: Mutation,
    pub(crate) marker: PhantomData<E>,
}

impl<E: EntityKind> UpdateBuilder<E> {
    pub(crate) fn new(config: Config) -> Self {
        Self {
            config,
            mutation: Mutation::new::<E>(Op::Update),
            marker: PhantomData,
        }
    }

    /// Restrict which entities the update touches; repeated filters AND.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.mutation.add_predicate(predicate);
        self
    }

    pub fn set(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.mutation.set_field(field, value);
        self
    }

    /// Execute and return the number of entities updated.
    pub async fn save(self) -> Result<u64> {
        let result = run_mutation(&self.config, self.mutation, Execute::new(self.config.clone()))
            .await?;
        match result {
            MutationResult::Affected(count) => Ok(count),
            MutationResult::Rows(rows) => Ok(rows.len() as u64),
        }
    }

    /// Like [`UpdateBuilder::save`] but panics instead of returning an
    /// error.
    pub async fn save_x(self) -> u64 {
        match self.save().await {
            Ok(count) => count,
            Err(e) => panic!("{}", e),
        }
    }

    pub async fn exec(self) -> Result<()> {
        self.save().await.map(|_| ())
    }
}

/// Builder updating exactly one entity by identifier.
pub struct UpdateOneBuilder<E: EntityKind> {
    pub(crate) config: Config,
    pub(crate) mutation: Mutation,
    pub(crate) marker: PhantomData<E>,
}

impl<E: EntityKind> UpdateOneBuilder<E> {
    pub(crate) fn new(config: Config, id: EntityId) -> Self {
        let mut mutation = Mutation::new::<E>(Op::UpdateOne);
        mutation.set_id(id);
        Self {
            config,
            mutation,
            marker: PhantomData,
        }
    }

    pub fn set(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.mutation.set_field(field, value);
        self
    }

    /// Execute and return the updated entity; fails with a not-found error
    /// when the identifier does not exist.
    pub async fn save(self) -> Result<E> {
        let result = run_mutation(&self.config, self.mutation, Execute::new(self.config.clone()))
            .await?;
        match result {
            MutationResult::Rows(rows) if !rows.is_empty() => E::from_row(&rows[0]),
            MutationResult::Rows(_) => Err(Error::NotFound { kind: E::KIND }),
            MutationResult::Affected(_) => Err(Error::Store(anyhow!(
                "update-one of {} produced no entity",
                E::KIND
            ))),
        }
    }

    /// Like [`UpdateOneBuilder::save`] but panics instead of returning an
    /// error.
    pub async fn save_x(self) -> E {
        match self.save().await {
            Ok(entity) => entity,
            Err(e) => panic!("{}", e),
        }
    }

    pub async fn exec(self) -> Result<()> {
        self.save().await.map(|_| ())
    }
}
