use crate::{
    Config, EntityKind, Error, Mutation, MutationResult, Op, Result, Value,
    builder::{Execute, fetch_all, insert_row, insert_statement, run_mutation},
    mutate_fn,
};
use anyhow::anyhow;
use std::{
    marker::PhantomData,
    sync::{Arc, Mutex},
};

/// Builder for creating one entity.
///
/// Fluent setters accumulate the field set; nothing touches the store until
/// [`CreateBuilder::save`] runs the mutation through the hook chain.
pub struct CreateBuilder<E: EntityKind> {
    pub(crate) config: Config,
    pub(crate) mutation: Mutation,
    pub(crate) marker: PhantomData<E>,
}

impl<E: EntityKind> CreateBuilder<E> {
    pub(crate) fn new(config: Config) -> Self {
        Self {
            config,
            mutation: Mutation::new::<E>(Op::Create),
            marker: PhantomData,
        }
    }

    /// Set a field of the entity under creation.
    pub fn set(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.mutation.set_field(field, value);
        self
    }

    /// Validate the field set, run the hook chain and return the created
    /// entity, its generated identifier included.
    pub async fn save(self) -> Result<E> {
        let result = run_mutation(&self.config, self.mutation, Execute::new(self.config.clone()))
            .await?;
        entity_from_result(result)
    }

    /// Like [`CreateBuilder::save`] but panics instead of returning an
    /// error; for call sites that have already established the create must
    /// succeed.
    pub async fn save_x(self) -> E {
        match self.save().await {
            Ok(entity) => entity,
            Err(e) => panic!("{}", e),
        }
    }

    /// Save, discarding the created entity.
    pub async fn exec(self) -> Result<()> {
        self.save().await.map(|_| ())
    }
}

fn entity_from_result<E: EntityKind>(result: MutationResult) -> Result<E> {
    match result {
        MutationResult::Rows(rows) if !rows.is_empty() => E::from_row(&rows[0]),
        _ => Err(Error::Store(anyhow!(
            "create of {} produced no entity",
            E::KIND
        ))),
    }
}

/// Builder executing several creates as one batch insert.
///
/// Every child mutation passes through the hook chain first (a vetoing hook
/// aborts the whole batch before any store access), then a single insert
/// statement creates all rows; entities come back in input order. Atomicity
/// beyond that one statement is the enclosing transaction's concern.
pub struct CreateBulkBuilder<E: EntityKind> {
    pub(crate) config: Config,
    pub(crate) builders: Vec<CreateBuilder<E>>,
}

impl<E: EntityKind> CreateBulkBuilder<E> {
    pub(crate) fn new(config: Config, builders: Vec<CreateBuilder<E>>) -> Self {
        Self { config, builders }
    }

    pub async fn save(self) -> Result<Vec<E>> {
        if self.builders.is_empty() {
            return Ok(Vec::new());
        }
        let batch: Arc<Mutex<Vec<Vec<Value>>>> = Arc::default();
        let collector = {
            let batch = Arc::clone(&batch);
            mutate_fn(move |mutation| {
                let batch = Arc::clone(&batch);
                Box::pin(async move {
                    mutation.validate_create()?;
                    batch
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .push(insert_row(&mutation));
                    Ok(MutationResult::Affected(0))
                })
            })
        };
        let template = Mutation::new::<E>(Op::Create);
        for builder in self.builders {
            run_mutation(&self.config, builder.mutation, Arc::clone(&collector)).await?;
        }
        let rows = std::mem::take(&mut *batch.lock().unwrap_or_else(|e| e.into_inner()));
        if rows.is_empty() {
            // Every child was short-circuited away by a hook.
            return Ok(Vec::new());
        }
        let statement = insert_statement(&template, rows);
        let created = fetch_all(self.config.driver(), statement)
            .await
            .map_err(|e| e.operation(E::KIND, Op::Create))?;
        created.iter().map(E::from_row).collect()
    }

    /// Like [`CreateBulkBuilder::save`] but panics instead of returning an
    /// error.
    pub async fn save_x(self) -> Vec<E> {
        match self.save().await {
            Ok(entities) => entities,
            Err(e) => panic!("{}", e),
        }
    }

    pub async fn exec(self) -> Result<()> {
        self.save().await.map(|_| ())
    }
}
