mod create;
mod delete;
mod query;
mod update;

pub use create::*;
pub use delete::*;
pub use query::*;
pub use update::*;

use crate::{
    Config, Driver, Error, ID_FIELD, Mutation, MutationResult, Mutator, Op, Result, RowLabeled,
    Statement, Value, chain,
};
use anyhow::anyhow;
use futures::{TryStreamExt, future::BoxFuture};
use std::sync::Arc;

/// Collect every row of a fetch into memory.
pub(crate) async fn fetch_all(
    driver: &Arc<dyn Driver>,
    statement: Statement,
) -> Result<Vec<RowLabeled>> {
    driver.fetch(statement).try_collect().await
}

/// Run a mutation through the kind's resolved hook chain. The chain is
/// resolved here, at terminal-call time, so hooks registered after builder
/// creation still apply; opaque store errors pick up kind and operation
/// context on the way out.
pub(crate) async fn run_mutation(
    config: &Config,
    mutation: Mutation,
    terminal: Arc<dyn Mutator>,
) -> Result<MutationResult> {
    let kind = mutation.kind();
    let op = mutation.op();
    let hooks = config.hooks().resolve(kind);
    let chain = chain(&hooks, terminal);
    chain
        .mutate(mutation)
        .await
        .map_err(|e| e.operation(kind, op))
}

/// Full-row column list handed back by creates and update-one.
pub(crate) fn returning_columns(mutation: &Mutation) -> Vec<&'static str> {
    let schema = mutation.schema();
    let mut columns = Vec::with_capacity(schema.len() + 1);
    columns.push(ID_FIELD);
    columns.extend(schema.iter().map(|f| f.name));
    columns
}

/// One insert row aligned with the schema field order; unset fields are
/// stored as nulls.
pub(crate) fn insert_row(mutation: &Mutation) -> Vec<Value> {
    mutation
        .schema()
        .iter()
        .map(|def| mutation.field(def.name).cloned().unwrap_or(Value::Null))
        .collect()
}

pub(crate) fn insert_statement(mutation: &Mutation, rows: Vec<Vec<Value>>) -> Statement {
    let schema = mutation.schema();
    Statement::Insert {
        table: mutation.kind(),
        columns: schema.iter().map(|f| f.name).collect(),
        rows,
        unique: schema.iter().filter(|f| f.unique).map(|f| f.name).collect(),
        returning: returning_columns(mutation),
    }
}

/// The terminal step of every hook chain: exactly one driver call per
/// mutation, uniform across entity kinds and operations.
pub(crate) struct Execute {
    config: Config,
}

impl Execute {
    pub(crate) fn new(config: Config) -> Arc<dyn Mutator> {
        Arc::new(Self { config })
    }
}

impl Mutator for Execute {
    fn mutate(&self, mutation: Mutation) -> BoxFuture<'_, Result<MutationResult>> {
        Box::pin(async move {
            let driver = self.config.driver();
            match mutation.op() {
                Op::Create => {
                    mutation.validate_create()?;
                    let statement = insert_statement(&mutation, vec![insert_row(&mutation)]);
                    let rows = fetch_all(driver, statement).await?;
                    Ok(MutationResult::Rows(rows))
                }
                Op::Update => {
                    let statement = Statement::Update {
                        table: mutation.kind(),
                        sets: mutation.fields().to_vec(),
                        predicate: mutation.combined_predicate(),
                        returning: Vec::new(),
                    };
                    let affected = driver.execute(statement).await?;
                    Ok(MutationResult::Affected(affected.rows_affected))
                }
                Op::UpdateOne => {
                    if mutation.id().is_none() {
                        return Err(Error::Store(anyhow!(
                            "update-one mutation is missing its identifier"
                        )));
                    }
                    let statement = Statement::Update {
                        table: mutation.kind(),
                        sets: mutation.fields().to_vec(),
                        predicate: mutation.combined_predicate(),
                        returning: returning_columns(&mutation),
                    };
                    let rows = fetch_all(driver, statement).await?;
                    if rows.is_empty() {
                        return Err(Error::NotFound {
                            kind: mutation.kind(),
                        });
                    }
                    Ok(MutationResult::Rows(rows))
                }
                Op::Delete | Op::DeleteOne => {
                    let statement = Statement::Delete {
                        table: mutation.kind(),
                        predicate: mutation.combined_predicate(),
                    };
                    let affected = driver.execute(statement).await?;
                    if mutation.op() == Op::DeleteOne && affected.rows_affected == 0 {
                        return Err(Error::NotFound {
                            kind: mutation.kind(),
                        });
                    }
                    Ok(MutationResult::Affected(affected.rows_affected))
                }
            }
        })
    }
}
