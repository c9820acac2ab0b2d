use crate::{
    Config, EntityKind, Error, ID_FIELD, Order, OrderBy, Predicate, Result, RowLabeled, Statement,
    builder::fetch_all,
};
use anyhow::anyhow;
use std::marker::PhantomData;

/// Builder accumulating predicates, ordering and pagination for a read.
///
/// Reads do not pass through mutation hooks; the terminal methods issue a
/// single select against the config's driver.
pub struct QueryBuilder<E: EntityKind> {
    pub(crate) config: Config,
    pub(crate) predicates: Vec<Predicate>,
    pub(crate) order: Vec<OrderBy>,
    pub(crate) limit: Option<u32>,
    pub(crate) offset: Option<u32>,
    pub(crate) marker: PhantomData<E>,
}

impl<E: EntityKind> QueryBuilder<E> {
    pub(crate) fn new(config: Config) -> Self {
        Self {
            config,
            predicates: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
            marker: PhantomData,
        }
    }

    /// Restrict the result set; repeated filters AND.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn order_by(mut self, field: &'static str, order: Order) -> Self {
        self.order.push(OrderBy { field, order });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    fn statement(&self, limit: Option<u32>, count: bool) -> Statement {
        let mut columns = Vec::with_capacity(E::fields().len() + 1);
        columns.push(ID_FIELD);
        columns.extend(E::fields().iter().map(|f| f.name));
        Statement::Select {
            table: E::KIND,
            columns,
            predicate: Predicate::and(self.predicates.clone()),
            order: self.order.clone(),
            limit: limit.or(self.limit),
            offset: self.offset,
            count,
        }
    }

    async fn rows(&self, limit: Option<u32>) -> Result<Vec<RowLabeled>> {
        fetch_all(self.config.driver(), self.statement(limit, false))
            .await
            .map_err(|e| e.query(E::KIND))
    }

    /// All matching entities, possibly empty, in store order unless an
    /// explicit ordering was set.
    pub async fn all(self) -> Result<Vec<E>> {
        self.rows(None).await?.iter().map(E::from_row).collect()
    }

    /// First matching entity; fails with a not-found error on an empty
    /// result.
    pub async fn first(self) -> Result<E> {
        let rows = self.rows(Some(1)).await?;
        match rows.first() {
            Some(row) => E::from_row(row),
            None => Err(Error::NotFound { kind: E::KIND }),
        }
    }

    /// The single matching entity; fails with not-found on zero matches and
    /// not-singular on more than one.
    pub async fn only(self) -> Result<E> {
        let rows = self.rows(Some(2)).await?;
        match rows.len() {
            0 => Err(Error::NotFound { kind: E::KIND }),
            1 => E::from_row(&rows[0]),
            _ => Err(Error::NotSingular { kind: E::KIND }),
        }
    }

    /// Number of matching entities, irrespective of ordering.
    pub async fn count(self) -> Result<u64> {
        let rows = fetch_all(self.config.driver(), self.statement(None, true))
            .await
            .map_err(|e| e.query(E::KIND))?;
        let row = rows
            .first()
            .ok_or_else(|| anyhow!("count of {} returned no row", E::KIND))?;
        let count: i64 = row.decode("count")?;
        Ok(count as u64)
    }

    /// Whether at least one entity matches.
    pub async fn exist(self) -> Result<bool> {
        Ok(!self.rows(Some(1)).await?.is_empty())
    }

    /// Like [`QueryBuilder::all`] but panics instead of returning an error.
    pub async fn all_x(self) -> Vec<E> {
        match self.all().await {
            Ok(entities) => entities,
            Err(e) => panic!("{}", e),
        }
    }

    /// Like [`QueryBuilder::first`] but panics instead of returning an
    /// error.
    pub async fn first_x(self) -> E {
        match self.first().await {
            Ok(entity) => entity,
            Err(e) => panic!("{}", e),
        }
    }

    /// Like [`QueryBuilder::only`] but panics instead of returning an
    /// error.
    pub async fn only_x(self) -> E {
        match self.only().await {
            Ok(entity) => entity,
            Err(e) => panic!("{}", e),
        }
    }
}
