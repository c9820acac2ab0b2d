use silo_core::{
    EntityId, Error, ID_FIELD, Order, OrderBy, Predicate, Result, RowLabeled, RowNames,
    RowsAffected, Statement, Value,
};
use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

/// One table: monotonically growing identifiers and rows keyed by them.
/// Keeping rows in a `BTreeMap` gives stable identifier order when a select
/// has no explicit ordering.
#[derive(Default, Debug, Clone)]
pub(crate) struct Table {
    pub(crate) next_id: EntityId,
    pub(crate) rows: BTreeMap<EntityId, HashMap<String, Value>>,
}

pub(crate) type Tables = HashMap<String, Table>;

/// Run a modify statement against the tables.
pub(crate) fn execute(tables: &mut Tables, statement: &Statement) -> Result<RowsAffected> {
    match statement {
        Statement::Insert {
            table,
            columns,
            rows,
            unique,
            ..
        } => {
            let ids = insert(tables, table, columns, rows, unique)?;
            Ok(RowsAffected {
                rows_affected: ids.len() as u64,
                last_affected_id: ids.last().copied(),
            })
        }
        Statement::Update {
            table,
            sets,
            predicate,
            ..
        } => {
            let ids = update(tables, table, sets, predicate);
            Ok(RowsAffected {
                rows_affected: ids.len() as u64,
                last_affected_id: ids.last().copied(),
            })
        }
        Statement::Delete { table, predicate } => {
            let count = delete(tables, table, predicate);
            Ok(RowsAffected {
                rows_affected: count,
                last_affected_id: None,
            })
        }
        Statement::Select { .. } => Err(Error::Store(anyhow::anyhow!(
            "select statements must be fetched, not executed"
        ))),
    }
}

/// Run a row-producing statement against the tables.
pub(crate) fn fetch(tables: &mut Tables, statement: &Statement) -> Result<Vec<RowLabeled>> {
    match statement {
        Statement::Insert {
            table,
            columns,
            rows,
            unique,
            returning,
        } => {
            let ids = insert(tables, table, columns, rows, unique)?;
            Ok(project_ids(tables, table, &ids, returning))
        }
        Statement::Update {
            table,
            sets,
            predicate,
            returning,
        } => {
            let ids = update(tables, table, sets, predicate);
            Ok(project_ids(tables, table, &ids, returning))
        }
        Statement::Delete { .. } => Err(Error::Store(anyhow::anyhow!(
            "delete statements produce no rows"
        ))),
        Statement::Select {
            table,
            columns,
            predicate,
            order,
            limit,
            offset,
            count,
        } => Ok(select(
            tables, table, columns, predicate, order, *limit, *offset, *count,
        )),
    }
}

/// Insert rows, enforcing unique columns across the existing table and the
/// batch itself before anything is written, so a violation leaves the table
/// untouched.
fn insert(
    tables: &mut Tables,
    table: &str,
    columns: &[&'static str],
    rows: &[Vec<Value>],
    unique: &[&'static str],
) -> Result<Vec<EntityId>> {
    let entry = tables.entry(table.to_string()).or_default();
    let mut pending: Vec<HashMap<String, Value>> = Vec::with_capacity(rows.len());
    for row in rows {
        let mut map = HashMap::with_capacity(columns.len() + 1);
        for (column, value) in columns.iter().zip(row) {
            map.insert((*column).to_string(), value.clone());
        }
        for column in unique {
            let value = map.get(*column).cloned().unwrap_or(Value::Null);
            if value.is_null() {
                continue;
            }
            let clash = entry
                .rows
                .values()
                .chain(pending.iter())
                .any(|existing| existing.get(*column) == Some(&value));
            if clash {
                return Err(Error::ConstraintViolation {
                    table: table.to_string(),
                    column: (*column).to_string(),
                });
            }
        }
        pending.push(map);
    }
    let mut ids = Vec::with_capacity(pending.len());
    for mut map in pending {
        entry.next_id += 1;
        let id = entry.next_id;
        map.insert(ID_FIELD.to_string(), Value::Int64(Some(id)));
        entry.rows.insert(id, map);
        ids.push(id);
    }
    Ok(ids)
}

fn update(
    tables: &mut Tables,
    table: &str,
    sets: &[(&'static str, Value)],
    predicate: &Option<Predicate>,
) -> Vec<EntityId> {
    let Some(entry) = tables.get_mut(table) else {
        return Vec::new();
    };
    let mut touched = Vec::new();
    for (id, row) in entry.rows.iter_mut() {
        if !matches(predicate, row) {
            continue;
        }
        for (column, value) in sets {
            row.insert((*column).to_string(), value.clone());
        }
        touched.push(*id);
    }
    touched
}

fn delete(tables: &mut Tables, table: &str, predicate: &Option<Predicate>) -> u64 {
    let Some(entry) = tables.get_mut(table) else {
        return 0;
    };
    let doomed: Vec<EntityId> = entry
        .rows
        .iter()
        .filter(|(_, row)| matches(predicate, row))
        .map(|(id, _)| *id)
        .collect();
    for id in &doomed {
        entry.rows.remove(id);
    }
    doomed.len() as u64
}

#[allow(clippy::too_many_arguments)]
fn select(
    tables: &Tables,
    table: &str,
    columns: &[&'static str],
    predicate: &Option<Predicate>,
    order: &[OrderBy],
    limit: Option<u32>,
    offset: Option<u32>,
    count: bool,
) -> Vec<RowLabeled> {
    let mut matching: Vec<&HashMap<String, Value>> = match tables.get(table) {
        Some(entry) => entry
            .rows
            .values()
            .filter(|row| matches(predicate, row))
            .collect(),
        None => Vec::new(),
    };
    for term in order.iter().rev() {
        matching.sort_by(|l, r| {
            let l = l.get(term.field).cloned().unwrap_or(Value::Null);
            let r = r.get(term.field).cloned().unwrap_or(Value::Null);
            let ordering = l.compare(&r).unwrap_or(Ordering::Equal);
            match term.order {
                Order::Asc => ordering,
                Order::Desc => ordering.reverse(),
            }
        });
    }
    if count {
        let labels: RowNames = Arc::from(vec!["count".to_string()]);
        let values = vec![Value::Int64(Some(matching.len() as i64))].into_boxed_slice();
        return vec![RowLabeled::new(labels, values)];
    }
    let offset = offset.unwrap_or(0) as usize;
    let limit = limit.map(|v| v as usize).unwrap_or(usize::MAX);
    let labels: RowNames = Arc::from(
        columns
            .iter()
            .map(|c| (*c).to_string())
            .collect::<Vec<_>>(),
    );
    matching
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(|row| project(row, columns, &labels))
        .collect()
}

/// Rows for the given identifiers, in identifier order, projected onto the
/// returning columns.
fn project_ids(
    tables: &Tables,
    table: &str,
    ids: &[EntityId],
    returning: &[&'static str],
) -> Vec<RowLabeled> {
    let Some(entry) = tables.get(table) else {
        return Vec::new();
    };
    let labels: RowNames = Arc::from(
        returning
            .iter()
            .map(|c| (*c).to_string())
            .collect::<Vec<_>>(),
    );
    ids.iter()
        .filter_map(|id| entry.rows.get(id))
        .map(|row| project(row, returning, &labels))
        .collect()
}

fn project(
    row: &HashMap<String, Value>,
    columns: &[&'static str],
    labels: &RowNames,
) -> RowLabeled {
    let values = columns
        .iter()
        .map(|column| row.get(*column).cloned().unwrap_or(Value::Null))
        .collect();
    RowLabeled::new(Arc::clone(labels), values)
}

fn matches(predicate: &Option<Predicate>, row: &HashMap<String, Value>) -> bool {
    match predicate {
        Some(predicate) => eval(predicate, row),
        None => true,
    }
}

/// Evaluate a predicate against one row. Comparisons against null are
/// false, as in SQL; only the explicit null checks observe nulls.
fn eval(predicate: &Predicate, row: &HashMap<String, Value>) -> bool {
    let field = |name: &str| row.get(name).cloned().unwrap_or(Value::Null);
    let compare = |name: &str, value: &Value| -> Option<Ordering> {
        let stored = field(name);
        if stored.is_null() || value.is_null() {
            return None;
        }
        stored.compare(value)
    };
    match predicate {
        Predicate::Eq(name, value) => compare(name, value) == Some(Ordering::Equal),
        Predicate::Ne(name, value) => {
            matches!(compare(name, value), Some(o) if o != Ordering::Equal)
        }
        Predicate::Gt(name, value) => compare(name, value) == Some(Ordering::Greater),
        Predicate::Ge(name, value) => {
            matches!(compare(name, value), Some(Ordering::Greater | Ordering::Equal))
        }
        Predicate::Lt(name, value) => compare(name, value) == Some(Ordering::Less),
        Predicate::Le(name, value) => {
            matches!(compare(name, value), Some(Ordering::Less | Ordering::Equal))
        }
        Predicate::In(name, values) => values
            .iter()
            .any(|value| compare(name, value) == Some(Ordering::Equal)),
        Predicate::IsNull(name) => field(name).is_null(),
        Predicate::NotNull(name) => !field(name).is_null(),
        Predicate::And(items) => items.iter().all(|p| eval(p, row)),
        Predicate::Or(items) => items.iter().any(|p| eval(p, row)),
        Predicate::Not(inner) => !eval(inner, row),
    }
}
