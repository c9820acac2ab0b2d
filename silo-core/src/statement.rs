use crate::{OrderBy, Predicate, Value};
use std::fmt;

/// The structured unit of work the layer hands a storage driver.
///
/// Rendering a statement into dialect SQL (or interpreting it directly) is
/// entirely the driver's concern; the layer never sees statement text.
#[derive(Debug, Clone)]
pub enum Statement {
    Insert {
        table: &'static str,
        /// Column order of every row in `rows`.
        columns: Vec<&'static str>,
        rows: Vec<Vec<Value>>,
        /// Columns the store must keep unique within the table.
        unique: Vec<&'static str>,
        /// Columns of the created rows to hand back, identifiers included.
        returning: Vec<&'static str>,
    },
    Update {
        table: &'static str,
        sets: Vec<(&'static str, Value)>,
        predicate: Option<Predicate>,
        /// When non-empty, the driver returns the updated rows instead of a
        /// bare affected count.
        returning: Vec<&'static str>,
    },
    Delete {
        table: &'static str,
        predicate: Option<Predicate>,
    },
    Select {
        table: &'static str,
        columns: Vec<&'static str>,
        predicate: Option<Predicate>,
        order: Vec<OrderBy>,
        limit: Option<u32>,
        offset: Option<u32>,
        /// Return a single `count` column instead of entity rows.
        count: bool,
    },
}

impl Statement {
    pub fn table(&self) -> &'static str {
        match self {
            Self::Insert { table, .. }
            | Self::Update { table, .. }
            | Self::Delete { table, .. }
            | Self::Select { table, .. } => table,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn predicate(f: &mut fmt::Formatter<'_>, p: &Option<Predicate>) -> fmt::Result {
            match p {
                Some(p) => write!(f, " where {}", p),
                None => Ok(()),
            }
        }
        match self {
            Self::Insert { table, rows, .. } => {
                write!(f, "insert {} ({} rows)", table, rows.len())
            }
            Self::Update {
                table,
                sets,
                predicate: p,
                ..
            } => {
                write!(f, "update {} set ", table)?;
                for (i, (name, value)) in sets.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} = {}", name, value)?;
                }
                predicate(f, p)
            }
            Self::Delete {
                table,
                predicate: p,
            } => {
                write!(f, "delete {}", table)?;
                predicate(f, p)
            }
            Self::Select {
                table,
                predicate: p,
                limit,
                offset,
                count,
                ..
            } => {
                if *count {
                    write!(f, "count {}", table)?;
                } else {
                    write!(f, "select {}", table)?;
                }
                predicate(f, p)?;
                if let Some(limit) = limit {
                    write!(f, " limit {}", limit)?;
                }
                if let Some(offset) = offset {
                    write!(f, " offset {}", offset)?;
                }
                Ok(())
            }
        }
    }
}
