use crate::{EntityId, ID_FIELD, Value};
use std::fmt;

/// A filter condition over entity fields.
///
/// Predicates are plain data: the layer composes them, drivers evaluate or
/// render them. Builders AND together every predicate they accumulate.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(&'static str, Value),
    Ne(&'static str, Value),
    Gt(&'static str, Value),
    Ge(&'static str, Value),
    Lt(&'static str, Value),
    Le(&'static str, Value),
    In(&'static str, Vec<Value>),
    IsNull(&'static str),
    NotNull(&'static str),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn eq(field: &'static str, value: impl Into<Value>) -> Self {
        Self::Eq(field, value.into())
    }

    pub fn ne(field: &'static str, value: impl Into<Value>) -> Self {
        Self::Ne(field, value.into())
    }

    pub fn gt(field: &'static str, value: impl Into<Value>) -> Self {
        Self::Gt(field, value.into())
    }

    pub fn ge(field: &'static str, value: impl Into<Value>) -> Self {
        Self::Ge(field, value.into())
    }

    pub fn lt(field: &'static str, value: impl Into<Value>) -> Self {
        Self::Lt(field, value.into())
    }

    pub fn le(field: &'static str, value: impl Into<Value>) -> Self {
        Self::Le(field, value.into())
    }

    pub fn is_in(field: &'static str, values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self::In(field, values.into_iter().map(Into::into).collect())
    }

    pub fn is_null(field: &'static str) -> Self {
        Self::IsNull(field)
    }

    pub fn not_null(field: &'static str) -> Self {
        Self::NotNull(field)
    }

    /// Identifier equality.
    pub fn id(id: EntityId) -> Self {
        Self::Eq(ID_FIELD, Value::Int64(Some(id)))
    }

    /// Identifier membership.
    pub fn id_in(ids: impl IntoIterator<Item = EntityId>) -> Self {
        Self::In(
            ID_FIELD,
            ids.into_iter().map(|id| Value::Int64(Some(id))).collect(),
        )
    }

    /// Conjunction, collapsing the trivial cases.
    pub fn and(predicates: Vec<Predicate>) -> Option<Self> {
        let mut predicates = predicates;
        match predicates.len() {
            0 => None,
            1 => predicates.pop(),
            _ => Some(Self::And(predicates)),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, items: &[Predicate], sep: &str) -> fmt::Result {
            for (i, p) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, "{}", sep)?;
                }
                write!(f, "({})", p)?;
            }
            Ok(())
        }
        match self {
            Self::Eq(field, v) => write!(f, "{} = {}", field, v),
            Self::Ne(field, v) => write!(f, "{} != {}", field, v),
            Self::Gt(field, v) => write!(f, "{} > {}", field, v),
            Self::Ge(field, v) => write!(f, "{} >= {}", field, v),
            Self::Lt(field, v) => write!(f, "{} < {}", field, v),
            Self::Le(field, v) => write!(f, "{} <= {}", field, v),
            Self::In(field, values) => {
                write!(f, "{} in [", field)?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Self::IsNull(field) => write!(f, "{} is null", field),
            Self::NotNull(field) => write!(f, "{} is not null", field),
            Self::And(items) => list(f, items, " and "),
            Self::Or(items) => list(f, items, " or "),
            Self::Not(inner) => write!(f, "not ({})", inner),
        }
    }
}

/// Sort direction for query ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

/// One ordering term of a query.
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub field: &'static str,
    pub order: Order,
}
