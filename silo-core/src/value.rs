use crate::{Error, Result};
use anyhow::anyhow;
use rust_decimal::Decimal;
use std::{cmp::Ordering, fmt};
use time::OffsetDateTime;
use uuid::Uuid;

/// Dynamic field value.
///
/// Typed variants wrap an `Option` so a column keeps its declared type even
/// when it holds no data; the bare [`Value::Null`] is the untyped null used
/// before a value is bound to a schema field.
#[derive(Default, Debug, Clone)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int64(Option<i64>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    Timestamp(Option<OffsetDateTime>),
    Uuid(Option<Uuid>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Int64(l), Self::Int64(r)) => l == r,
            (Self::Float64(l), Self::Float64(r)) => l == r,
            (Self::Decimal(l), Self::Decimal(r)) => l == r,
            (Self::Varchar(l), Self::Varchar(r)) => l == r,
            (Self::Blob(l), Self::Blob(r)) => l == r,
            (Self::Timestamp(l), Self::Timestamp(r)) => l == r,
            (Self::Uuid(l), Self::Uuid(r)) => l == r,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

impl Value {
    /// Whether two values belong to the same column type, regardless of
    /// whether either currently holds data.
    pub fn same_type(&self, other: &Self) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }

    /// Null either way: the untyped null or a typed variant holding `None`.
    pub fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Boolean(v) => v.is_none(),
            Self::Int64(v) => v.is_none(),
            Self::Float64(v) => v.is_none(),
            Self::Decimal(v) => v.is_none(),
            Self::Varchar(v) => v.is_none(),
            Self::Blob(v) => v.is_none(),
            Self::Timestamp(v) => v.is_none(),
            Self::Uuid(v) => v.is_none(),
        }
    }

    /// Type name used in validation and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(..) => "boolean",
            Self::Int64(..) => "int64",
            Self::Float64(..) => "float64",
            Self::Decimal(..) => "decimal",
            Self::Varchar(..) => "varchar",
            Self::Blob(..) => "blob",
            Self::Timestamp(..) => "timestamp",
            Self::Uuid(..) => "uuid",
        }
    }

    /// Ordering between two values of the same type. Nulls sort before any
    /// data; values of mismatched types do not compare.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        fn nulls_first<T>(l: &Option<T>, r: &Option<T>, cmp: impl Fn(&T, &T) -> Option<Ordering>) -> Option<Ordering> {
            match (l, r) {
                (None, None) => Some(Ordering::Equal),
                (None, Some(_)) => Some(Ordering::Less),
                (Some(_), None) => Some(Ordering::Greater),
                (Some(l), Some(r)) => cmp(l, r),
            }
        }
        match (self, other) {
            (Self::Null, Self::Null) => Some(Ordering::Equal),
            (Self::Null, v) if v.is_null() => Some(Ordering::Equal),
            (v, Self::Null) if v.is_null() => Some(Ordering::Equal),
            (Self::Null, _) => Some(Ordering::Less),
            (_, Self::Null) => Some(Ordering::Greater),
            (Self::Boolean(l), Self::Boolean(r)) => nulls_first(l, r, |l, r| l.partial_cmp(r)),
            (Self::Int64(l), Self::Int64(r)) => nulls_first(l, r, |l, r| l.partial_cmp(r)),
            (Self::Float64(l), Self::Float64(r)) => nulls_first(l, r, |l, r| l.partial_cmp(r)),
            (Self::Decimal(l), Self::Decimal(r)) => nulls_first(l, r, |l, r| l.partial_cmp(r)),
            (Self::Varchar(l), Self::Varchar(r)) => nulls_first(l, r, |l, r| l.partial_cmp(r)),
            (Self::Blob(l), Self::Blob(r)) => nulls_first(l, r, |l, r| l.partial_cmp(r)),
            (Self::Timestamp(l), Self::Timestamp(r)) => nulls_first(l, r, |l, r| l.partial_cmp(r)),
            (Self::Uuid(l), Self::Uuid(r)) => nulls_first(l, r, |l, r| l.partial_cmp(r)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn option<T: fmt::Display>(f: &mut fmt::Formatter<'_>, v: &Option<T>) -> fmt::Result {
            match v {
                Some(v) => write!(f, "{}", v),
                None => write!(f, "null"),
            }
        }
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(v) => option(f, v),
            Self::Int64(v) => option(f, v),
            Self::Float64(v) => option(f, v),
            Self::Decimal(v) => option(f, v),
            Self::Varchar(v) => match v {
                Some(v) => write!(f, "{:?}", v),
                None => write!(f, "null"),
            },
            Self::Blob(v) => match v {
                Some(v) => write!(f, "blob({} bytes)", v.len()),
                None => write!(f, "null"),
            },
            Self::Timestamp(v) => option(f, v),
            Self::Uuid(v) => option(f, v),
        }
    }
}

/// Conversion between native Rust types and [`Value`].
pub trait AsValue: Sized {
    fn as_value(&self) -> Value;
    fn try_from_value(value: Value) -> Result<Self>;
}

fn mismatch(expected: &'static str, found: &Value) -> Error {
    Error::Store(anyhow!(
        "cannot decode a {} value into {}",
        found.type_name(),
        expected
    ))
}

impl AsValue for bool {
    fn as_value(&self) -> Value {
        Value::Boolean(Some(*self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Boolean(Some(v)) => Ok(v),
            v => Err(mismatch("bool", &v)),
        }
    }
}

impl AsValue for i64 {
    fn as_value(&self) -> Value {
        Value::Int64(Some(*self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Int64(Some(v)) => Ok(v),
            v => Err(mismatch("i64", &v)),
        }
    }
}

impl AsValue for i32 {
    fn as_value(&self) -> Value {
        Value::Int64(Some(*self as i64))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Int64(Some(v)) => i32::try_from(v)
                .map_err(|_| Error::Store(anyhow!("int64 value {} does not fit into i32", v))),
            v => Err(mismatch("i32", &v)),
        }
    }
}

impl AsValue for f64 {
    fn as_value(&self) -> Value {
        Value::Float64(Some(*self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float64(Some(v)) => Ok(v),
            v => Err(mismatch("f64", &v)),
        }
    }
}

impl AsValue for Decimal {
    fn as_value(&self) -> Value {
        Value::Decimal(Some(*self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Decimal(Some(v)) => Ok(v),
            v => Err(mismatch("decimal", &v)),
        }
    }
}

impl AsValue for String {
    fn as_value(&self) -> Value {
        Value::Varchar(Some(self.clone()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) => Ok(v),
            v => Err(mismatch("string", &v)),
        }
    }
}

impl AsValue for Vec<u8> {
    fn as_value(&self) -> Value {
        Value::Blob(Some(self.clone().into_boxed_slice()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v.into_vec()),
            v => Err(mismatch("blob", &v)),
        }
    }
}

impl AsValue for OffsetDateTime {
    fn as_value(&self) -> Value {
        Value::Timestamp(Some(*self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(Some(v)) => Ok(v),
            v => Err(mismatch("timestamp", &v)),
        }
    }
}

impl AsValue for Uuid {
    fn as_value(&self) -> Value {
        Value::Uuid(Some(*self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Uuid(Some(v)) => Ok(v),
            v => Err(mismatch("uuid", &v)),
        }
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(&self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => Value::Null,
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::try_from_value(value).map(Some)
    }
}

macro_rules! value_from {
    ($type:ty, $variant:ident) => {
        impl From<$type> for Value {
            fn from(value: $type) -> Self {
                Value::$variant(Some(value.into()))
            }
        }
    };
}

value_from!(bool, Boolean);
value_from!(i64, Int64);
value_from!(i32, Int64);
value_from!(f64, Float64);
value_from!(Decimal, Decimal);
value_from!(String, Varchar);
value_from!(&str, Varchar);
value_from!(OffsetDateTime, Timestamp);
value_from!(Uuid, Uuid);

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(Some(value.into_boxed_slice()))
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
