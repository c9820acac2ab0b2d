use crate::Op;
use thiserror::Error;

/// Error taxonomy of the entity layer.
///
/// Typed variants cover the failures callers are expected to branch on;
/// anything the storage driver reports without a more specific meaning is
/// carried opaquely in [`Error::Store`].
#[derive(Debug, Error)]
pub enum Error {
    /// The driver kind passed to `open` has no compiled-in backend.
    #[error("unsupported driver: {kind:?}")]
    UnsupportedDriver { kind: String },

    /// A transaction was started on a client already bound to one.
    #[error("cannot start a transaction within a transaction")]
    NestedTransaction,

    /// An operation was issued through a transaction that already
    /// committed or rolled back.
    #[error("transaction has already been committed or rolled back")]
    TransactionClosed,

    /// A create mutation carried unknown, mistyped or missing fields.
    #[error("{kind}: validation failed for fields [{}]", .fields.join(", "))]
    Validation {
        kind: &'static str,
        fields: Vec<String>,
    },

    /// No entity matched a lookup that requires exactly one.
    #[error("{kind} not found")]
    NotFound { kind: &'static str },

    /// More than one entity matched a lookup that requires exactly one.
    #[error("{kind} not singular")]
    NotSingular { kind: &'static str },

    /// A unique or referential constraint was violated in the store.
    #[error("constraint violation on {table}.{column}")]
    ConstraintViolation { table: String, column: String },

    /// Opaque driver failure, kept wrapped rather than swallowed.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_not_singular(&self) -> bool {
        matches!(self, Error::NotSingular { .. })
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Error::ConstraintViolation { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Attach entity kind and operation context to an opaque store error.
    /// Typed variants already carry their context and pass through unchanged
    /// so callers can still match on them.
    pub(crate) fn operation(self, kind: &'static str, op: Op) -> Self {
        match self {
            Error::Store(e) => Error::Store(e.context(format!("{op} {kind}"))),
            other => other,
        }
    }

    /// Same as [`Error::operation`] for the read path, which has no
    /// mutation operation attached.
    pub(crate) fn query(self, kind: &'static str) -> Self {
        match self {
            Error::Store(e) => Error::Store(e.context(format!("query {kind}"))),
            other => other,
        }
    }
}
