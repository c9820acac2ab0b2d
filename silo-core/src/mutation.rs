use crate::{EntityId, EntityKind, Error, FieldDef, Predicate, Result, Value};
use std::fmt;

/// Kind of change a [`Mutation`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Create,
    Update,
    UpdateOne,
    Delete,
    DeleteOne,
}

impl Op {
    /// Whether the operation targets exactly one entity by identifier.
    pub fn is_one(&self) -> bool {
        matches!(self, Op::UpdateOne | Op::DeleteOne)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Op::Create => "create",
            Op::Update => "update",
            Op::UpdateOne => "update-one",
            Op::Delete => "delete",
            Op::DeleteOne => "delete-one",
        })
    }
}

/// One pending change against a single entity kind.
///
/// A mutation is created fresh by a builder, flows once through the hook
/// chain and is consumed by the terminal driver call. It is type-erased:
/// carrying the kind name and schema slice lets one execution path serve
/// every entity kind, and lets hooks registered client-wide observe
/// mutations of any kind.
#[derive(Debug, Clone)]
pub struct Mutation {
    op: Op,
    kind: &'static str,
    schema: &'static [FieldDef],
    id: Option<EntityId>,
    fields: Vec<(&'static str, Value)>,
    predicates: Vec<Predicate>,
}

impl Mutation {
    pub fn new<E: EntityKind>(op: Op) -> Self {
        Self {
            op,
            kind: E::KIND,
            schema: E::fields(),
            id: None,
            fields: Vec::new(),
            predicates: Vec::new(),
        }
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn schema(&self) -> &'static [FieldDef] {
        self.schema
    }

    /// Target identifier; always present for the *One operations.
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    /// Set a field to a new value, replacing any previous value for the
    /// same field while keeping first-set order for the others.
    pub fn set_field(&mut self, name: &'static str, value: impl Into<Value>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    pub fn fields(&self) -> &[(&'static str, Value)] {
        &self.fields
    }

    pub fn clear_field(&mut self, name: &str) {
        self.fields.retain(|(n, _)| *n != name);
    }

    pub fn add_predicate(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// All accumulated predicates ANDed together, the identifier constraint
    /// of a *One operation included.
    pub fn combined_predicate(&self) -> Option<Predicate> {
        let mut predicates = self.predicates.to_vec();
        if let Some(id) = self.id {
            predicates.insert(0, Predicate::id(id));
        }
        Predicate::and(predicates)
    }

    /// Validate the field set of a create mutation against the schema:
    /// unknown fields, type mismatches and missing non-nullable fields are
    /// all collected into a single validation error.
    pub fn validate_create(&self) -> Result<()> {
        let mut offending = Vec::new();
        for (name, value) in &self.fields {
            match self.schema.iter().find(|f| f.name == *name) {
                None => offending.push(format!("{}: unknown field", name)),
                Some(def) => {
                    if value.is_null() {
                        if !def.nullable {
                            offending.push(format!("{}: null value for a non-nullable field", name));
                        }
                    } else if !value.same_type(&def.value) {
                        offending.push(format!(
                            "{}: expected {}, got {}",
                            name,
                            def.value.type_name(),
                            value.type_name()
                        ));
                    }
                }
            }
        }
        for def in self.schema {
            if !def.nullable && !self.fields.iter().any(|(n, _)| *n == def.name) {
                offending.push(format!("{}: missing required field", def.name));
            }
        }
        if offending.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation {
                kind: self.kind,
                fields: offending,
            })
        }
    }
}
