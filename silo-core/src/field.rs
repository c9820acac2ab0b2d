use crate::Value;

/// Integer identifier assigned by the store, unique within an entity kind.
pub type EntityId = i64;

/// Name of the implicit identifier column every entity kind carries.
pub const ID_FIELD: &str = "id";

/// Declarative specification of one schema field.
///
/// The `value` holds no data: it is the type witness the layer validates
/// mutations against, following the same convention as column definitions
/// where an empty typed value describes the column.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: &'static str,
    pub value: Value,
    pub nullable: bool,
    pub unique: bool,
}

impl FieldDef {
    pub const fn new(name: &'static str, value: Value) -> Self {
        Self {
            name,
            value,
            nullable: false,
            unique: false,
        }
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}
