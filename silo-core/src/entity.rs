use crate::{EntityId, FieldDef, ID_FIELD, Result, RowLabeled};

/// Schema contract of one entity kind.
///
/// Implemented once per persisted type; the layer derives field validation,
/// statement shapes and materialization from it, so no per-kind client code
/// exists anywhere else.
pub trait EntityKind: Send + Sync + Sized + 'static {
    /// Kind name, also the table the kind persists into.
    const KIND: &'static str;

    /// Ordered schema fields, the identifier excluded.
    fn fields() -> &'static [FieldDef];

    /// Materialize an entity from a labeled row. The row always carries the
    /// identifier column plus every schema field.
    fn from_row(row: &RowLabeled) -> Result<Self>;

    /// Identifier of this in-process snapshot.
    fn id(&self) -> EntityId;

    fn field_def(name: &str) -> Option<&'static FieldDef> {
        Self::fields().iter().find(|f| f.name == name)
    }

    /// Column list of a full row: the identifier followed by every field.
    fn columns() -> Vec<&'static str> {
        let mut columns = Vec::with_capacity(Self::fields().len() + 1);
        columns.push(ID_FIELD);
        columns.extend(Self::fields().iter().map(|f| f.name));
        columns
    }

    fn unique_columns() -> Vec<&'static str> {
        Self::fields()
            .iter()
            .filter(|f| f.unique)
            .map(|f| f.name)
            .collect()
    }
}
