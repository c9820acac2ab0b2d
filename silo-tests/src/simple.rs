use rust_decimal::Decimal;
use silo_core::{
    Client, EntityId, EntityKind, FieldDef, ID_FIELD, Predicate, Result, RowLabeled, Value,
};
use time::macros::datetime;
use uuid::Uuid;

struct Widget {
    id: EntityId,
    name: String,
    mass: f64,
    price: Decimal,
    active: bool,
    made: time::OffsetDateTime,
    tag: Option<Uuid>,
    notes: Option<String>,
    data: Vec<u8>,
}

impl EntityKind for Widget {
    const KIND: &'static str = "widgets";

    fn fields() -> &'static [FieldDef] {
        static FIELDS: [FieldDef; 8] = [
            FieldDef::new("name", Value::Varchar(None)),
            FieldDef::new("mass", Value::Float64(None)),
            FieldDef::new("price", Value::Decimal(None)),
            FieldDef::new("active", Value::Boolean(None)),
            FieldDef::new("made", Value::Timestamp(None)),
            FieldDef::new("tag", Value::Uuid(None)).nullable(),
            FieldDef::new("notes", Value::Varchar(None)).nullable(),
            FieldDef::new("data", Value::Blob(None)),
        ];
        &FIELDS
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            id: row.decode(ID_FIELD)?,
            name: row.decode("name")?,
            mass: row.decode("mass")?,
            price: row.decode("price")?,
            active: row.decode("active")?,
            made: row.decode("made")?,
            tag: row.decode("tag")?,
            notes: row.decode("notes")?,
            data: row.decode("data")?,
        })
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Create then get: every field round-trips through the store unchanged.
pub async fn simple(client: &Client) {
    let widgets = client.kind::<Widget>();
    let made = datetime!(2024-02-29 12:00:10 UTC);
    let tag = Uuid::parse_str("5e915574-bb30-4430-98cf-c5854f61fbbd").unwrap();
    let created = widgets
        .create()
        .set("name", "flux capacitor")
        .set("mass", 13.25)
        .set("price", Decimal::new(99999, 2))
        .set("active", true)
        .set("made", made)
        .set("tag", Some(tag))
        .set("data", vec![0xde_u8, 0xad, 0xbe, 0xef])
        .save()
        .await
        .expect("Failed to create the widget");
    assert!(created.id > 0);
    assert_eq!(created.notes, None);

    let found = widgets
        .get(created.id)
        .await
        .expect("Failed to get the created widget");
    assert_eq!(found.id, created.id);
    assert_eq!(found.name, "flux capacitor");
    assert_eq!(found.mass, 13.25);
    assert_eq!(found.price, Decimal::new(99999, 2));
    assert!(found.active);
    assert_eq!(found.made, made);
    assert_eq!(found.tag, Some(tag));
    assert_eq!(found.notes, None);
    assert_eq!(found.data, vec![0xde, 0xad, 0xbe, 0xef]);

    // The panicking getter on an identifier known to exist.
    let again = widgets.get_x(created.id).await;
    assert_eq!(again.name, found.name);
}

#[derive(Debug)]
struct Item {
    id: EntityId,
    value: i64,
}

impl EntityKind for Item {
    const KIND: &'static str = "items";

    fn fields() -> &'static [FieldDef] {
        static FIELDS: [FieldDef; 1] = [FieldDef::new("value", Value::Int64(None))];
        &FIELDS
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            id: row.decode(ID_FIELD)?,
            value: row.decode("value")?,
        })
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

/// The end-to-end walkthrough over an empty store: first created entity
/// gets identifier 1, counting by predicate sees it, deleting it makes the
/// lookup fail with not-found.
pub async fn scenario(client: &Client) {
    let items = client.kind::<Item>();
    let item = items
        .create()
        .set("value", 1)
        .save()
        .await
        .expect("Failed to create the first item");
    assert_eq!(item.id, 1);
    assert_eq!(item.value, 1);

    let count = items
        .query()
        .filter(Predicate::eq("value", 1))
        .count()
        .await
        .expect("Failed to count items");
    assert_eq!(count, 1);

    items
        .delete_one_id(1)
        .exec()
        .await
        .expect("Failed to delete item 1");
    let err = items.get(1).await.expect_err("Item 1 should be gone");
    assert!(err.is_not_found(), "expected a not-found error, got {err}");
}
