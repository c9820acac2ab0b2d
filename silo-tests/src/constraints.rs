use silo_core::{Client, EntityId, EntityKind, FieldDef, ID_FIELD, Result, RowLabeled, Value};

#[derive(Debug)]
struct Account {
    id: EntityId,
    email: String,
    handle: Option<String>,
}

impl EntityKind for Account {
    const KIND: &'static str = "accounts";

    fn fields() -> &'static [FieldDef] {
        static FIELDS: [FieldDef; 2] = [
            FieldDef::new("email", Value::Varchar(None)).unique(),
            FieldDef::new("handle", Value::Varchar(None)).nullable().unique(),
        ];
        &FIELDS
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            id: row.decode(ID_FIELD)?,
            email: row.decode("email")?,
            handle: row.decode("handle")?,
        })
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

pub async fn constraints(client: &Client) {
    let accounts = client.kind::<Account>();
    let first = accounts
        .create()
        .set("email", "ada@example.com")
        .set("handle", "ada")
        .save()
        .await
        .expect("Failed to create the first account");

    // A duplicate unique value is rejected with the offending column.
    let err = accounts
        .create()
        .set("email", "ada@example.com")
        .save()
        .await
        .expect_err("A duplicate email must be rejected");
    assert!(err.is_constraint_violation(), "got {err}");
    assert!(err.to_string().contains("email"), "got {err}");

    // Different value on the unique column is fine.
    let second = accounts
        .create()
        .set("email", "grace@example.com")
        .save()
        .await
        .expect("Failed to create the second account");
    assert_ne!(first.id, second.id);

    // Null does not participate in uniqueness.
    accounts
        .create()
        .set("email", "alan@example.com")
        .save()
        .await
        .expect("A second null handle must be accepted");
    assert_eq!(second.handle, None);

    // A duplicate inside one batch fails the batch as a whole.
    let err = accounts
        .create_bulk([
            accounts.create().set("email", "twin@example.com"),
            accounts.create().set("email", "twin@example.com"),
        ])
        .save()
        .await
        .expect_err("Duplicates within a batch must be rejected");
    assert!(err.is_constraint_violation(), "got {err}");
    let count = accounts
        .query()
        .count()
        .await
        .expect("Failed to count accounts");
    assert_eq!(count, 3);
}
