use silo_core::{
    Client, EntityId, EntityKind, Error, FieldDef, ID_FIELD, Predicate, Result, RowLabeled,
    TxState, Value,
};

#[derive(Debug)]
struct Entry {
    id: EntityId,
    label: String,
}

impl EntityKind for Entry {
    const KIND: &'static str = "entries";

    fn fields() -> &'static [FieldDef] {
        static FIELDS: [FieldDef; 1] = [FieldDef::new("label", Value::Varchar(None))];
        &FIELDS
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            id: row.decode(ID_FIELD)?,
            label: row.decode("label")?,
        })
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

pub async fn transactions(client: &Client) {
    let entries = client.kind::<Entry>();
    entries
        .create()
        .set("label", "base")
        .save()
        .await
        .expect("Failed to create the baseline entry");

    // Rollback discards everything done inside the transaction.
    let tx = client.tx().await.expect("Failed to begin a transaction");
    assert_eq!(tx.state(), TxState::Open);
    tx.kind::<Entry>()
        .create()
        .set("label", "discarded")
        .save()
        .await
        .expect("Failed to create inside the transaction");
    assert_eq!(
        tx.kind::<Entry>()
            .query()
            .count()
            .await
            .expect("Failed to count inside the transaction"),
        2
    );
    tx.rollback().await.expect("Failed to roll back");
    let count = entries.query().count().await.expect("Failed to count");
    assert_eq!(count, 1, "the rolled back entry must not be visible");

    // Commit publishes, and until then the outside sees nothing.
    let tx = client.tx().await.expect("Failed to begin a transaction");
    tx.kind::<Entry>()
        .create()
        .set("label", "kept")
        .save()
        .await
        .expect("Failed to create inside the transaction");
    let outside = entries.query().count().await.expect("Failed to count");
    assert_eq!(outside, 1, "uncommitted work must stay invisible");
    tx.commit().await.expect("Failed to commit");
    let kept = entries
        .query()
        .filter(Predicate::eq("label", "kept"))
        .exist()
        .await
        .expect("Failed to look for the committed entry");
    assert!(kept);

    // A transactional client cannot open another transaction.
    let tx = client.tx().await.expect("Failed to begin a transaction");
    let err = tx
        .client()
        .tx()
        .await
        .expect_err("A nested transaction must be rejected");
    assert!(matches!(err, Error::NestedTransaction));
    assert_eq!(tx.state(), TxState::Open, "the rejected begin must not touch the transaction");
    tx.rollback().await.expect("Failed to roll back");

    // After the terminal state every statement through the facade fails.
    let tx = client.tx().await.expect("Failed to begin a transaction");
    let bound = tx.kind::<Entry>();
    tx.commit().await.expect("Failed to commit");
    let err = bound
        .create()
        .set("label", "late")
        .save()
        .await
        .expect_err("Statements after commit must fail");
    assert!(matches!(err, Error::TransactionClosed), "got {err}");
    let err = bound
        .query()
        .count()
        .await
        .expect_err("Queries after commit must fail");
    assert!(matches!(err, Error::TransactionClosed), "got {err}");
}
