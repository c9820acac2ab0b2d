use silo_core::{Client, EntityId, EntityKind, FieldDef, ID_FIELD, Result, RowLabeled, Value};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct Note {
    id: EntityId,
    body: String,
}

impl EntityKind for Note {
    const KIND: &'static str = "notes";

    fn fields() -> &'static [FieldDef] {
        static FIELDS: [FieldDef; 1] = [FieldDef::new("body", Value::Varchar(None))];
        &FIELDS
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            id: row.decode(ID_FIELD)?,
            body: row.decode("body")?,
        })
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Runs last: closes the driver shared by every facade of the client.
pub async fn lifecycle(client: Client) {
    // The debug client traces every statement through the log sink and
    // shares the store with the plain client.
    let lines: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = {
        let lines = Arc::clone(&lines);
        Arc::new(move |line: &str| {
            lines
                .lock()
                .expect("Log lines lock poisoned")
                .push(line.to_string());
        }) as Arc<dyn Fn(&str) + Send + Sync>
    };
    let debug = client.clone().with_log(sink).debug();
    let note = debug
        .kind::<Note>()
        .create()
        .set("body", "traced")
        .save()
        .await
        .expect("Failed to create through the debug client");
    let traced = lines.lock().expect("Log lines lock poisoned").len();
    assert!(traced > 0, "the debug client must trace statements");
    let found = client
        .kind::<Note>()
        .get(note.id)
        .await
        .expect("The debug client must write to the shared store");
    assert_eq!(found.body, "traced");

    // Turning debug on twice must not stack a second tracing layer.
    lines.lock().expect("Log lines lock poisoned").clear();
    debug
        .debug()
        .kind::<Note>()
        .query()
        .count()
        .await
        .expect("Failed to count through the doubly debug client");
    assert_eq!(
        lines.lock().expect("Log lines lock poisoned").len(),
        1,
        "each statement must be traced exactly once"
    );

    // Closing is terminal: every later operation fails loudly.
    client.close().await.expect("Failed to close the client");
    let err = client
        .kind::<Note>()
        .create()
        .set("body", "late")
        .save()
        .await
        .expect_err("Creates after close must fail");
    assert!(err.to_string().contains("closed"), "got {err}");
    let err = client
        .kind::<Note>()
        .query()
        .all()
        .await
        .expect_err("Queries after close must fail");
    assert!(err.to_string().contains("closed"), "got {err}");
    client
        .tx()
        .await
        .expect_err("Transactions after close must fail");
}
