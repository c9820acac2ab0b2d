use silo_core::{
    Client, EntityId, EntityKind, FieldDef, Hook, ID_FIELD, MutationResult, Mutator, Op, Result,
    RowLabeled, Value, mutate_fn, on, reject,
};
use std::sync::{Arc, Mutex};

struct Event {
    id: EntityId,
    name: String,
}

impl EntityKind for Event {
    const KIND: &'static str = "events";

    fn fields() -> &'static [FieldDef] {
        static FIELDS: [FieldDef; 1] = [FieldDef::new("name", Value::Varchar(None))];
        &FIELDS
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            id: row.decode(ID_FIELD)?,
            name: row.decode("name")?,
        })
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

struct Ledger {
    id: EntityId,
    amount: i64,
}

impl EntityKind for Ledger {
    const KIND: &'static str = "ledgers";

    fn fields() -> &'static [FieldDef] {
        static FIELDS: [FieldDef; 1] = [FieldDef::new("amount", Value::Int64(None))];
        &FIELDS
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            id: row.decode(ID_FIELD)?,
            amount: row.decode("amount")?,
        })
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

type Trace = Arc<Mutex<Vec<&'static str>>>;

/// A hook recording its name before delegating, unchanged, to the next step.
fn observer(name: &'static str, trace: Trace) -> Hook {
    Arc::new(move |next: Arc<dyn Mutator>| {
        let trace = Arc::clone(&trace);
        mutate_fn(move |mutation| {
            trace.lock().expect("Trace lock poisoned").push(name);
            let next = Arc::clone(&next);
            Box::pin(async move { next.mutate(mutation).await })
        })
    })
}

fn drain(trace: &Trace) -> Vec<&'static str> {
    std::mem::take(&mut *trace.lock().expect("Trace lock poisoned"))
}

pub async fn hooks(client: &Client) {
    let events = client.kind::<Event>();
    let trace: Trace = Arc::default();

    // Registration order is execution order: the first registered hook is
    // outermost and sees the mutation first.
    events.use_hook(observer("a", Arc::clone(&trace)));
    events.use_hook(observer("b", Arc::clone(&trace)));
    events
        .create()
        .set("name", "first")
        .save()
        .await
        .expect("Failed to create the first event");
    assert_eq!(drain(&trace), ["a", "b"]);

    // Client-wide hooks wrap outside kind hooks even when registered later.
    // Guarded by kind so the suite's other scenarios never see it.
    {
        let trace = Arc::clone(&trace);
        client.use_hook(Arc::new(move |next: Arc<dyn Mutator>| {
            let trace = Arc::clone(&trace);
            mutate_fn(move |mutation| {
                if mutation.kind() == Event::KIND {
                    trace.lock().expect("Trace lock poisoned").push("global");
                }
                let next = Arc::clone(&next);
                Box::pin(async move { next.mutate(mutation).await })
            })
        }));
    }
    events
        .create()
        .set("name", "second")
        .save()
        .await
        .expect("Failed to create the second event");
    assert_eq!(drain(&trace), ["global", "a", "b"]);

    // A hook can rewrite the mutation on its way down.
    events.use_hook(Arc::new(|next: Arc<dyn Mutator>| {
        mutate_fn(move |mut mutation| {
            if mutation.op() == Op::Create {
                mutation.set_field("name", "renamed");
            }
            let next = Arc::clone(&next);
            Box::pin(async move { next.mutate(mutation).await })
        })
    }));
    let renamed = events
        .create()
        .set("name", "third")
        .save()
        .await
        .expect("Failed to create the third event");
    assert_eq!(renamed.name, "renamed");
    drain(&trace);

    // Short-circuit: answering without delegating skips the store entirely.
    events.use_hook(on(
        Arc::new(|_next: Arc<dyn Mutator>| {
            mutate_fn(|_mutation| Box::pin(async { Ok(MutationResult::Affected(0)) }))
        }),
        &[Op::Delete],
    ));
    let removed = events
        .delete()
        .exec()
        .await
        .expect("The short-circuited delete must succeed");
    assert_eq!(removed, 0);
    let count = events.query().count().await.expect("Failed to count events");
    assert_eq!(count, 3, "the short-circuited delete must not touch the store");
    assert_eq!(
        drain(&trace),
        ["global", "a", "b"],
        "hooks above the short circuit still observe the mutation"
    );

    // on() keeps the hook transparent for every other operation.
    events
        .create()
        .set("name", "fourth")
        .save()
        .await
        .expect("Creates must still pass through");
    assert_eq!(drain(&trace), ["global", "a", "b"]);

    // reject() vetoes the operation before any store access.
    let ledgers = client.kind::<Ledger>();
    let entry = ledgers
        .create()
        .set("amount", 100)
        .save()
        .await
        .expect("Failed to create the ledger entry");
    ledgers.use_hook(reject(&[Op::DeleteOne, Op::Delete]));
    let err = ledgers
        .delete_one(&entry)
        .exec()
        .await
        .expect_err("Deletes on the ledger must be vetoed");
    assert!(err.to_string().contains("not allowed"), "got {err}");
    assert!(
        ledgers
            .query()
            .exist()
            .await
            .expect("Failed to check the ledger"),
        "the vetoed delete must not have removed anything"
    );
    let updated = ledgers
        .update_one(&entry)
        .set("amount", 50)
        .save()
        .await
        .expect("Updates on the ledger must still pass");
    assert_eq!(updated.amount, 50);
}
