use silo_core::{
    Client, EntityId, EntityKind, FieldDef, ID_FIELD, Predicate, Result, RowLabeled, Value,
};

#[derive(Debug)]
struct Task {
    id: EntityId,
    title: String,
    priority: i64,
    assignee: Option<String>,
}

impl EntityKind for Task {
    const KIND: &'static str = "tasks";

    fn fields() -> &'static [FieldDef] {
        static FIELDS: [FieldDef; 3] = [
            FieldDef::new("title", Value::Varchar(None)),
            FieldDef::new("priority", Value::Int64(None)),
            FieldDef::new("assignee", Value::Varchar(None)).nullable(),
        ];
        &FIELDS
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            id: row.decode(ID_FIELD)?,
            title: row.decode("title")?,
            priority: row.decode("priority")?,
            assignee: row.decode("assignee")?,
        })
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

pub async fn mutations(client: &Client) {
    let tasks = client.kind::<Task>();
    let mut ids = Vec::new();
    for (title, priority) in [("write", 1_i64), ("review", 2), ("ship", 2), ("relax", 5)] {
        let task = tasks
            .create()
            .set("title", title)
            .set("priority", priority)
            .save()
            .await
            .expect("Failed to create the task");
        assert_eq!(task.assignee, None);
        ids.push(task.id);
    }

    // Validation happens before the store is touched.
    let err = tasks
        .create()
        .set("priority", 1)
        .save()
        .await
        .expect_err("A task without a title must not validate");
    assert!(err.is_validation());
    let err = tasks
        .create()
        .set("title", "oops")
        .set("priority", 1)
        .set("deadline", "tomorrow")
        .save()
        .await
        .expect_err("An unknown field must not validate");
    assert!(err.is_validation());
    let err = tasks
        .create()
        .set("title", "oops")
        .set("priority", "high")
        .save()
        .await
        .expect_err("A mistyped field must not validate");
    assert!(err.is_validation());

    // Bulk update returns how many entities it touched.
    let touched = tasks
        .update()
        .filter(Predicate::eq("priority", 2))
        .set("assignee", "ana")
        .save()
        .await
        .expect("Failed to bulk update tasks");
    assert_eq!(touched, 2);
    let unassigned = tasks
        .query()
        .filter(Predicate::is_null("assignee"))
        .count()
        .await
        .expect("Failed to count unassigned tasks");
    assert_eq!(unassigned, 2);
    let assigned = tasks
        .query()
        .filter(Predicate::not_null("assignee"))
        .count()
        .await
        .expect("Failed to count assigned tasks");
    assert_eq!(assigned, 2);

    // A filter matching nothing is a successful update of zero entities.
    let touched = tasks
        .update()
        .filter(Predicate::eq("title", "missing"))
        .set("priority", 0)
        .save()
        .await
        .expect("Failed to run the empty update");
    assert_eq!(touched, 0);

    // update_one returns the refreshed entity in one round trip.
    let updated = tasks
        .update_one_id(ids[0])
        .set("priority", 9)
        .set("assignee", "bo")
        .save()
        .await
        .expect("Failed to update the first task");
    assert_eq!(updated.id, ids[0]);
    assert_eq!(updated.title, "write");
    assert_eq!(updated.priority, 9);
    assert_eq!(updated.assignee.as_deref(), Some("bo"));
    let err = tasks
        .update_one_id(99_999)
        .set("priority", 0)
        .save()
        .await
        .expect_err("Updating a missing identifier must fail");
    assert!(err.is_not_found());

    // A nullable field can be set back to null.
    let cleared = tasks
        .update_one(&updated)
        .set("assignee", Option::<String>::None)
        .save()
        .await
        .expect("Failed to clear the assignee");
    assert_eq!(cleared.assignee, None);

    // Bulk delete by predicate, then delete-one semantics.
    let removed = tasks
        .delete()
        .filter(Predicate::eq("priority", 2))
        .exec()
        .await
        .expect("Failed to bulk delete tasks");
    assert_eq!(removed, 2);
    tasks
        .delete_one_id(ids[3])
        .exec()
        .await
        .expect("Failed to delete the last task");
    let err = tasks
        .delete_one_id(ids[3])
        .exec()
        .await
        .expect_err("Deleting an already deleted identifier must fail");
    assert!(err.is_not_found());
    let remaining = tasks.query().count().await.expect("Failed to count tasks");
    assert_eq!(remaining, 1);
}
