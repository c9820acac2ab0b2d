use silo_core::{Client, EntityId, EntityKind, FieldDef, ID_FIELD, Result, RowLabeled, Value};

#[derive(Debug)]
struct Reading {
    id: EntityId,
    sensor: String,
    level: i64,
}

impl EntityKind for Reading {
    const KIND: &'static str = "readings";

    fn fields() -> &'static [FieldDef] {
        static FIELDS: [FieldDef; 2] = [
            FieldDef::new("sensor", Value::Varchar(None)),
            FieldDef::new("level", Value::Int64(None)),
        ];
        &FIELDS
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            id: row.decode(ID_FIELD)?,
            sensor: row.decode("sensor")?,
            level: row.decode("level")?,
        })
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

pub async fn bulk(client: &Client) {
    let readings = client.kind::<Reading>();
    let created = readings
        .create_bulk((0..4).map(|i| {
            readings
                .create()
                .set("sensor", format!("s{}", i))
                .set("level", i)
        }))
        .save()
        .await
        .expect("Failed to create the batch");

    // Input order is preserved and identifiers ascend with it.
    assert_eq!(created.len(), 4);
    for (i, reading) in created.iter().enumerate() {
        assert_eq!(reading.sensor, format!("s{}", i));
        assert_eq!(reading.level, i as i64);
    }
    for pair in created.windows(2) {
        assert!(pair[0].id < pair[1].id);
    }

    // An empty batch is a no-op.
    let none = readings
        .create_bulk(Vec::new())
        .save()
        .await
        .expect("Failed to save the empty batch");
    assert!(none.is_empty());

    // One invalid child aborts the whole batch before the store is touched.
    let err = readings
        .create_bulk([
            readings.create().set("sensor", "ok").set("level", 1),
            readings.create().set("sensor", "broken"),
        ])
        .save()
        .await
        .expect_err("A batch with an invalid child must fail");
    assert!(err.is_validation());
    let count = readings
        .query()
        .count()
        .await
        .expect("Failed to count readings");
    assert_eq!(count, 4, "the failed batch must not have created anything");
}
