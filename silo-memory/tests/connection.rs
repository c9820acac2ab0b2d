#[cfg(test)]
mod tests {
    use silo_core::{
        Client, Driver, EntityId, EntityKind, Error, FieldDef, ID_FIELD, Result, RowLabeled, Value,
    };
    use silo_memory::MemoryDriver;
    use silo_tests::init_logs;

    #[derive(Debug)]
    struct Marker {
        id: EntityId,
        tag: String,
    }

    impl EntityKind for Marker {
        const KIND: &'static str = "markers";

        fn fields() -> &'static [FieldDef] {
            static FIELDS: [FieldDef; 1] = [FieldDef::new("tag", Value::Varchar(None))];
            &FIELDS
        }

        fn from_row(row: &RowLabeled) -> Result<Self> {
            Ok(Self {
                id: row.decode(ID_FIELD)?,
                tag: row.decode("tag")?,
            })
        }

        fn id(&self) -> EntityId {
            self.id
        }
    }

    #[tokio::test]
    async fn connect() {
        init_logs();
        let driver = MemoryDriver::connect("memory://").expect("Could not open the store");
        assert_eq!(driver.dialect(), "memory");
    }

    #[tokio::test]
    async fn wrong_url() {
        init_logs();
        assert!(MemoryDriver::connect("not a url").is_err());
        let err = MemoryDriver::connect("sqlite://some.db").expect_err("Scheme must be rejected");
        assert!(matches!(err, Error::UnsupportedDriver { kind } if kind == "sqlite"));
    }

    #[tokio::test]
    async fn independent_stores() {
        init_logs();
        // Two connections do not share tables; two clones of one do.
        let a = MemoryDriver::connect("memory://").expect("Could not open the store");
        let shared = Client::new(a.clone());
        let separate = Client::new(
            MemoryDriver::connect("memory://").expect("Could not open the store"),
        );
        let marker = Client::new(a)
            .kind::<Marker>()
            .create()
            .set("tag", "here")
            .save()
            .await
            .expect("Failed to create the marker");
        let found = shared
            .kind::<Marker>()
            .get(marker.id)
            .await
            .expect("The clone must see the marker");
        assert_eq!(found.tag, "here");
        let err = separate
            .kind::<Marker>()
            .get(marker.id)
            .await
            .expect_err("The separate store must be empty");
        assert!(err.is_not_found());
    }
}
