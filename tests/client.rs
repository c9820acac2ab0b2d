#[cfg(test)]
mod tests {
    use silo::{
        EntityId, EntityKind, Error, FieldDef, ID_FIELD, Order, Predicate, Result, RowLabeled,
        Value,
    };

    #[derive(Debug)]
    struct Book {
        id: EntityId,
        title: String,
        pages: i64,
        isbn: Option<String>,
    }

    impl EntityKind for Book {
        const KIND: &'static str = "books";

        fn fields() -> &'static [FieldDef] {
            static FIELDS: [FieldDef; 3] = [
                FieldDef::new("title", Value::Varchar(None)),
                FieldDef::new("pages", Value::Int64(None)),
                FieldDef::new("isbn", Value::Varchar(None)).nullable().unique(),
            ];
            &FIELDS
        }

        fn from_row(row: &RowLabeled) -> Result<Self> {
            Ok(Self {
                id: row.decode(ID_FIELD)?,
                title: row.decode("title")?,
                pages: row.decode("pages")?,
                isbn: row.decode("isbn")?,
            })
        }

        fn id(&self) -> EntityId {
            self.id
        }
    }

    #[tokio::test]
    async fn open() {
        silo::open("memory", "memory://")
            .await
            .expect("The memory backend must be available");
        let err = silo::open("postgres", "postgres://localhost/app")
            .await
            .expect_err("An unavailable backend must be rejected");
        assert!(matches!(err, Error::UnsupportedDriver { kind } if kind == "postgres"));
    }

    #[tokio::test]
    async fn crud() {
        let client = silo::open("memory", "memory://")
            .await
            .expect("Could not open the store");
        let books = client.kind::<Book>();

        let book = books
            .create()
            .set("title", "Dune")
            .set("pages", 412)
            .set("isbn", "9780441172719")
            .save()
            .await
            .expect("Failed to create the book");
        assert_eq!(book.id, 1);

        books
            .create()
            .set("title", "Foundation")
            .set("pages", 255)
            .save()
            .await
            .expect("Failed to create the second book");

        let short_first = books
            .query()
            .order_by("pages", Order::Asc)
            .all()
            .await
            .expect("Failed to list the books");
        assert_eq!(short_first.len(), 2);
        assert_eq!(short_first[0].title, "Foundation");

        let renamed = books
            .update_one(&book)
            .set("title", "Dune (1965)")
            .save()
            .await
            .expect("Failed to rename the book");
        assert_eq!(renamed.title, "Dune (1965)");
        assert_eq!(renamed.pages, 412);

        let err = books
            .create()
            .set("title", "Dune, again")
            .set("pages", 412)
            .set("isbn", "9780441172719")
            .save()
            .await
            .expect_err("A duplicate isbn must be rejected");
        assert!(err.is_constraint_violation());

        let removed = books
            .delete()
            .filter(Predicate::lt("pages", 300))
            .exec()
            .await
            .expect("Failed to delete short books");
        assert_eq!(removed, 1);
        assert_eq!(
            books.query().count().await.expect("Failed to count books"),
            1
        );
        assert_eq!(renamed.isbn.as_deref(), Some("9780441172719"));
    }

    #[tokio::test]
    async fn validation() {
        let client = silo::open("memory", "memory://")
            .await
            .expect("Could not open the store");
        let err = client
            .kind::<Book>()
            .create()
            .set("pages", "many")
            .save()
            .await
            .expect_err("An invalid create must be rejected");
        assert!(err.is_validation());
        let message = err.to_string();
        assert!(message.contains("books"), "got {message}");
        assert!(message.contains("title"), "got {message}");
        assert!(message.contains("pages"), "got {message}");
    }

    #[tokio::test]
    async fn transaction() {
        let client = silo::open("memory", "memory://")
            .await
            .expect("Could not open the store");
        let tx = client.tx().await.expect("Failed to begin");
        tx.kind::<Book>()
            .create()
            .set("title", "Draft")
            .set("pages", 1)
            .save()
            .await
            .expect("Failed to create inside the transaction");
        tx.commit().await.expect("Failed to commit");
        assert!(
            client
                .kind::<Book>()
                .query()
                .filter(Predicate::eq("title", "Draft"))
                .exist()
                .await
                .expect("Failed to look for the committed book")
        );
    }
}
