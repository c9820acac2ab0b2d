#[cfg(test)]
mod tests {
    use silo_core::{
        EntityId, EntityKind, FieldDef, Mutation, Op, Predicate, Result, RowLabeled, Value,
    };

    struct Gadget;

    impl EntityKind for Gadget {
        const KIND: &'static str = "gadgets";

        fn fields() -> &'static [FieldDef] {
            static FIELDS: [FieldDef; 3] = [
                FieldDef::new("name", Value::Varchar(None)),
                FieldDef::new("weight", Value::Float64(None)),
                FieldDef::new("comment", Value::Varchar(None)).nullable(),
            ];
            &FIELDS
        }

        fn from_row(_row: &RowLabeled) -> Result<Self> {
            Ok(Self)
        }

        fn id(&self) -> EntityId {
            0
        }
    }

    #[test]
    fn fields() {
        let mut mutation = Mutation::new::<Gadget>(Op::Create);
        assert_eq!(mutation.kind(), "gadgets");
        assert_eq!(mutation.op(), Op::Create);
        mutation.set_field("name", "lever");
        mutation.set_field("weight", 1.5);
        mutation.set_field("name", "pulley");
        assert_eq!(mutation.fields().len(), 2, "setting twice must replace");
        assert_eq!(
            mutation.field("name"),
            Some(&Value::Varchar(Some("pulley".into())))
        );
        assert_eq!(mutation.fields()[0].0, "name", "first-set order is kept");
        mutation.clear_field("name");
        assert_eq!(mutation.field("name"), None);
    }

    #[test]
    fn combined_predicate() {
        let mut mutation = Mutation::new::<Gadget>(Op::Update);
        assert_eq!(mutation.combined_predicate(), None);
        mutation.add_predicate(Predicate::eq("name", "lever"));
        assert_eq!(
            mutation.combined_predicate(),
            Some(Predicate::eq("name", "lever")),
            "a single predicate must not be wrapped"
        );
        mutation.add_predicate(Predicate::gt("weight", 1.0));
        assert_eq!(
            mutation.combined_predicate(),
            Some(Predicate::And(vec![
                Predicate::eq("name", "lever"),
                Predicate::gt("weight", 1.0),
            ]))
        );
    }

    #[test]
    fn validate() {
        let mut mutation = Mutation::new::<Gadget>(Op::Create);
        mutation.set_field("name", "lever");
        mutation.set_field("weight", 1.5);
        mutation.validate_create().expect("A complete create is valid");

        // The nullable field may be omitted or explicitly null.
        mutation.set_field("comment", Option::<String>::None);
        mutation.validate_create().expect("A null nullable field is valid");

        let mut mutation = Mutation::new::<Gadget>(Op::Create);
        mutation.set_field("name", 7);
        mutation.set_field("serial", "x-1");
        let err = mutation.validate_create().expect_err("Invalid create");
        let message = err.to_string();
        assert!(message.contains("expected varchar, got int64"), "got {message}");
        assert!(message.contains("serial: unknown field"), "got {message}");
        assert!(message.contains("weight: missing required field"), "got {message}");
    }

    #[test]
    fn one_ops() {
        assert!(Op::UpdateOne.is_one());
        assert!(Op::DeleteOne.is_one());
        assert!(!Op::Create.is_one());
        assert_eq!(Op::DeleteOne.to_string(), "delete-one");
    }
}
