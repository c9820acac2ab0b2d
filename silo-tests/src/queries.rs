use silo_core::{
    Client, EntityId, EntityKind, FieldDef, ID_FIELD, Order, Predicate, Result, RowLabeled, Value,
};

#[derive(Debug, PartialEq)]
struct City {
    id: EntityId,
    name: String,
    population: i64,
    country: String,
}

impl EntityKind for City {
    const KIND: &'static str = "cities";

    fn fields() -> &'static [FieldDef] {
        static FIELDS: [FieldDef; 3] = [
            FieldDef::new("name", Value::Varchar(None)),
            FieldDef::new("population", Value::Int64(None)),
            FieldDef::new("country", Value::Varchar(None)),
        ];
        &FIELDS
    }

    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            id: row.decode(ID_FIELD)?,
            name: row.decode("name")?,
            population: row.decode("population")?,
            country: row.decode("country")?,
        })
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

pub async fn queries(client: &Client) {
    let cities = client.kind::<City>();
    for (name, population, country) in [
        ("Milan", 1_371_000_i64, "IT"),
        ("Turin", 848_000, "IT"),
        ("Lyon", 522_000, "FR"),
        ("Nice", 342_000, "FR"),
        ("Graz", 289_000, "AT"),
    ] {
        cities
            .create()
            .set("name", name)
            .set("population", population)
            .set("country", country)
            .save()
            .await
            .expect("Failed to create the city");
    }

    let all = cities.query().all().await.expect("Failed to list cities");
    assert_eq!(all.len(), 5);

    // only: zero, one and many matches.
    let graz = cities
        .query()
        .filter(Predicate::eq("country", "AT"))
        .only()
        .await
        .expect("Failed to query the unique austrian city");
    assert_eq!(graz.name, "Graz");
    let err = cities
        .query()
        .filter(Predicate::eq("country", "DE"))
        .only()
        .await
        .expect_err("No german city exists");
    assert!(err.is_not_found());
    let err = cities
        .query()
        .filter(Predicate::eq("country", "IT"))
        .only()
        .await
        .expect_err("Two italian cities exist");
    assert!(err.is_not_singular());

    // first follows the requested ordering.
    let largest = cities
        .query()
        .order_by("population", Order::Desc)
        .first()
        .await
        .expect("Failed to query the largest city");
    assert_eq!(largest.name, "Milan");
    let err = cities
        .query()
        .filter(Predicate::gt("population", 10_000_000))
        .first()
        .await
        .expect_err("No city is that large");
    assert!(err.is_not_found());

    // Compound predicates.
    let big_french = cities
        .query()
        .filter(Predicate::eq("country", "FR"))
        .filter(Predicate::ge("population", 500_000))
        .all()
        .await
        .expect("Failed to query large french cities");
    assert_eq!(big_french.len(), 1);
    assert_eq!(big_french[0].name, "Lyon");
    let either = cities
        .query()
        .filter(Predicate::Or(vec![
            Predicate::eq("name", "Nice"),
            Predicate::eq("name", "Graz"),
        ]))
        .order_by("name", Order::Asc)
        .all()
        .await
        .expect("Failed to query by name disjunction");
    assert_eq!(either.len(), 2);
    assert_eq!(either[0].name, "Graz");
    assert_eq!(either[1].name, "Nice");
    let in_set = cities
        .query()
        .filter(Predicate::is_in("country", ["IT", "AT"]))
        .count()
        .await
        .expect("Failed to count cities by country set");
    assert_eq!(in_set, 3);

    // Ordering with pagination: second and third by ascending population.
    let page = cities
        .query()
        .order_by("population", Order::Asc)
        .offset(1)
        .limit(2)
        .all()
        .await
        .expect("Failed to query the population page");
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].name, "Nice");
    assert_eq!(page[1].name, "Lyon");

    // count and exist ignore pagination concerns entirely.
    let count = cities
        .query()
        .filter(Predicate::lt("population", 1_000_000))
        .count()
        .await
        .expect("Failed to count cities");
    assert_eq!(count, 4);
    assert!(
        cities
            .query()
            .filter(Predicate::eq("name", "Turin"))
            .exist()
            .await
            .expect("Failed to check existence")
    );
    assert!(
        !cities
            .query()
            .filter(Predicate::eq("name", "Atlantis"))
            .exist()
            .await
            .expect("Failed to check non-existence")
    );

    // Identifier predicates.
    let by_ids = cities
        .query()
        .filter(Predicate::id_in(vec![all[0].id, all[2].id]))
        .all()
        .await
        .expect("Failed to query by identifier set");
    assert_eq!(by_ids.len(), 2);

    // Secondary ordering breaks the country tie by name.
    let ordered = cities
        .query()
        .order_by("country", Order::Asc)
        .order_by("name", Order::Asc)
        .all()
        .await
        .expect("Failed to query with two order terms");
    let names = ordered.iter().map(|c| c.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["Graz", "Lyon", "Nice", "Milan", "Turin"]);
}
