#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use silo_core::{AsValue, Value};
    use std::cmp::Ordering;
    use time::macros::datetime;
    use uuid::Uuid;

    #[test]
    fn conversions() {
        macro_rules! test_roundtrip {
            ($native:expr, $type:ty, $variant:ident) => {{
                let native: $type = $native;
                let value = native.as_value();
                assert!(matches!(&value, Value::$variant(Some(_))));
                assert_eq!(value, Value::from(native.clone()));
                let back = <$type>::try_from_value(value).expect("Conversion back failed");
                assert_eq!(back, native);
            }};
        }

        test_roundtrip!(true, bool, Boolean);
        test_roundtrip!(-42, i64, Int64);
        test_roundtrip!(2.5, f64, Float64);
        test_roundtrip!(Decimal::new(12345, 2), Decimal, Decimal);
        test_roundtrip!("hello".to_string(), String, Varchar);
        test_roundtrip!(vec![1u8, 2, 3], Vec<u8>, Blob);
        test_roundtrip!(datetime!(2020-01-01 00:00 UTC), time::OffsetDateTime, Timestamp);
        test_roundtrip!(Uuid::nil(), Uuid, Uuid);
    }

    #[test]
    fn narrowing() {
        assert_eq!(i32::try_from_value(Value::Int64(Some(7))).expect("7 fits"), 7);
        assert!(i32::try_from_value(Value::Int64(Some(i64::MAX))).is_err());
        assert!(i64::try_from_value(Value::Varchar(Some("7".into()))).is_err());
        assert!(bool::try_from_value(Value::Null).is_err());
    }

    #[test]
    fn options() {
        assert_eq!(Some(3_i64).as_value(), Value::Int64(Some(3)));
        assert_eq!(Option::<i64>::None.as_value(), Value::Null);
        assert_eq!(
            Option::<i64>::try_from_value(Value::Null).expect("Null decodes to None"),
            None
        );
        assert_eq!(
            Option::<i64>::try_from_value(Value::Int64(None)).expect("Typed null decodes to None"),
            None
        );
        assert_eq!(
            Option::<i64>::try_from_value(Value::Int64(Some(9))).expect("Some decodes"),
            Some(9)
        );
        assert!(Option::<i64>::try_from_value(Value::Boolean(Some(true))).is_err());
    }

    #[test]
    fn nullness() {
        assert!(Value::Null.is_null());
        assert!(Value::Varchar(None).is_null());
        assert!(!Value::Varchar(Some("".into())).is_null());
        assert!(Value::Int64(None).same_type(&Value::Int64(Some(1))));
        assert!(!Value::Int64(None).same_type(&Value::Float64(None)));
    }

    #[test]
    fn comparison() {
        let cmp = |l: &Value, r: &Value| l.compare(r);
        assert_eq!(
            cmp(&Value::Int64(Some(1)), &Value::Int64(Some(2))),
            Some(Ordering::Less)
        );
        assert_eq!(
            cmp(&Value::Varchar(Some("b".into())), &Value::Varchar(Some("a".into()))),
            Some(Ordering::Greater)
        );
        // Nulls sort before data and equal each other, across spellings.
        assert_eq!(
            cmp(&Value::Int64(None), &Value::Int64(Some(0))),
            Some(Ordering::Less)
        );
        assert_eq!(cmp(&Value::Null, &Value::Int64(None)), Some(Ordering::Equal));
        // Mismatched types have no ordering.
        assert_eq!(cmp(&Value::Int64(Some(1)), &Value::Float64(Some(1.0))), None);
    }
}
