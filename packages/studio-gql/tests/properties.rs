//! Property tests for the codec, unwrapper and projector.

use proptest::prelude::*;
use studio_gql::{parse, project, stringify, unwrap, Map, Row, Value, MAX_SAFE_INTEGER};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Leaves that survive a text round trip unchanged (no floats: their
/// shortest form may exceed 15 digits and come back as a big number).
fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).prop_map(Value::Int),
        "[a-zA-Z0-9 \"\\\\]{0,8}".prop_map(Value::String),
        "-?[1-9][0-9]{16,30}".prop_map(|digits| Value::Big(digits.parse().unwrap())),
    ]
}

/// Acyclic trees; object keys start with `k` so no plain object is ever
/// shaped like a tagged value.
fn tree() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("k[a-z]{0,5}", inner.clone()), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map>())),
            ("[a-z0-9\"]{0,8}", inner).prop_map(|(raw, value)| Value::tagged(raw, value)),
        ]
    })
}

fn contains_tagged(node: &Value) -> bool {
    match node {
        Value::Tagged(_) => true,
        Value::Array(items) => items.iter().any(contains_tagged),
        Value::Object(map) => map.values().any(contains_tagged),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn safe_integers_match_native(n in -MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER) {
        let text = format!("{{\"n\":{}}}", n);
        let native: serde_json::Value = serde_json::from_str(&text).unwrap();

        let parsed = parse(&text).unwrap();

        prop_assert_eq!(parsed.get("n"), Some(&Value::Int(n)));
        prop_assert_eq!(
            stringify(&parsed, None).unwrap(),
            serde_json::to_string(&native).unwrap()
        );
    }

    #[test]
    fn large_i64_round_trips(n in any::<i64>().prop_filter("outside safe range", |n| n.unsigned_abs() > MAX_SAFE_INTEGER as u64)) {
        let text = n.to_string();
        let value = parse(&text).unwrap();

        prop_assert_eq!(value.type_name(), "bignumber");
        prop_assert_eq!(value.as_i64(), Some(n));
        prop_assert_eq!(stringify(&value, None).unwrap(), text);
    }

    #[test]
    fn long_integer_literals_round_trip(digits in "-?[1-9][0-9]{16,60}") {
        let text = format!("{{\"id\":{}}}", digits);
        prop_assert_eq!(stringify(&parse(&text).unwrap(), None).unwrap(), text);
    }

    #[test]
    fn trees_round_trip_through_text(node in tree()) {
        let text = stringify(&node, None).unwrap();
        prop_assert_eq!(parse(&text).unwrap(), node.clone());

        let pretty = stringify(&node, Some(4)).unwrap();
        prop_assert_eq!(parse(&pretty).unwrap(), node);
    }

    #[test]
    fn unwrap_is_idempotent(node in tree(), preserve_raw in any::<bool>()) {
        let once = unwrap(&node, preserve_raw);

        prop_assert!(!contains_tagged(&once));
        prop_assert_eq!(unwrap(&once, preserve_raw), once);
    }

    #[test]
    fn projection_shape(
        headers in prop::collection::vec("k[a-c]", 0..5),
        rows in prop::collection::vec(prop::collection::vec(("k[a-e]", tree()), 0..5), 0..8),
    ) {
        let rows: Vec<Row> = rows
            .into_iter()
            .map(|entries| entries.into_iter().collect())
            .collect();
        let projected = project(&headers, &rows);

        prop_assert_eq!(projected.len(), rows.len());
        for (source, row) in rows.iter().zip(&projected) {
            prop_assert_eq!(row.columns().collect::<Vec<_>>(), headers.iter().map(String::as_str).collect::<Vec<_>>());
            for header in &headers {
                let expected = source.get(header).map(|v| unwrap(v, false));
                prop_assert_eq!(row.get(header), expected.as_ref());
            }
        }
    }
}
