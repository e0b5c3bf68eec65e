//! Property-based tests for the XML mapping
//!
//! These tests use proptest to verify:
//! 1. Roundtrip property: decode(encode(value)) is text-equivalent to value
//! 2. Pretty and compact output decode to the same tree
//! 3. Arbitrary input never panics the decoder

use proptest::prelude::*;
use jsonxml::{from_xml, text_equivalent, to_xml, to_xml_pretty, Object, Value};

/// Field names that are valid XML names, with the `element` item tag mixed in
fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just("element".to_string()),
        4 => "[a-z_][a-zA-Z0-9_.-]{0,8}",
    ]
}

/// Non-blank text; blank text can't survive the trip
fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9<>&'\" ]{0,12}[a-zA-Z0-9<>&'\"]"
}

/// Trees that map onto XML without loss. Null is left out because it comes
/// back as an empty object.
fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        (-1e6f64..1e6f64).prop_map(Value::Number),
        any::<i32>().prop_map(Value::from),
        arb_text().prop_map(Value::String),
    ];

    leaf.prop_recursive(6, 128, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::from),
            prop::collection::vec((arb_key(), inner), 0..8)
                .prop_map(|fields| Value::Object(fields.into_iter().collect())),
        ]
    })
}

/// Top-level documents: an object or an array. A root object whose only key
/// is `element` reads back as an array, so it is left out.
fn arb_document() -> impl Strategy<Value = Value> {
    prop_oneof![
        prop::collection::vec((arb_key(), arb_value()), 0..8)
            .prop_map(|fields| fields.into_iter().collect::<Object>())
            .prop_filter("root made only of <element>", |obj| {
                obj.is_empty() || obj.keys().any(|k| k != "element")
            })
            .prop_map(Value::Object),
        prop::collection::vec(arb_value(), 0..8).prop_map(Value::from),
    ]
}

proptest! {
    #[test]
    fn roundtrip_is_text_equivalent(value in arb_document()) {
        let xml = to_xml(&value);
        let decoded = from_xml(&xml);
        prop_assert!(decoded.is_ok(), "failed to decode {xml}: {decoded:?}");
        if let Ok(decoded) = decoded {
            prop_assert!(text_equivalent(&value, &decoded), "{value:?} -> {xml} -> {decoded:?}");
        }
    }

    #[test]
    fn pretty_and_compact_decode_alike(value in arb_document()) {
        let compact = from_xml(&to_xml(&value));
        let pretty = from_xml(&to_xml_pretty(&value));
        prop_assert_eq!(compact, pretty);
    }

    #[test]
    fn arbitrary_text_never_panics(input in "\\PC{0,64}") {
        let _result = from_xml(&input);
    }

    #[test]
    fn tag_soup_never_panics(input in r#"(<[a-z:]{0,3}( isArray="true")?/?>|</[a-z:]{0,3}>|[a-z ]{0,3}|&[a-z#0-9]{0,4};?){0,12}"#) {
        let _result = from_xml(&input);
    }
}
