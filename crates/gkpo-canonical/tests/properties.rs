//! Property tests: idempotence and determinism of canonicalization.

use gkpo_canonical::{canonicalize_and_hash, normalize};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|i| json!(i)),
        (-1.0e6..1.0e6f64).prop_map(|f| json!(f)),
        "[a-z_]{0,8}".prop_map(Value::String),
    ]
}

fn nested() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn penalty() -> impl Strategy<Value = Value> {
    (
        prop::option::of("[a-c]{0,3}"),
        prop::option::of(-10.0..10.0f64),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(name, lambda, gate)| {
            let mut p = Map::new();
            if let Some(name) = name {
                p.insert("name".into(), json!(name));
            }
            if let Some(lambda) = lambda {
                p.insert("lambda".into(), json!(lambda));
            }
            if let Some(gate) = gate {
                p.insert("meta".into(), json!({"gate": gate, "note": "x"}));
            }
            Value::Object(p)
        })
}

fn document() -> impl Strategy<Value = Value> {
    (
        prop::option::of(prop_oneof![
            Just("constant"),
            Just("score_dependent")
        ]),
        prop::option::of(-5.0..5.0f64),
        prop::option::of(prop_oneof![
            Just("fixed_zero"),
            Just("fixed_scalar"),
            Just("per_prompt")
        ]),
        prop::option::of(-1.0..1.0f64),
        prop::collection::vec(penalty(), 0..5),
        prop::option::of(0.0..10.0f64),
        nested(),
        nested(),
    )
        .prop_map(
            |(wform, constant, rform, value, penalties, beta, score, extra)| {
                let mut doc = Map::new();
                let mut weight = Map::new();
                if let Some(f) = wform {
                    weight.insert("form".into(), json!(f));
                }
                if let Some(c) = constant {
                    weight.insert("constant".into(), json!(c));
                }
                doc.insert("weight".into(), Value::Object(weight));
                let mut reference = Map::new();
                if let Some(f) = rform {
                    reference.insert("form".into(), json!(f));
                }
                if let Some(v) = value {
                    reference.insert("value".into(), json!(v));
                }
                doc.insert("reference".into(), Value::Object(reference));
                doc.insert("penalties".into(), Value::Array(penalties));
                if let Some(b) = beta {
                    doc.insert("beta".into(), json!(b));
                }
                doc.insert("score".into(), score);
                doc.insert("extra".into(), extra);
                Value::Object(doc)
            },
        )
}

proptest! {
    #[test]
    fn canonicalization_is_idempotent(raw in document()) {
        let once = canonicalize_and_hash(&raw);
        let twice = canonicalize_and_hash(&once.to_value());
        prop_assert_eq!(&once.opal_hash, &twice.opal_hash);
        prop_assert_eq!(once.projection.to_bytes(), twice.projection.to_bytes());
        prop_assert_eq!(once.to_value(), twice.to_value());
    }

    #[test]
    fn normalize_is_a_fixed_point(raw in document()) {
        let once = normalize(&raw);
        let twice = normalize(&Value::Object(once.as_map().clone()));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn hashing_is_deterministic(raw in document()) {
        let text = serde_json::to_string(&raw).unwrap();
        let reparsed: Value = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(
            canonicalize_and_hash(&raw).opal_hash,
            canonicalize_and_hash(&reparsed).opal_hash
        );
    }

    #[test]
    fn inside_r_iff_no_reasons(raw in document()) {
        let doc = canonicalize_and_hash(&raw);
        prop_assert_eq!(doc.inside_r(), doc.reducibility.reasons.is_empty());
    }

    #[test]
    fn witness_never_reaches_the_digest(raw in document(), witness in nested()) {
        let mut with_witness = raw.clone();
        with_witness["reducibility"] = json!({"witness": witness});
        prop_assert_eq!(
            canonicalize_and_hash(&raw).opal_hash,
            canonicalize_and_hash(&with_witness).opal_hash
        );
    }
}
