use gkpo_canonical::{
    canonicalize_and_hash, to_canonical_bytes, OpalHash, Reducibility, ReducibilityReason,
};
use serde_json::json;

const EMPTY_DOCUMENT_BYTES: &str = concat!(
    r#"{"beta":1.0,"#,
    r#""dataset_ops":{"composition":"dataset_then_policy","group_penalties":[],"group_weights":[]},"#,
    r#""link":"identity","loss":"logistic","penalties":[],"#,
    r#""provenance":{"citations":null,"method":null},"#,
    r#""reducibility":{"inside_R":true,"reasons":[]},"#,
    r#""reference":{"form":"fixed_zero","value":0.0},"#,
    r#""score":null,"version":"gkpo-1.0","#,
    r#""weight":{"constant":1.0,"form":"constant"}}"#
);

#[test]
fn empty_document_projects_to_golden_bytes() {
    let doc = canonicalize_and_hash(&json!({}));
    assert_eq!(
        String::from_utf8(doc.projection.to_bytes()).unwrap(),
        EMPTY_DOCUMENT_BYTES
    );
    assert_eq!(
        doc.opal_hash.as_str(),
        "f92d0966d913f6262bb2f3dbab6219bfc7c29cae25c251453696689593937882"
    );
}

#[test]
fn dpo_style_document_has_golden_hash() {
    let doc = canonicalize_and_hash(&json!({
        "version": "gkpo-1.0",
        "score": {"type": "logpi"},
        "weight": {"form": "constant", "constant": 1.0},
        "reference": {"form": "fixed_scalar", "value": 0.1},
        "link": "identity",
        "loss": "logistic",
        "beta": 1.0,
        "penalties": [],
        "dataset_ops": {"group_weights": [], "group_penalties": [], "composition": "dataset_then_policy"},
        "provenance": {"method": "DPO", "citations": ["rafailov2023direct"]},
        "reducibility": {"inside_R": true, "reasons": [], "witness": {}}
    }));
    assert_eq!(
        doc.opal_hash.as_str(),
        "06efb8c264580a44695b50484a67f790db5b338d6b87f7d9893445c7ff2f13f6"
    );
}

#[test]
fn canonical_bytes_sort_keys_and_drop_whitespace() {
    let value = json!({"b": 1, "a": {"nested": 2.50, "list": [3, 1.0, "x"]}});
    assert_eq!(
        to_canonical_bytes(&value),
        br#"{"a":{"list":[3,1.0,"x"],"nested":2.5},"b":1}"#.to_vec()
    );
}

#[test]
fn canonical_bytes_spell_numbers_like_existing_corpora() {
    let value: serde_json::Value = serde_json::from_str(
        r#"{"tie": 82214232415657.62, "neg": -723804013522413.2, "wide": 100000000000000000001}"#,
    )
    .unwrap();
    assert_eq!(
        to_canonical_bytes(&value),
        br#"{"neg":-723804013522413.2,"tie":82214232415657.62,"wide":100000000000000000001}"#
            .to_vec()
    );
}

#[test]
fn canonical_bytes_escape_controls_but_keep_unicode() {
    let value = json!({"s": "tab\there \"q\" é\u{1}"});
    assert_eq!(
        String::from_utf8(to_canonical_bytes(&value)).unwrap(),
        "{\"s\":\"tab\\there \\\"q\\\" é\\u0001\"}"
    );
}

#[test]
fn reducibility_matches_expected_shape() {
    let reducibility = Reducibility {
        inside_r: false,
        reasons: vec![
            ReducibilityReason::ReferenceShift,
            ReducibilityReason::NonAdditiveGate,
        ],
        witness: json!({"raw_gap": 0.2}),
    };

    let serialized = serde_json::to_value(&reducibility).unwrap();
    let expected = json!({
        "inside_R": false,
        "reasons": ["reference_shift", "non_additive_gate"],
        "witness": {"raw_gap": 0.2}
    });

    assert_eq!(serialized, expected);
    assert_eq!(reducibility.to_value(), expected);
}

#[test]
fn opal_hash_parse_rejects_non_hex() {
    let digest = canonicalize_and_hash(&json!({})).opal_hash;
    assert_eq!(OpalHash::parse(digest.as_str()).unwrap(), digest);
    assert!(OpalHash::parse("F92D0966").is_err());
    assert!(OpalHash::parse(digest.as_str().to_uppercase()).is_err());
    assert_eq!(
        serde_json::to_string(&digest).unwrap(),
        format!("\"{}\"", digest)
    );
}

#[test]
fn document_carries_hash_and_recomputed_reducibility() {
    let doc = canonicalize_and_hash(&json!({
        "provenance": {"method": "X", "notes": "kept"},
        "reducibility": {"inside_R": false, "reasons": ["bogus"], "witness": {"k": 1}},
        "custom_field": {"z": 1, "a": 2}
    }));
    let value = doc.to_value();

    assert_eq!(value["provenance"]["opal_hash"], json!(doc.opal_hash.as_str()));
    assert_eq!(value["provenance"]["notes"], json!("kept"));
    assert_eq!(
        value["reducibility"],
        json!({"inside_R": true, "reasons": [], "witness": {"k": 1}})
    );
    assert_eq!(value["custom_field"], json!({"a": 2, "z": 1}));
    assert!(doc.projection.as_value().get("custom_field").is_none());
}
