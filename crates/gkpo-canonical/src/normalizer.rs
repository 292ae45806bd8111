//! Default filling and shape normalization.
//!
//! [`normalize`] accepts any JSON value. Unknown fields pass through, missing
//! or `null` top-level fields take their documented defaults, and every float
//! outside `reducibility` is rounded to [`ROUND_PLACES`](crate::ROUND_PLACES).

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::forms::{ReferenceForm, WeightForm};
use crate::numeric::{
    coerce_f64, display_string, round_all, round_f64, round_value, SCHEMA_VERSION,
};

/// A fully-defaulted GKPO document.
///
/// Built only by [`normalize`]. The caller-supplied `reducibility` entry is
/// still present at this stage; it is replaced once the document is
/// [classified](NormalizedDocument::classified).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedDocument {
    pub(crate) fields: Map<String, Value>,
}

impl NormalizedDocument {
    /// Looks up a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All top-level fields.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consumes the document into its field map.
    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    /// Tagged form of `weight`.
    pub fn weight_form(&self) -> WeightForm {
        WeightForm::from_tag(self.fields.get("weight").and_then(|w| w.get("form")))
    }

    /// Tagged form of `reference`.
    pub fn reference_form(&self) -> ReferenceForm {
        ReferenceForm::from_tag(self.fields.get("reference").and_then(|r| r.get("form")))
    }

    /// Penalty terms in canonical order; empty when `penalties` is not a list.
    pub fn penalties(&self) -> &[Value] {
        match self.fields.get("penalties") {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }

    /// Caller-supplied `reducibility.witness`, or an empty mapping.
    pub fn witness(&self) -> Value {
        self.fields
            .get("reducibility")
            .and_then(|r| r.get("witness"))
            .filter(|w| !w.is_null())
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }
}

/// Maps a raw document to its canonical shape without touching the input.
pub fn normalize(raw: &Value) -> NormalizedDocument {
    let mut fields = match raw {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    fill_default(&mut fields, "version", json!(SCHEMA_VERSION));
    let weight = normalize_weight(fields.get("weight"));
    fields.insert("weight".to_string(), weight);
    fill_default(
        &mut fields,
        "reference",
        json!({"form": "fixed_zero", "value": 0.0}),
    );
    fill_default(&mut fields, "link", json!("identity"));
    fill_default(&mut fields, "loss", json!("logistic"));
    fill_default(&mut fields, "beta", json!(1.0));
    let penalties = normalize_penalties(fields.get("penalties"));
    fields.insert("penalties".to_string(), penalties);
    let dataset_ops = normalize_dataset_ops(fields.get("dataset_ops"));
    fields.insert("dataset_ops".to_string(), dataset_ops);
    if !matches!(fields.get("provenance"), Some(Value::Object(_))) {
        fields.insert("provenance".to_string(), Value::Object(Map::new()));
    }

    // reducibility is recomputed downstream; its witness stays verbatim
    let fields = fields
        .into_iter()
        .map(|(key, value)| {
            let value = if key == "reducibility" {
                value
            } else {
                round_all(&value)
            };
            (key, value)
        })
        .collect();

    NormalizedDocument { fields }
}

/// Rebuilds every object with its keys in sorted order.
pub fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

fn fill_default(fields: &mut Map<String, Value>, key: &str, default: Value) {
    if fields.get(key).map_or(true, Value::is_null) {
        fields.insert(key.to_string(), default);
    }
}

fn normalize_weight(weight: Option<&Value>) -> Value {
    let mut w = match weight {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };

    fill_default(&mut w, "form", json!("constant"));
    if w.get("form") == Some(&json!("constant")) {
        let constant = match w.get("constant") {
            None | Some(Value::Null) => json!(1.0),
            Some(raw) => coerce_f64(raw)
                .map(|f| json!(round_f64(f)))
                .unwrap_or_else(|| raw.clone()),
        };
        w.insert("constant".to_string(), constant);
    }
    if let Some(Value::Array(factors)) = w.get("factors") {
        let mut names: Vec<String> = factors.iter().map(display_string).collect();
        names.sort();
        w.insert(
            "factors".to_string(),
            Value::Array(names.into_iter().map(Value::String).collect()),
        );
    }

    Value::Object(w)
}

fn normalize_penalties(penalties: Option<&Value>) -> Value {
    let items = match penalties {
        None | Some(Value::Null) => return Value::Array(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => return other.clone(),
    };

    let mut keyed: Vec<(String, Value)> = items
        .iter()
        .map(|p| {
            let name = p.get("name").map(display_string).unwrap_or_default();
            (name, normalize_penalty(p))
        })
        .collect();
    // stable: ties keep their original relative order
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    Value::Array(keyed.into_iter().map(|(_, p)| p).collect())
}

fn normalize_penalty(penalty: &Value) -> Value {
    let Value::Object(map) = penalty else {
        return penalty.clone();
    };
    let mut q = map.clone();
    if let Some(lambda) = q.get("lambda") {
        let rounded = round_value(lambda);
        q.insert("lambda".to_string(), rounded);
    }
    if let Some(meta @ Value::Object(_)) = q.get("meta") {
        let sorted = sort_keys(meta);
        q.insert("meta".to_string(), sorted);
    }
    Value::Object(q)
}

fn normalize_dataset_ops(ops: Option<&Value>) -> Value {
    match ops {
        None | Some(Value::Null) => default_dataset_ops(),
        Some(Value::Object(map)) => {
            let mut m = map.clone();
            if let Value::Object(defaults) = default_dataset_ops() {
                for (key, default) in defaults {
                    fill_default(&mut m, &key, default);
                }
            }
            Value::Object(m)
        }
        Some(other) => other.clone(),
    }
}

fn default_dataset_ops() -> Value {
    json!({
        "group_weights": [],
        "group_penalties": [],
        "composition": "dataset_then_policy"
    })
}
