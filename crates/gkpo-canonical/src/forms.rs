use serde_json::Value;
use std::fmt;

use crate::encoding::to_canonical_string;

/// Form of the `weight` term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeightForm {
    /// Scalar weight carried in `weight.constant`.
    Constant,
    /// Weight computed from the score through an opaque function reference.
    ScoreDependent,
    /// Any tag this schema version does not name.
    Other(String),
}

impl WeightForm {
    /// Parses the `form` tag; a missing or falsy tag means [`WeightForm::Constant`].
    pub fn from_tag(tag: Option<&Value>) -> Self {
        match tag_text(tag).as_deref() {
            None | Some("constant") => WeightForm::Constant,
            Some("score_dependent") => WeightForm::ScoreDependent,
            Some(other) => WeightForm::Other(other.to_string()),
        }
    }

    /// Wire tag.
    pub fn as_str(&self) -> &str {
        match self {
            WeightForm::Constant => "constant",
            WeightForm::ScoreDependent => "score_dependent",
            WeightForm::Other(tag) => tag,
        }
    }
}

impl fmt::Display for WeightForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form of the `reference` (baseline) term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceForm {
    /// Zero baseline.
    FixedZero,
    /// Constant baseline carried in `reference.value`.
    FixedScalar,
    /// Baseline that varies per prompt.
    PerPrompt,
    /// Any tag this schema version does not name.
    Other(String),
}

impl ReferenceForm {
    /// Parses the `form` tag; a missing or falsy tag means [`ReferenceForm::FixedZero`].
    pub fn from_tag(tag: Option<&Value>) -> Self {
        match tag_text(tag).as_deref() {
            None | Some("fixed_zero") => ReferenceForm::FixedZero,
            Some("fixed_scalar") => ReferenceForm::FixedScalar,
            Some("per_prompt") => ReferenceForm::PerPrompt,
            Some(other) => ReferenceForm::Other(other.to_string()),
        }
    }

    /// True for the baselines that stay inside family R.
    pub fn is_fixed(&self) -> bool {
        match self {
            ReferenceForm::FixedZero | ReferenceForm::FixedScalar => true,
            ReferenceForm::PerPrompt | ReferenceForm::Other(_) => false,
        }
    }

    /// Wire tag.
    pub fn as_str(&self) -> &str {
        match self {
            ReferenceForm::FixedZero => "fixed_zero",
            ReferenceForm::FixedScalar => "fixed_scalar",
            ReferenceForm::PerPrompt => "per_prompt",
            ReferenceForm::Other(tag) => tag,
        }
    }
}

impl fmt::Display for ReferenceForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Truthiness of a JSON value: `false`, `null`, zero, and empty
/// strings/arrays/objects are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn tag_text(tag: Option<&Value>) -> Option<String> {
    match tag {
        Some(value) if is_truthy(value) => Some(match value {
            Value::String(s) => s.clone(),
            other => to_canonical_string(other),
        }),
        _ => None,
    }
}
