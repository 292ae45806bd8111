use gkpo_canonical::CanonicalDocument;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AdapterError;
use crate::{float_at, require_reducible, MethodAdapter, Template};

const DEFAULT_CITATION: &str = "yuan2023rrhf";

/// One named ranking penalty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyTerm {
    /// Penalty name (canonical sort key).
    pub name: String,
    /// Penalty weight.
    pub lambda: f64,
}

/// Native RRHF params.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RrhfParams {
    /// Ranking penalties.
    pub penalties: Vec<PenaltyTerm>,
    /// Fixed scalar reference offset.
    pub delta_ref: f64,
    /// Temperature.
    pub beta: f64,
}

impl Default for RrhfParams {
    fn default() -> Self {
        Self {
            penalties: Vec::new(),
            delta_ref: 0.0,
            beta: 1.0,
        }
    }
}

/// RRHF adapter.
pub struct Rrhf;

impl MethodAdapter for Rrhf {
    type Params = RrhfParams;
    const METHOD: &'static str = "RRHF";

    fn to_gkpo(params: &RrhfParams) -> CanonicalDocument {
        rrhf_to_gkpo(params, None)
    }

    fn from_gkpo(doc: &Value) -> Result<RrhfParams, AdapterError> {
        gkpo_to_rrhf(doc)
    }
}

/// Encodes RRHF params: DPO-shaped document plus named additive penalties.
pub fn rrhf_to_gkpo(params: &RrhfParams, citations: Option<&[String]>) -> CanonicalDocument {
    Template {
        method: Rrhf::METHOD,
        citations: citations
            .map(<[String]>::to_vec)
            .unwrap_or_else(|| vec![DEFAULT_CITATION.to_string()]),
        delta_ref: params.delta_ref,
        beta: params.beta,
        link: "identity",
        loss: "logistic",
        penalties: params
            .penalties
            .iter()
            .map(|p| json!({"name": p.name, "lambda": p.lambda}))
            .collect(),
    }
    .canonicalize()
}

/// Extracts RRHF params from any document inside family R.
///
/// Penalties come back in canonical (name-sorted) order.
pub fn gkpo_to_rrhf(doc: &Value) -> Result<RrhfParams, AdapterError> {
    let canonical = require_reducible(doc, Rrhf::METHOD)?;
    let fields = &canonical.document;

    let penalties = match fields.get("penalties") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| penalty_term(idx, item))
            .collect::<Result<Vec<_>, _>>()?,
        _ => Vec::new(),
    };

    Ok(RrhfParams {
        penalties,
        delta_ref: float_at(fields, &["reference", "value"], 0.0)?,
        beta: float_at(fields, &["beta"], 1.0)?,
    })
}

fn penalty_term(idx: usize, item: &Value) -> Result<PenaltyTerm, AdapterError> {
    let name = item
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| AdapterError::InvalidField {
            field: format!("penalties[{}].name", idx),
            reason: "missing or not a string".to_string(),
        })?;
    let lambda = item
        .get("lambda")
        .and_then(Value::as_f64)
        .ok_or_else(|| AdapterError::InvalidField {
            field: format!("penalties[{}].lambda", idx),
            reason: "missing or not a number".to_string(),
        })?;

    Ok(PenaltyTerm {
        name: name.to_string(),
        lambda,
    })
}
