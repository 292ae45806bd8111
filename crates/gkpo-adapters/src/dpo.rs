use gkpo_canonical::CanonicalDocument;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AdapterError;
use crate::{float_at, require_reducible, str_at, MethodAdapter, Template};

const DEFAULT_CITATION: &str = "rafailov2023direct";

/// Native DPO params.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DpoParams {
    /// Fixed scalar reference offset.
    pub delta_ref: f64,
    /// Temperature.
    pub beta: f64,
    /// Loss family.
    pub loss: String,
    /// Link function.
    pub link: String,
}

impl Default for DpoParams {
    fn default() -> Self {
        Self {
            delta_ref: 0.0,
            beta: 1.0,
            loss: "logistic".to_string(),
            link: "identity".to_string(),
        }
    }
}

/// DPO adapter.
pub struct Dpo;

impl MethodAdapter for Dpo {
    type Params = DpoParams;
    const METHOD: &'static str = "DPO";

    fn to_gkpo(params: &DpoParams) -> CanonicalDocument {
        dpo_to_gkpo(params, None)
    }

    fn from_gkpo(doc: &Value) -> Result<DpoParams, AdapterError> {
        gkpo_to_dpo(doc)
    }
}

/// Encodes DPO params: constant weight, fixed scalar reference, no penalties.
pub fn dpo_to_gkpo(params: &DpoParams, citations: Option<&[String]>) -> CanonicalDocument {
    Template {
        method: Dpo::METHOD,
        citations: citations
            .map(<[String]>::to_vec)
            .unwrap_or_else(|| vec![DEFAULT_CITATION.to_string()]),
        delta_ref: params.delta_ref,
        beta: params.beta,
        link: &params.link,
        loss: &params.loss,
        penalties: Vec::new(),
    }
    .canonicalize()
}

/// Extracts DPO params from any document inside family R.
pub fn gkpo_to_dpo(doc: &Value) -> Result<DpoParams, AdapterError> {
    let canonical = require_reducible(doc, Dpo::METHOD)?;
    let fields = &canonical.document;

    Ok(DpoParams {
        delta_ref: float_at(fields, &["reference", "value"], 0.0)?,
        beta: float_at(fields, &["beta"], 1.0)?,
        loss: str_at(fields, &["loss"], "logistic")?,
        link: str_at(fields, &["link"], "identity")?,
    })
}
