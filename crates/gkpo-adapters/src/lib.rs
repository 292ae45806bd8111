//! Method adapters for GKPO documents.
//!
//! Each adapter is a pair of pure functions: native params → canonical GKPO
//! document (built, normalized, and hashed by `gkpo-canonical`) and GKPO
//! document → native params. Decoding canonicalizes first and refuses any
//! document outside family R with [`AdapterError::Irreducible`].
//!
//! ```rust
//! use gkpo_adapters::{dpo_to_gkpo, gkpo_to_dpo, DpoParams};
//!
//! let params = DpoParams { delta_ref: 0.1, ..DpoParams::default() };
//! let doc = dpo_to_gkpo(&params, None);
//! let back = gkpo_to_dpo(&doc.to_value())?;
//! assert!((back.delta_ref - 0.1).abs() < 1e-6);
//! # Ok::<(), gkpo_adapters::AdapterError>(())
//! ```
#![deny(missing_docs)]

/// DPO adapter.
pub mod dpo;
/// Error types for adapter operations.
pub mod errors;
/// RRHF adapter.
pub mod rrhf;

pub use dpo::{dpo_to_gkpo, gkpo_to_dpo, Dpo, DpoParams};
pub use errors::AdapterError;
pub use rrhf::{gkpo_to_rrhf, rrhf_to_gkpo, PenaltyTerm, Rrhf, RrhfParams};

use gkpo_canonical::{canonicalize_and_hash, CanonicalDocument, SCHEMA_VERSION};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

/// A bidirectional mapping between a method's native params and GKPO.
pub trait MethodAdapter {
    /// Method-native parameter set.
    type Params: Serialize + DeserializeOwned;

    /// Name written to `provenance.method`.
    const METHOD: &'static str;

    /// Builds, normalizes, and hashes the GKPO document for `params`.
    fn to_gkpo(params: &Self::Params) -> CanonicalDocument;

    /// Extracts native params; fails when the document is outside family R.
    fn from_gkpo(doc: &Value) -> Result<Self::Params, AdapterError>;
}

/// Methods with an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Direct Preference Optimization.
    Dpo,
    /// Rank Responses to align Human Feedback.
    Rrhf,
}

impl Method {
    /// Encodes native params given as JSON.
    pub fn encode(&self, params: &Value) -> Result<CanonicalDocument, AdapterError> {
        match self {
            Method::Dpo => encode_with::<Dpo>(params),
            Method::Rrhf => encode_with::<Rrhf>(params),
        }
    }

    /// Decodes a GKPO document into native params as JSON.
    pub fn decode(&self, doc: &Value) -> Result<Value, AdapterError> {
        match self {
            Method::Dpo => decode_with::<Dpo>(doc),
            Method::Rrhf => decode_with::<Rrhf>(doc),
        }
    }

    /// Provenance name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Dpo => Dpo::METHOD,
            Method::Rrhf => Rrhf::METHOD,
        }
    }
}

impl FromStr for Method {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dpo" => Ok(Method::Dpo),
            "rrhf" => Ok(Method::Rrhf),
            _ => Err(AdapterError::UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn encode_with<A: MethodAdapter>(params: &Value) -> Result<CanonicalDocument, AdapterError> {
    let params: A::Params = serde_json::from_value(params.clone())?;
    Ok(A::to_gkpo(&params))
}

fn decode_with<A: MethodAdapter>(doc: &Value) -> Result<Value, AdapterError> {
    let params = A::from_gkpo(doc)?;
    Ok(serde_json::to_value(params)?)
}

/// Fields shared by every adapter's document template.
pub(crate) struct Template<'a> {
    pub method: &'static str,
    pub citations: Vec<String>,
    pub delta_ref: f64,
    pub beta: f64,
    pub link: &'a str,
    pub loss: &'a str,
    pub penalties: Vec<Value>,
}

impl Template<'_> {
    /// Builds the raw document and runs it through the canonical pipeline.
    pub fn canonicalize(self) -> CanonicalDocument {
        let raw = json!({
            "version": SCHEMA_VERSION,
            "score": {"type": "logpi"},
            "weight": {"form": "constant", "constant": 1.0},
            "reference": {"form": "fixed_scalar", "value": self.delta_ref},
            "link": self.link,
            "loss": self.loss,
            "beta": self.beta,
            "penalties": self.penalties,
            "dataset_ops": {
                "group_weights": [],
                "group_penalties": [],
                "composition": "dataset_then_policy"
            },
            "provenance": {"method": self.method, "citations": self.citations},
            "reducibility": {"inside_R": true, "reasons": [], "witness": {}}
        });
        canonicalize_and_hash(&raw)
    }
}

/// Canonicalizes `doc` and rejects it unless it lies inside family R.
pub(crate) fn require_reducible(
    doc: &Value,
    method: &'static str,
) -> Result<CanonicalDocument, AdapterError> {
    let canonical = canonicalize_and_hash(doc);
    if !canonical.inside_r() {
        tracing::warn!(
            method,
            opal_hash = %canonical.opal_hash,
            reasons = ?canonical.reducibility.reasons,
            "document is outside family R"
        );
        return Err(AdapterError::Irreducible {
            method,
            reasons: canonical.reducibility.reasons,
        });
    }
    Ok(canonical)
}

/// Reads an optional float at `path`; absent or null yields `default`.
pub(crate) fn float_at(
    map: &Map<String, Value>,
    path: &[&str],
    default: f64,
) -> Result<f64, AdapterError> {
    match lookup(map, path) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value.as_f64().ok_or_else(|| AdapterError::InvalidField {
            field: path.join("."),
            reason: format!("expected a number, found {}", value),
        }),
    }
}

/// Reads an optional string at `path`; absent or null yields `default`.
pub(crate) fn str_at(
    map: &Map<String, Value>,
    path: &[&str],
    default: &str,
) -> Result<String, AdapterError> {
    match lookup(map, path) {
        None | Some(Value::Null) => Ok(default.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(value) => Err(AdapterError::InvalidField {
            field: path.join("."),
            reason: format!("expected a string, found {}", value),
        }),
    }
}

fn lookup<'a>(map: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    rest.iter().try_fold(map.get(*first)?, |value, key| value.get(*key))
}
