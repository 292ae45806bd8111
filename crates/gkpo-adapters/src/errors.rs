use gkpo_canonical::ReducibilityReason;
use thiserror::Error;

/// Errors raised while converting between native params and GKPO documents.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// The document lies outside family R, so the method cannot express it.
    #[error("not reducible to {method}: [{}]", join_reasons(.reasons))]
    Irreducible {
        /// Target method name.
        method: &'static str,
        /// Violations reported by the classifier.
        reasons: Vec<ReducibilityReason>,
    },
    /// A field needed for extraction has the wrong shape.
    #[error("invalid field {field}: {reason}")]
    InvalidField {
        /// Key path of the offending field.
        field: String,
        /// What was wrong with it.
        reason: String,
    },
    /// Method name not handled by any adapter.
    #[error("unknown method: {0}")]
    UnknownMethod(String),
    /// Native params could not be (de)serialized.
    #[error("invalid params: {0}")]
    Params(#[from] serde_json::Error),
}

fn join_reasons(reasons: &[ReducibilityReason]) -> String {
    reasons
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
