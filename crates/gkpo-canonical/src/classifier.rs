//! Reducibility classification against family R.
//!
//! Family R holds the configurations reducible to the simple baseline: a fixed
//! (zero or scalar) reference, a constant weight, and purely additive
//! penalties. Each check runs independently and appends its reason in a fixed
//! order: reference, weight, gate.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::forms::{is_truthy, WeightForm};
use crate::normalizer::NormalizedDocument;

/// Why a configuration falls outside family R.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReducibilityReason {
    /// Reference is neither `fixed_zero` nor `fixed_scalar`.
    ReferenceShift,
    /// Weight depends on the score.
    ScoreDependentWeight,
    /// A penalty gates another term instead of adding to it.
    NonAdditiveGate,
}

impl ReducibilityReason {
    /// Wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReducibilityReason::ReferenceShift => "reference_shift",
            ReducibilityReason::ScoreDependentWeight => "score_dependent_weight",
            ReducibilityReason::NonAdditiveGate => "non_additive_gate",
        }
    }
}

/// Derived membership in family R.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reducibility {
    /// True iff `reasons` is empty.
    #[serde(rename = "inside_R")]
    pub inside_r: bool,
    /// Violations in evaluation order, each at most once.
    pub reasons: Vec<ReducibilityReason>,
    /// Producer-supplied evidence, carried verbatim and never interpreted.
    pub witness: Value,
}

/// A normalized document paired with its recomputed reducibility.
///
/// Only [`NormalizedDocument::classified`] builds one, so the hasher never
/// sees caller-claimed `inside_R`/`reasons`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedDocument {
    pub(crate) document: NormalizedDocument,
    pub(crate) reducibility: Reducibility,
}

impl ClassifiedDocument {
    /// The normalized document (still holding the caller's `reducibility` entry).
    pub fn document(&self) -> &NormalizedDocument {
        &self.document
    }

    /// The recomputed classification.
    pub fn reducibility(&self) -> &Reducibility {
        &self.reducibility
    }
}

impl NormalizedDocument {
    /// Classifies the document and binds the result to it.
    pub fn classified(self) -> ClassifiedDocument {
        let reducibility = classify(&self);
        ClassifiedDocument {
            document: self,
            reducibility,
        }
    }
}

/// Decides membership in family R.
pub fn classify(doc: &NormalizedDocument) -> Reducibility {
    let mut reasons = Vec::new();

    if !doc.reference_form().is_fixed() {
        reasons.push(ReducibilityReason::ReferenceShift);
    }

    match doc.weight_form() {
        WeightForm::ScoreDependent => reasons.push(ReducibilityReason::ScoreDependentWeight),
        WeightForm::Constant | WeightForm::Other(_) => {}
    }

    let gated = doc.penalties().iter().any(|p| {
        p.get("meta")
            .and_then(|meta| meta.get("gate"))
            .map(is_truthy)
            .unwrap_or(false)
    });
    if gated {
        reasons.push(ReducibilityReason::NonAdditiveGate);
    }

    debug!(
        inside_r = reasons.is_empty(),
        reasons = ?reasons,
        "classified document"
    );

    Reducibility {
        inside_r: reasons.is_empty(),
        reasons,
        witness: doc.witness(),
    }
}
