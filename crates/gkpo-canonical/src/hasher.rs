//! Canonical projection and `opal_hash` computation.
//!
//! The digest is `sha256(canonical_bytes(projection))`, lowercase hex. The
//! projection is built field by field, so anything not named here (unknown
//! top-level fields, prior `opal_hash` values, `provenance.notes`,
//! `reducibility.witness`) cannot influence the digest.

use serde::Serialize;
use serde_json::{json, Map, Value};
use sha2::{Digest as Sha2Digest, Sha256};
use tracing::{debug, trace};

use crate::classifier::{ClassifiedDocument, Reducibility};
use crate::digest::OpalHash;
use crate::encoding::to_canonical_bytes;
use crate::normalizer::{normalize, sort_keys};
use crate::numeric::round_all;

/// Provenance keys that participate in the digest.
const PROVENANCE_KEYS: [&str; 2] = ["method", "citations"];

/// The exact value whose canonical bytes are hashed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CanonicalProjection(Value);

impl CanonicalProjection {
    /// Projection as a JSON value (keys sorted, floats rounded).
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Canonical bytes fed to the digest.
    pub fn to_bytes(&self) -> Vec<u8> {
        to_canonical_bytes(&self.0)
    }
}

/// Output of [`canonicalize_and_hash`].
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalDocument {
    /// Normalized document with recomputed `reducibility` and
    /// `provenance.opal_hash` written in.
    pub document: Map<String, Value>,
    /// Projection retained for inspection and diffing.
    pub projection: CanonicalProjection,
    /// Digest of the projection.
    pub opal_hash: OpalHash,
    /// Recomputed classification.
    pub reducibility: Reducibility,
}

impl CanonicalDocument {
    /// The enriched document as a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.document.clone())
    }

    /// Shorthand for `reducibility.inside_r`.
    pub fn inside_r(&self) -> bool {
        self.reducibility.inside_r
    }
}

/// Outcome of checking a stored `provenance.opal_hash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashVerification {
    /// Stored digest equals the recomputed one.
    Match(OpalHash),
    /// Stored digest differs from the recomputed one.
    Mismatch {
        /// Digest found in the document.
        claimed: String,
        /// Digest recomputed from the projection.
        computed: OpalHash,
    },
    /// The document carries no digest.
    Missing {
        /// Digest recomputed from the projection.
        computed: OpalHash,
    },
}

impl HashVerification {
    /// True only for [`HashVerification::Match`].
    pub fn is_match(&self) -> bool {
        matches!(self, HashVerification::Match(_))
    }
}

impl Reducibility {
    /// JSON form written into canonical documents.
    pub fn to_value(&self) -> Value {
        json!({
            "inside_R": self.inside_r,
            "reasons": self.reason_tags(),
            "witness": self.witness.clone(),
        })
    }

    fn reason_tags(&self) -> Value {
        Value::Array(
            self.reasons
                .iter()
                .map(|r| Value::String(r.as_str().to_string()))
                .collect(),
        )
    }
}

/// Builds the hashed projection of a classified document.
pub fn project(doc: &ClassifiedDocument) -> CanonicalProjection {
    let fields = doc.document().as_map();
    let field = |key: &str| fields.get(key).cloned().unwrap_or(Value::Null);

    let provenance: Map<String, Value> = PROVENANCE_KEYS
        .iter()
        .map(|key| {
            let value = fields
                .get("provenance")
                .and_then(|p| p.get(*key))
                .cloned()
                .unwrap_or(Value::Null);
            (key.to_string(), value)
        })
        .collect();

    let reducibility = doc.reducibility();
    let projection = json!({
        "version": field("version"),
        "score": field("score"),
        "weight": field("weight"),
        "reference": field("reference"),
        "link": field("link"),
        "loss": field("loss"),
        "beta": field("beta"),
        "penalties": field("penalties"),
        "dataset_ops": field("dataset_ops"),
        "reducibility": {
            "inside_R": reducibility.inside_r,
            "reasons": reducibility.reason_tags(),
        },
        "provenance": provenance,
    });

    CanonicalProjection(sort_keys(&round_all(&projection)))
}

/// Computes the projection and its digest.
pub fn hash(doc: &ClassifiedDocument) -> (CanonicalProjection, OpalHash) {
    let projection = project(doc);
    let bytes = projection.to_bytes();
    trace!(bytes = %String::from_utf8_lossy(&bytes), "canonical projection");

    let digest = Sha256::digest(&bytes);
    let opal_hash = OpalHash::from_bytes(&digest);
    debug!(%opal_hash, "hashed canonical projection");

    (projection, opal_hash)
}

/// Normalizes, classifies, and hashes a raw document.
pub fn canonicalize_and_hash(raw: &Value) -> CanonicalDocument {
    let classified = normalize(raw).classified();
    let (projection, opal_hash) = hash(&classified);

    let ClassifiedDocument {
        document,
        reducibility,
    } = classified;
    let mut fields = document.into_map();
    fields.insert("reducibility".to_string(), reducibility.to_value());
    if let Some(Value::Object(provenance)) = fields.get_mut("provenance") {
        provenance.insert(
            "opal_hash".to_string(),
            Value::String(opal_hash.as_str().to_string()),
        );
    }

    CanonicalDocument {
        document: fields,
        projection,
        opal_hash,
        reducibility,
    }
}

/// Recomputes the digest of a document and compares it with the stored one.
pub fn verify_opal_hash(raw: &Value) -> HashVerification {
    let computed = canonicalize_and_hash(raw).opal_hash;
    let claimed = raw
        .get("provenance")
        .and_then(|p| p.get("opal_hash"))
        .and_then(Value::as_str);

    match claimed {
        None => HashVerification::Missing { computed },
        Some(claimed) if claimed == computed.as_str() => HashVerification::Match(computed),
        Some(claimed) => HashVerification::Mismatch {
            claimed: claimed.to_string(),
            computed,
        },
    }
}
