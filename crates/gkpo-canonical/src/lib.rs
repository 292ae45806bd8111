//! Canonical form primitives for GKPO preference-optimization configs.
//!
//! A GKPO document describes a preference-optimization loss (DPO, RRHF-style
//! objectives, ...) as an open JSON mapping. This crate turns any such
//! document into a fully-defaulted canonical form, classifies whether it lies
//! inside the baseline family R, and computes the `opal_hash` equivalence key.
//!
//! Pipeline: raw JSON → [`normalize`] → [`NormalizedDocument::classified`] →
//! [`hash`]. [`canonicalize_and_hash`] runs all three.
//!
//! Core invariants:
//! - Canonicalization is idempotent, including the digest
//! - `reducibility` is always recomputed; only `witness` is carried over
//! - `opal_hash` depends only on the explicit projection built by the hasher
//! - Every call is pure: no caches, no process-wide state
//!
#![deny(missing_docs)]

/// Reducibility classification against family R.
pub mod classifier;
/// Digest newtype for `opal_hash` values.
pub mod digest;
/// Compact deterministic byte encoding of JSON values.
pub mod encoding;
/// Equivalence reports and field-level diffs over canonical projections.
pub mod equivalence;
/// Tagged `weight`/`reference` forms as closed sum types.
pub mod forms;
/// Canonical projection and `opal_hash` computation.
pub mod hasher;
/// Default filling and shape normalization.
pub mod normalizer;
/// Fixed-precision rounding and float text formatting.
pub mod numeric;
/// Validation errors for canonical primitives.
pub mod validation;

pub use classifier::{classify, ClassifiedDocument, Reducibility, ReducibilityReason};
pub use digest::OpalHash;
pub use encoding::to_canonical_bytes;
pub use equivalence::{
    compare, diff_projections, flatten, CompareOptions, DocumentSummary, EquivalenceReport,
    FieldDiff,
};
pub use forms::{ReferenceForm, WeightForm};
pub use hasher::{
    canonicalize_and_hash, hash, verify_opal_hash, CanonicalDocument, CanonicalProjection,
    HashVerification,
};
pub use normalizer::{normalize, NormalizedDocument};
pub use numeric::{ROUND_PLACES, SCHEMA_VERSION};
pub use validation::ValidationError;
