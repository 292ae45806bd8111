//! Equivalence reports over canonical projections.
//!
//! Two documents are equivalent iff their `opal_hash` values match. The
//! field-level diff is informational: it flattens both projections into
//! dotted key paths (lists are compared whole) and skips ignored prefixes.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::classifier::ReducibilityReason;
use crate::digest::OpalHash;
use crate::hasher::{canonicalize_and_hash, CanonicalDocument};

/// Options for [`compare`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareOptions {
    /// Compute the diff even when the digests match.
    pub show_diff: bool,
    /// Key-path prefixes left out of the diff (default: `provenance`).
    pub ignore: Vec<String>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            show_diff: false,
            ignore: vec!["provenance".to_string()],
        }
    }
}

/// Digest and flags of one side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSummary {
    /// Digest of the canonical projection.
    pub opal_hash: OpalHash,
    /// Membership in family R.
    #[serde(rename = "inside_R")]
    pub inside_r: bool,
    /// Reducibility reasons.
    pub reasons: Vec<ReducibilityReason>,
}

impl From<&CanonicalDocument> for DocumentSummary {
    fn from(doc: &CanonicalDocument) -> Self {
        Self {
            opal_hash: doc.opal_hash.clone(),
            inside_r: doc.reducibility.inside_r,
            reasons: doc.reducibility.reasons.clone(),
        }
    }
}

/// One differing key path; `None` marks a side where the path is absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDiff {
    /// Dotted key path.
    pub path: String,
    /// Value in the left projection.
    pub left: Option<Value>,
    /// Value in the right projection.
    pub right: Option<Value>,
}

/// Result of [`compare`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquivalenceReport {
    /// Left document.
    pub left: DocumentSummary,
    /// Right document.
    pub right: DocumentSummary,
    /// True iff the digests match.
    pub equivalent: bool,
    /// Field-level differences, present on mismatch or when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diffs: Option<Vec<FieldDiff>>,
}

/// Dotted key path under construction.
#[derive(Debug, Clone, Default)]
struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Flattens nested objects into dotted key paths.
///
/// Arrays and scalars are leaves; an empty object contributes no paths.
pub fn flatten(value: &Value) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();
    flatten_into(value, KeyPath::default(), &mut out);
    out
}

fn flatten_into(value: &Value, path: KeyPath, out: &mut BTreeMap<String, Value>) {
    match value {
        Value::Object(map) => flatten_map(map, &path, out),
        leaf => {
            out.insert(path.to_string(), leaf.clone());
        }
    }
}

fn flatten_map(map: &Map<String, Value>, path: &KeyPath, out: &mut BTreeMap<String, Value>) {
    for (key, child) in map {
        flatten_into(child, path.push_field(key), out);
    }
}

fn is_ignored(path: &str, ignore: &[String]) -> bool {
    ignore.iter().any(|prefix| {
        path == prefix
            || path
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
    })
}

/// Diffs two projections by key path, sorted by path.
pub fn diff_projections(left: &Value, right: &Value, ignore: &[String]) -> Vec<FieldDiff> {
    let flat_left = flatten(left);
    let flat_right = flatten(right);
    let paths: BTreeSet<&String> = flat_left.keys().chain(flat_right.keys()).collect();

    paths
        .into_iter()
        .filter(|path| !is_ignored(path, ignore))
        .filter_map(|path| {
            let l = flat_left.get(path);
            let r = flat_right.get(path);
            (l != r).then(|| FieldDiff {
                path: path.clone(),
                left: l.cloned(),
                right: r.cloned(),
            })
        })
        .collect()
}

/// Canonicalizes both documents and reports whether they are equivalent.
pub fn compare(left: &Value, right: &Value, options: &CompareOptions) -> EquivalenceReport {
    let a = canonicalize_and_hash(left);
    let b = canonicalize_and_hash(right);
    let equivalent = a.opal_hash == b.opal_hash;

    let diffs = (options.show_diff || !equivalent).then(|| {
        diff_projections(
            a.projection.as_value(),
            b.projection.as_value(),
            &options.ignore,
        )
    });

    tracing::debug!(
        left = %a.opal_hash,
        right = %b.opal_hash,
        equivalent,
        "compared documents"
    );

    EquivalenceReport {
        left: DocumentSummary::from(&a),
        right: DocumentSummary::from(&b),
        equivalent,
        diffs,
    }
}
