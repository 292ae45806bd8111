use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::ValidationError;

/// SHA-256 digest of a canonical projection, lowercase hex (64 chars).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpalHash(String);

impl OpalHash {
    /// Wraps raw digest bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Parses a validated digest from its hex form.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let re = Regex::new(r"^[0-9a-f]{64}$").expect("invalid regex");
        if !re.is_match(&s) {
            return Err(ValidationError::PatternMismatch {
                field: "opal_hash",
                value: s,
            });
        }
        Ok(Self(s))
    }

    /// Hex string view.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for OpalHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OpalHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
