//! Wire DTOs for the mathjs API.
//!
//! # Design
//! These types mirror the service's JSON schema but are defined
//! independently from the mock-server crate; the conformance tests catch
//! drift between the two.
//!
//! `Precision` is deliberately unvalidated: the suite probes negative and
//! empty-string values, so whatever the caller supplies goes on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The `precision` request parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Precision {
    /// Integer digit count, serialized as a JSON number.
    Digits(i64),
    /// Arbitrary text, serialized as a JSON string (e.g. `""`).
    Raw(String),
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precision::Digits(n) => write!(f, "{n}"),
            Precision::Raw(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Precision {
    fn from(n: i64) -> Self {
        Precision::Digits(n)
    }
}

impl From<&str> for Precision {
    fn from(s: &str) -> Self {
        Precision::Raw(s.to_string())
    }
}

impl From<String> for Precision {
    fn from(s: String) -> Self {
        Precision::Raw(s)
    }
}

/// Request payload for `POST <base_url>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalRequest {
    pub expr: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<Precision>,
}

/// Response payload for `POST <base_url>`. Exactly one of the two fields is
/// normally non-null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalResponse {
    #[serde(default)]
    pub result: Option<Vec<String>>,
    #[serde(default)]
    pub error: Option<String>,
}
