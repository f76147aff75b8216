//! Recorded exchanges with the public mathjs service.
//!
//! The stub never evaluates anything. Each recording maps an expression and
//! a precision to the value or error the real service returned for it.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

/// Precision at which the service already prints every digit of a double.
/// This value and anything above it, like zero, replay the default-precision
/// recording.
pub const MAX_PRECISION: i64 = 16;

const EMBEDDED: &str = include_str!("../fixtures/recorded.json");

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Value(String),
    Error(String),
}

#[derive(Deserialize)]
struct Recording {
    expr: String,
    #[serde(default)]
    precision: Option<i64>,
    #[serde(flatten)]
    outcome: Outcome,
}

#[derive(Deserialize)]
struct Fixture {
    recordings: Vec<Recording>,
}

#[derive(Debug, Default)]
pub struct Recordings {
    entries: HashMap<(String, Option<i64>), Outcome>,
    known: HashSet<String>,
}

impl Recordings {
    /// The table shipped in `fixtures/recorded.json`.
    pub fn embedded() -> Result<Self, serde_json::Error> {
        Self::from_json(EMBEDDED)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let fixture: Fixture = serde_json::from_str(raw)?;
        let mut recordings = Self::default();
        for rec in fixture.recordings {
            let key = rec.precision.and_then(canonical_precision);
            recordings.known.insert(rec.expr.clone());
            recordings.entries.insert((rec.expr, key), rec.outcome);
        }
        Ok(recordings)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replay the outcome for `expr` at the canonical `precision`.
    pub fn lookup(&self, expr: &str, precision: Option<i64>) -> Outcome {
        if let Some(outcome) = self.entries.get(&(expr.to_string(), precision)) {
            return outcome.clone();
        }
        match precision {
            Some(p) if self.known.contains(expr) => {
                Outcome::Error(format!("no recording of {expr:?} at precision {p}"))
            }
            _ => Outcome::Error(format!("Undefined symbol {expr}")),
        }
    }
}

/// `None` means "default precision".
pub fn canonical_precision(p: i64) -> Option<i64> {
    (p != 0 && p < MAX_PRECISION).then_some(p)
}

/// Canonical precision of a query-string value. Blank or non-integer text
/// means default precision.
pub fn precision_from_text(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().and_then(canonical_precision)
}

/// Canonical precision of a JSON body value.
pub fn precision_from_json(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .and_then(canonical_precision),
        serde_json::Value::String(s) => precision_from_text(s),
        _ => None,
    }
}
