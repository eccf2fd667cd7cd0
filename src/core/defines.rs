//! `defines` normalization: turns `name=value` strings into typed values.
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A typed compile-time constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefineValue {
    Bool(bool),
    Number(f64),
    /// Raw text, spliced verbatim; surrounding quotes are kept.
    String(String),
    /// Entry written without `=`.
    Undefined,
}

impl fmt::Display for DefineValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefineValue::Bool(b) => write!(f, "{}", b),
            DefineValue::Number(n) => write!(f, "{}", n),
            DefineValue::String(s) => write!(f, "{}", s),
            DefineValue::Undefined => write!(f, "undefined"),
        }
    }
}

/// Normalized defines, keyed by name.
pub type Defines = BTreeMap<String, DefineValue>;

/// The loose forms `defines` may arrive in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDefines {
    One(String),
    Many(Vec<String>),
    Typed(Defines),
}

impl RawDefines {
    pub fn normalize(self) -> Defines {
        match self {
            RawDefines::One(entry) => parse_defines([entry]),
            RawDefines::Many(entries) => parse_defines(entries),
            RawDefines::Typed(defines) => defines,
        }
    }
}

impl From<&str> for RawDefines {
    fn from(value: &str) -> Self {
        RawDefines::One(value.to_string())
    }
}

impl From<Vec<String>> for RawDefines {
    fn from(value: Vec<String>) -> Self {
        RawDefines::Many(value)
    }
}

/// Normalize an optional loose `defines` value; absent means empty.
pub fn normalize_defines(raw: Option<RawDefines>) -> Defines {
    raw.map(RawDefines::normalize).unwrap_or_default()
}

/// Parse a sequence of `name=value` entries. Later entries win on duplicate names.
pub fn parse_defines<I, S>(entries: I) -> Defines
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .map(|entry| parse_define(entry.as_ref()))
        .collect()
}

/// Split one entry on its first `=` and classify the value.
pub fn parse_define(entry: &str) -> (String, DefineValue) {
    match entry.split_once('=') {
        Some((name, raw)) => (name.to_string(), classify(raw)),
        None => {
            warn!("Define {:?} has no value", entry);
            (entry.to_string(), DefineValue::Undefined)
        }
    }
}

/// Boolean first, then finite number, else the raw string untouched.
pub fn classify(raw: &str) -> DefineValue {
    match raw {
        "true" => DefineValue::Bool(true),
        "false" => DefineValue::Bool(false),
        _ => match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => DefineValue::Number(n),
            _ => DefineValue::String(raw.to_string()),
        },
    }
}
