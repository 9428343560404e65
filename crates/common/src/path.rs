//! Dotted field paths into opaque JSON nodes

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A dotted path such as `name`, `companyName` or `order.id`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Resolve the path against a JSON value
    pub fn lookup<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(value, |current, segment| current.get(segment.as_str()))
            .filter(|v| !v.is_null())
    }

    /// Resolve the path and render scalars as text
    pub fn lookup_text(&self, value: &Value) -> Option<String> {
        match self.lookup(value)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl From<String> for FieldPath {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<FieldPath> for String {
    fn from(p: FieldPath) -> Self {
        p.segments.join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
