//! Record and key types shared by the loader and the map/reduce engine
//!
//! Records are plain JSON values. Object records keep their field order
//! (serde_json is built with `preserve_order`), which transforms and the
//! CLI output rely on.

use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::sync::LazyLock;

/// An object-shaped record
pub type Record = Map<String, Value>;

static NUMERIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("Invalid regex pattern")
});

/// Grouping key produced by map functions
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Int(i64),
    Text(String),
}

impl Key {
    /// Derive a key from a field value.
    ///
    /// `null` yields no key. Integral numbers become `Int`, strings become
    /// `Text`, and everything else is keyed by its JSON rendering.
    pub fn from_value(value: &Value) -> Option<Key> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(Key::Text(s.clone())),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Key::Int(i)),
                None => Some(Key::Text(n.to_string())),
            },
            other => Some(Key::Text(other.to_string())),
        }
    }

    /// Convert the key back into a JSON value
    pub fn to_value(&self) -> Value {
        match self {
            Key::Int(i) => Value::from(*i),
            Key::Text(s) => Value::String(s.clone()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Text(s) => Some(s),
            Key::Int(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{}", i),
            Key::Text(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Key::Int(i) => serializer.serialize_i64(*i),
            Key::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Int(value)
    }
}

impl From<usize> for Key {
    /// Positions beyond `i64::MAX` fall back to a text key
    fn from(value: usize) -> Self {
        i64::try_from(value)
            .map(Key::Int)
            .unwrap_or_else(|_| Key::Text(value.to_string()))
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Text(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Text(value)
    }
}

/// Return true if the value is a number or a strictly numeric string.
///
/// Strings are trimmed first; `" 1"`, `"-0.1"` and `".1"` are numeric while
/// `""`, `"1B"` and `"1.1.1"` are not.
pub fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => is_numeric_str(s),
        _ => false,
    }
}

pub fn is_numeric_str(s: &str) -> bool {
    NUMERIC_PATTERN.is_match(s.trim())
}

/// Loose truthiness: `null`, `false`, `0` and `""` are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Convert a numeric string into a JSON number, leaving other strings as-is
pub fn coerce_numeric(s: &str) -> Value {
    if !is_numeric_str(s) {
        return Value::String(s.to_string());
    }
    let trimmed = s.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::from(i);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(s.to_string()))
}

/// Copy an array, or wrap a single value in a vec. `null` yields an empty vec.
pub fn to_array(value: &Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}

/// Merge objects left to right into a new record; later fields win.
pub fn merge<'a, I>(objects: I) -> Record
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut merged = Record::new();
    for object in objects {
        if let Value::Object(fields) = object {
            for (k, v) in fields {
                merged.insert(k.clone(), v.clone());
            }
        }
    }
    merged
}

/// Reversed copy of an array; other values are returned unchanged
pub fn reverse(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().rev().cloned().collect()),
        other => other.clone(),
    }
}
