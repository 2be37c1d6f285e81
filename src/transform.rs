//! Record transform helpers
//!
//! Every helper returns a [`Transform`] and optionally takes an inner
//! transform that is applied first, so helpers compose:
//!
//! ```
//! use datadata::transform::{envelope, prefix};
//! use serde_json::json;
//!
//! let t = envelope("data", None, Some(prefix("raw_", None)));
//! assert_eq!(t(json!({"a": 1})), json!({"data": {"raw_a": 1}}));
//! ```

use crate::record::{is_truthy, Record};
use serde_json::Value;

/// A record-to-record function
pub type Transform = Box<dyn Fn(Value) -> Value>;

/// Derives a field value from the whole record
pub type Derive = Box<dyn Fn(&Value) -> Value>;

/// How [`map_attr`] produces one target field
pub enum FieldSource {
    /// Move the named field, if it is truthy
    Rename(String),
    /// Compute the field from the record
    Derive(Derive),
}

/// Argument to [`map_attr`]
pub enum AttrMapping {
    /// Replace the record with the function's result
    Func(Transform),
    /// Target field name paired with its source, applied in order
    Fields(Vec<(String, FieldSource)>),
}

fn apply(inner: &Option<Transform>, record: Value) -> Value {
    match inner {
        Some(inner) => inner(record),
        None => record,
    }
}

fn prefixed(record: Value, prefix: &str) -> Value {
    let Value::Object(fields) = record else {
        return Value::Object(Record::new());
    };
    let renamed: Record = fields
        .into_iter()
        .map(|(k, v)| (format!("{}{}", prefix, k), v))
        .collect();
    Value::Object(renamed)
}

/// Wrap the record as `{key: record}`.
///
/// With `pull`, the named attribute is moved out of the nested record and
/// placed next to `key` at the top level (`null` if it was absent).
pub fn envelope(key: impl Into<String>, pull: Option<&str>, inner: Option<Transform>) -> Transform {
    let key = key.into();
    let pull = pull.map(str::to_string);
    Box::new(move |record| {
        let mut record = apply(&inner, record);
        let mut wrapped = Record::new();
        let pulled = pull.as_ref().map(|attr| {
            let value = record
                .as_object_mut()
                .and_then(|fields| fields.shift_remove(attr))
                .unwrap_or(Value::Null);
            (attr.clone(), value)
        });
        wrapped.insert(key.clone(), record);
        if let Some((attr, value)) = pulled {
            wrapped.insert(attr, value);
        }
        Value::Object(wrapped)
    })
}

/// Prepend `prefix` to every field name.
pub fn prefix(prefix: impl Into<String>, inner: Option<Transform>) -> Transform {
    let prefix = prefix.into();
    Box::new(move |record| prefixed(apply(&inner, record), &prefix))
}

/// Prepend `record[attr] + "_"` to every field name, or nothing if that
/// attribute is falsy.
pub fn prefix_attr(attr: impl Into<String>, inner: Option<Transform>) -> Transform {
    let attr = attr.into();
    Box::new(move |record| {
        let record = apply(&inner, record);
        let prefix = match record.get(&attr) {
            Some(value) if is_truthy(value) => match value {
                Value::String(s) => format!("{}_", s),
                other => format!("{}_", other),
            },
            _ => String::new(),
        };
        prefixed(record, &prefix)
    })
}

/// Rename or derive fields.
///
/// Renames only happen when the source field is truthy; the source field is
/// removed. Derived fields see the record as modified by earlier entries.
pub fn map_attr(mapping: AttrMapping, inner: Option<Transform>) -> Transform {
    Box::new(move |record| {
        let record = apply(&inner, record);
        match &mapping {
            AttrMapping::Func(func) => func(record),
            AttrMapping::Fields(fields) => {
                let mut record = record;
                for (target, source) in fields {
                    match source {
                        FieldSource::Derive(derive) => {
                            let value = derive(&record);
                            if let Some(obj) = record.as_object_mut() {
                                obj.insert(target.clone(), value);
                            }
                        }
                        FieldSource::Rename(from) => {
                            if let Some(obj) = record.as_object_mut() {
                                if obj.get(from).is_some_and(is_truthy) {
                                    if let Some(value) = obj.shift_remove(from) {
                                        obj.insert(target.clone(), value);
                                    }
                                }
                            }
                        }
                    }
                }
                record
            }
        }
    })
}
