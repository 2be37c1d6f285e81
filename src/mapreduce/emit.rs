//! Reusable reduce strategies
//!
//! Each factory returns a [`ReduceFn`]. [`last`] is the engine default.

use super::wildcard::WildcardSet;
use super::{ReduceEmitter, ReduceFn};
use crate::error::{DataError, DataResult};
use crate::record::{Key, Record};
use serde_json::{Number, Value};
use tracing::warn;

/// Emits the whole group as an array
#[derive(Debug, Clone, Copy, Default)]
pub struct Ident;

pub fn ident() -> Ident {
    Ident
}

impl ReduceFn for Ident {
    fn reduce(&mut self, key: &Key, values: Vec<Value>, emit: &mut ReduceEmitter) -> DataResult<()> {
        emit.emit(key.clone(), Value::Array(values));
        Ok(())
    }
}

/// Emits the first value of the group
#[derive(Debug, Clone, Copy, Default)]
pub struct First;

pub fn first() -> First {
    First
}

impl ReduceFn for First {
    fn reduce(&mut self, key: &Key, values: Vec<Value>, emit: &mut ReduceEmitter) -> DataResult<()> {
        let value = values.into_iter().next().unwrap_or(Value::Null);
        emit.emit(key.clone(), value);
        Ok(())
    }
}

/// Emits the last value of the group
#[derive(Debug, Clone, Copy, Default)]
pub struct Last;

pub fn last() -> Last {
    Last
}

impl ReduceFn for Last {
    fn reduce(&mut self, key: &Key, values: Vec<Value>, emit: &mut ReduceEmitter) -> DataResult<()> {
        let value = values.into_iter().last().unwrap_or(Value::Null);
        emit.emit(key.clone(), value);
        Ok(())
    }
}

/// Shallow-merges all objects of the group, later fields winning
#[derive(Debug, Clone, Copy, Default)]
pub struct Merge;

/// Fold the group into one object.
///
/// The group must not be empty; an empty group fails with
/// [`DataError::EmptyGroup`]. Values that are not objects contribute no
/// fields, so a group starting with a scalar merges into a fresh object.
pub fn merge() -> Merge {
    Merge
}

impl ReduceFn for Merge {
    fn reduce(&mut self, key: &Key, values: Vec<Value>, emit: &mut ReduceEmitter) -> DataResult<()> {
        let mut values = values.into_iter();
        let mut merged = match values.next().ok_or_else(|| empty_group(key))? {
            Value::Object(fields) => Value::Object(fields),
            _ => Value::Object(Record::new()),
        };
        for value in values {
            if let (Value::Object(target), Value::Object(fields)) = (&mut merged, value) {
                target.extend(fields);
            }
        }
        emit.emit(key.clone(), merged);
        Ok(())
    }
}

/// Wraps whatever an inner reduce function emits as `{attr: value}`
pub struct ToAttr {
    attr: String,
    inner: Box<dyn ReduceFn>,
}

/// Re-wrap the emissions of `inner` (default [`last`]) under `attr`.
pub fn to_attr(attr: impl Into<String>, inner: Option<Box<dyn ReduceFn>>) -> ToAttr {
    ToAttr {
        attr: attr.into(),
        inner: inner.unwrap_or_else(|| Box::new(last())),
    }
}

impl ReduceFn for ToAttr {
    fn reduce(&mut self, key: &Key, values: Vec<Value>, emit: &mut ReduceEmitter) -> DataResult<()> {
        let mut inner_emit = ReduceEmitter::new();
        self.inner.reduce(key, values, &mut inner_emit)?;
        for (k, v) in inner_emit.into_emitted() {
            let mut wrapped = Record::new();
            wrapped.insert(self.attr.clone(), v);
            emit.emit(k, Value::Object(wrapped));
        }
        Ok(())
    }
}

/// Adds up numeric fields across the group
#[derive(Debug, Clone)]
pub struct Sum {
    include: WildcardSet,
    exclude: WildcardSet,
}

/// Fold the group into one object, adding numeric fields.
///
/// A field is summed when its name matches one of `include` (everything if
/// `include` is empty) and none of `exclude`. Patterns use `*` and `?`
/// wildcards and are anchored at the start of the field name. Summed fields
/// that are missing or non-numeric on either side are overwritten with the
/// later value and reported with a warning.
pub fn sum(include: &[&str], exclude: &[&str]) -> DataResult<Sum> {
    let include = if include.is_empty() {
        WildcardSet::new(["*"])?
    } else {
        WildcardSet::new(include.iter().copied())?
    };
    Ok(Sum {
        include,
        exclude: WildcardSet::new(exclude.iter().copied())?,
    })
}

impl Sum {
    /// Build from already compiled pattern sets
    pub fn with_patterns(include: WildcardSet, exclude: WildcardSet) -> Self {
        Self { include, exclude }
    }

    fn should_add(&self, field: &str) -> bool {
        self.include.is_match(field) && !self.exclude.is_match(field)
    }

    fn accumulate(&self, acc: &mut Record, current: Record) {
        for (field, value) in current {
            let add = self.should_add(&field);
            if add {
                if let Some(total) = acc.get(&field).and_then(|prev| add_numbers(prev, &value)) {
                    acc.insert(field, total);
                    continue;
                }
                warn!("datadata::emit::sum(): Cannot add field {}", field);
            }
            acc.insert(field, value);
        }
    }
}

impl ReduceFn for Sum {
    fn reduce(&mut self, key: &Key, values: Vec<Value>, emit: &mut ReduceEmitter) -> DataResult<()> {
        let mut values = values.into_iter();
        let mut total = values.next().ok_or_else(|| empty_group(key))?;
        for value in values {
            if let (Value::Object(acc), Value::Object(current)) = (&mut total, value) {
                self.accumulate(acc, current);
            }
        }
        emit.emit(key.clone(), total);
        Ok(())
    }
}

/// Add two JSON numbers, keeping integers integral where possible
fn add_numbers(a: &Value, b: &Value) -> Option<Value> {
    let (Value::Number(a), Value::Number(b)) = (a, b) else {
        return None;
    };
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        if let Some(total) = x.checked_add(y) {
            return Some(Value::from(total));
        }
    }
    // Non-finite totals are not representable in JSON
    let total = a.as_f64()? + b.as_f64()?;
    Number::from_f64(total).map(Value::Number)
}

fn empty_group(key: &Key) -> DataError {
    DataError::EmptyGroup {
        key: key.to_string(),
    }
}

pub mod geo {
    use super::{DataResult, Key, ReduceEmitter, ReduceFn, Value};
    use crate::geo;

    /// Connects consecutive records of a group with LineString features
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Segments;

    /// For each adjacent pair `(prev, cur)` emit a LineString from
    /// `[prev.lon, prev.lat]` to `[cur.lon, cur.lat]`, keyed `"<key>-<i>"`
    /// where `i` is the position of `cur`. Groups of fewer than two records
    /// emit nothing.
    pub fn segments() -> Segments {
        Segments
    }

    fn coordinate(record: &Value) -> [Value; 2] {
        let lon = record.get("lon").cloned().unwrap_or(Value::Null);
        let lat = record.get("lat").cloned().unwrap_or(Value::Null);
        [lon, lat]
    }

    impl ReduceFn for Segments {
        fn reduce(
            &mut self,
            key: &Key,
            values: Vec<Value>,
            emit: &mut ReduceEmitter,
        ) -> DataResult<()> {
            for (i, pair) in values.windows(2).enumerate() {
                let (prev, cur) = (&pair[0], &pair[1]);
                let line = geo::line_string(vec![coordinate(prev), coordinate(cur)], prev.clone());
                emit.emit(format!("{}-{}", key, i + 1), line);
            }
            Ok(())
        }
    }
}
