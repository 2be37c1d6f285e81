//! Reusable map strategies
//!
//! Each constructor returns a small struct implementing [`MapFn`]. Strategies
//! that need state (like the auto-increment id of [`geo::point`]) own it, so
//! every constructed instance counts independently.

use super::{MapEmitter, MapFn};
use crate::record::{Key, Record};
use crate::transform::Transform;
use serde_json::Value;
use std::collections::HashMap;

/// Group records by the value of one attribute
#[derive(Debug, Clone)]
pub struct KeyMap {
    attr: String,
    remap: Option<HashMap<String, Value>>,
}

/// Emit `(record[attr], record)` for every record.
pub fn key(attr: impl Into<String>) -> KeyMap {
    KeyMap {
        attr: attr.into(),
        remap: None,
    }
}

/// Like [`key`], but substitute the extracted value through `remap` when it
/// has an entry for it. Entries mapping to `null` drop the record.
pub fn key_remapped(attr: impl Into<String>, remap: HashMap<String, Value>) -> KeyMap {
    KeyMap {
        attr: attr.into(),
        remap: Some(remap),
    }
}

impl KeyMap {
    pub fn attr(&self) -> &str {
        &self.attr
    }

    fn key_for(&self, record: &Value) -> Option<Key> {
        let value = record.get(&self.attr).unwrap_or(&Value::Null);
        let key = Key::from_value(value);
        match (&self.remap, &key) {
            (Some(remap), Some(k)) => match remap.get(&k.to_string()) {
                Some(alternate) => Key::from_value(alternate),
                None => key,
            },
            _ => key,
        }
    }
}

impl MapFn for KeyMap {
    fn map(&mut self, record: Value, emit: &mut MapEmitter) {
        let key = self.key_for(&record);
        emit.emit(key, record);
    }
}

/// Use each input record as the key and look its value up in a dictionary
#[derive(Debug, Clone)]
pub struct DictMap {
    dict: Record,
}

/// Emit `(record, dict[record])`.
///
/// Intended for feeding the keys of an object through the engine: the input
/// sequence is the object's keys, and the values come from the object.
pub fn dict(dict: Record) -> DictMap {
    DictMap { dict }
}

impl MapFn for DictMap {
    fn map(&mut self, record: Value, emit: &mut MapEmitter) {
        let Some(key) = Key::from_value(&record) else {
            return;
        };
        let value = self
            .dict
            .get(&key.to_string())
            .cloned()
            .unwrap_or(Value::Null);
        emit.emit(key, value);
    }
}

/// Key every record by its position in the input
#[derive(Debug, Clone, Default)]
pub struct PositionMap {
    next: i64,
}

/// Emit `(position, record)` with positions counting from zero.
pub fn index() -> PositionMap {
    PositionMap::default()
}

impl MapFn for PositionMap {
    fn map(&mut self, record: Value, emit: &mut MapEmitter) {
        let id = self.next;
        self.next += 1;
        emit.emit(Key::Int(id), record);
    }
}

/// Apply a record transform before handing the record to another map function
pub struct Transformed<M> {
    transform: Transform,
    inner: M,
}

pub fn pre<M: MapFn>(transform: Transform, inner: M) -> Transformed<M> {
    Transformed { transform, inner }
}

impl<M: MapFn> MapFn for Transformed<M> {
    fn map(&mut self, record: Value, emit: &mut MapEmitter) {
        let record = (self.transform)(record);
        self.inner.map(record, emit);
    }
}

pub mod geo {
    use super::{Key, MapEmitter, MapFn, Value};
    use crate::geo;

    /// Turn records with latitude/longitude fields into GeoJSON points
    #[derive(Debug, Clone)]
    pub struct PointMap {
        lat_attr: String,
        lon_attr: String,
        key_attr: Option<String>,
        next_id: i64,
    }

    /// Emit a Point feature per record, keyed by `record[key_attr]` or, when
    /// no key attribute is given, by an id counting up from zero.
    pub fn point(
        lat_attr: impl Into<String>,
        lon_attr: impl Into<String>,
        key_attr: Option<&str>,
    ) -> PointMap {
        PointMap {
            lat_attr: lat_attr.into(),
            lon_attr: lon_attr.into(),
            key_attr: key_attr.map(str::to_string),
            next_id: 0,
        }
    }

    impl MapFn for PointMap {
        fn map(&mut self, record: Value, emit: &mut MapEmitter) {
            let key = match &self.key_attr {
                Some(attr) => Key::from_value(record.get(attr).unwrap_or(&Value::Null)),
                None => {
                    let id = self.next_id;
                    self.next_id += 1;
                    Some(Key::Int(id))
                }
            };
            let lon = record.get(&self.lon_attr).cloned().unwrap_or(Value::Null);
            let lat = record.get(&self.lat_attr).cloned().unwrap_or(Value::Null);
            emit.emit(key, geo::point(lon, lat, record));
        }
    }
}
