//! Map/reduce engine
//!
//! A map function is called once per input record and emits `(key, value)`
//! pairs. Values are grouped by key in order of first appearance, then the
//! reduce function is called once per group and its emissions are pushed
//! into the resulting [`OrderedHash`].
//!
//! Reusable strategies live in [`map`] and [`emit`].

pub mod emit;
pub mod map;
pub mod wildcard;

use crate::error::DataResult;
use crate::ordered_hash::OrderedHash;
use crate::record::Key;
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// Result container produced by the engine
pub type Reduced = OrderedHash<Key, Value>;

/// Collects the emissions of the map phase, grouped by key.
///
/// Emissions without a key are dropped.
#[derive(Debug, Default)]
pub struct MapEmitter {
    groups: OrderedHash<Key, Vec<Value>>,
    dropped: usize,
}

impl MapEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the group for `key`
    pub fn emit(&mut self, key: impl Into<Option<Key>>, value: Value) {
        match key.into() {
            Some(key) => self.groups.get_or_insert_with(key, Vec::new).push(value),
            None => self.dropped += 1,
        }
    }

    /// Number of emissions dropped for lack of a key
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn into_groups(self) -> OrderedHash<Key, Vec<Value>> {
        self.groups
    }
}

/// Collects the emissions of a reduce function in call order
#[derive(Debug, Default)]
pub struct ReduceEmitter {
    emitted: Vec<(Key, Value)>,
}

impl ReduceEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, key: impl Into<Key>, value: Value) {
        self.emitted.push((key.into(), value));
    }

    pub fn into_emitted(self) -> Vec<(Key, Value)> {
        self.emitted
    }

    fn drain_into(&mut self, target: &mut Reduced) {
        for (key, value) in self.emitted.drain(..) {
            target.push(key, value);
        }
    }
}

/// A map function: inspects one record and emits zero or more pairs
pub trait MapFn {
    fn map(&mut self, record: Value, emit: &mut MapEmitter);
}

impl<F> MapFn for F
where
    F: FnMut(Value, &mut MapEmitter),
{
    fn map(&mut self, record: Value, emit: &mut MapEmitter) {
        self(record, emit)
    }
}

/// A reduce function: called once per group, emits the final value(s)
pub trait ReduceFn {
    fn reduce(&mut self, key: &Key, values: Vec<Value>, emit: &mut ReduceEmitter)
        -> DataResult<()>;
}

impl<F> ReduceFn for F
where
    F: FnMut(&Key, Vec<Value>, &mut ReduceEmitter) -> DataResult<()>,
{
    fn reduce(
        &mut self,
        key: &Key,
        values: Vec<Value>,
        emit: &mut ReduceEmitter,
    ) -> DataResult<()> {
        self(key, values, emit)
    }
}

/// Build a map function from a closure, fixing its signature for inference
pub fn map_fn<F>(f: F) -> F
where
    F: FnMut(Value, &mut MapEmitter),
{
    f
}

/// Build a reduce function from a closure, fixing its signature for inference
pub fn reduce_fn<F>(f: F) -> F
where
    F: FnMut(&Key, Vec<Value>, &mut ReduceEmitter) -> DataResult<()>,
{
    f
}

/// The map argument accepted at the loader boundary: either the name of an
/// attribute to group by, or an arbitrary map function.
pub enum Mapper {
    Attribute(map::KeyMap),
    Custom(Box<dyn MapFn>),
}

impl Mapper {
    pub fn custom(map: impl MapFn + 'static) -> Self {
        Mapper::Custom(Box::new(map))
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute(key_map) => write!(f, "Attribute({:?})", key_map.attr()),
            Self::Custom(_) => write!(f, "Custom(<function>)"),
        }
    }
}

impl From<&str> for Mapper {
    fn from(attr: &str) -> Self {
        Mapper::Attribute(map::key(attr))
    }
}

impl From<String> for Mapper {
    fn from(attr: String) -> Self {
        Mapper::Attribute(map::key(attr))
    }
}

impl From<map::KeyMap> for Mapper {
    fn from(key_map: map::KeyMap) -> Self {
        Mapper::Attribute(key_map)
    }
}

impl MapFn for Mapper {
    fn map(&mut self, record: Value, emit: &mut MapEmitter) {
        match self {
            Mapper::Attribute(key_map) => key_map.map(record, emit),
            Mapper::Custom(inner) => inner.map(record, emit),
        }
    }
}

/// Run map and reduce over `records`.
///
/// Without a reduce function the last value of each group wins. The result
/// holds one entry per key emitted by the reduce phase, ordered by the first
/// time each key was pushed.
pub fn mapreduce<'r, I>(
    records: I,
    map: &mut dyn MapFn,
    reduce: Option<&mut (dyn ReduceFn + 'r)>,
) -> DataResult<Reduced>
where
    I: IntoIterator<Item = Value>,
{
    let mut map_emitter = MapEmitter::new();
    let mut record_count = 0usize;
    for record in records {
        map.map(record, &mut map_emitter);
        record_count += 1;
    }

    if map_emitter.dropped() > 0 {
        debug!(
            "Dropped {} map emissions without a key",
            map_emitter.dropped()
        );
    }

    let groups = map_emitter.into_groups();
    debug!(
        "Map phase produced {} groups from {} records",
        groups.len(),
        record_count
    );

    let mut default_reduce = emit::last();
    let reduce: &mut (dyn ReduceFn + 'r) = match reduce {
        Some(reduce) => reduce,
        None => &mut default_reduce,
    };

    let mut result = Reduced::new();
    let mut reduce_emitter = ReduceEmitter::new();
    for (key, values) in groups {
        reduce.reduce(&key, values, &mut reduce_emitter)?;
        reduce_emitter.drain_into(&mut result);
    }

    debug!("Reduce phase emitted {} entries", result.len());
    Ok(result)
}

/// Bind a map and reduce function into a reusable pipeline.
///
/// The returned closure runs [`mapreduce`] for its side effects only and
/// discards the result container; reduce errors are logged.
pub fn mapreducer<M>(
    mut map: M,
    mut reduce: Option<Box<dyn ReduceFn>>,
) -> impl FnMut(Vec<Value>)
where
    M: MapFn,
{
    move |records| {
        if let Err(e) = mapreduce(records, &mut map, reduce.as_deref_mut()) {
            warn!("mapreducer pipeline failed: {}", e);
        }
    }
}
