//! Accessor table.
//!
//! Every property gets a base accessor reading and writing the field store
//! under its storage key. Overrides are stacked on top: a reader receives the
//! value produced by the layers below it, a writer hands its result down to
//! the layers below it. A derived schema adds layers without losing the
//! inherited ones.

use crate::contract::Contract;
use fxhash::FxHashMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Receives the value read by the layers below and returns the value to expose.
pub type ReadHook = Arc<dyn Fn(&Contract, Value) -> Value + Send + Sync>;

/// Receives the value being written and returns what the layers below should store.
pub type WriteHook = Arc<dyn Fn(&Contract, Value) -> Value + Send + Sync>;

/// One override layer for a property accessor.
#[derive(Clone, Default)]
#[must_use]
pub struct AccessorOverride {
    reader: Option<ReadHook>,
    writer: Option<WriteHook>,
}

impl AccessorOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reader<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Contract, Value) -> Value + Send + Sync + 'static,
    {
        self.reader = Some(Arc::new(hook));
        self
    }

    pub fn writer<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Contract, Value) -> Value + Send + Sync + 'static,
    {
        self.writer = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for AccessorOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorOverride")
            .field("reader", &self.reader.is_some())
            .field("writer", &self.writer.is_some())
            .finish()
    }
}

/// Getter/setter pair for one property.
#[derive(Debug, Clone)]
pub struct Accessor {
    key: String,
    layers: Vec<AccessorOverride>,
}

impl Accessor {
    pub(crate) const fn new(key: String) -> Self {
        Self { key, layers: Vec::new() }
    }

    /// Field store key the base layer reads and writes.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    pub(crate) fn read(&self, contract: &Contract, base: Value) -> Value {
        self.layers
            .iter()
            .filter_map(|layer| layer.reader.as_ref())
            .fold(base, |value, hook| hook(contract, value))
    }

    pub(crate) fn write(&self, contract: &Contract, value: Value) -> Value {
        self.layers
            .iter()
            .rev()
            .filter_map(|layer| layer.writer.as_ref())
            .fold(value, |value, hook| hook(contract, value))
    }
}

/// Accessors of one schema, keyed by public property name.
#[derive(Debug, Clone, Default)]
pub struct AccessorTable {
    entries: FxHashMap<String, Accessor>,
}

impl AccessorTable {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Accessor> {
        self.entries.get(name)
    }

    /// Creates the base accessor, or re-points an existing one while keeping its overrides.
    pub(crate) fn define(&mut self, name: &str, key: &str) {
        self.entries
            .entry(name.to_owned())
            .and_modify(|accessor| key.clone_into(&mut accessor.key))
            .or_insert_with(|| Accessor::new(key.to_owned()));
    }

    pub(crate) fn push_layer(&mut self, name: &str, layer: AccessorOverride) -> bool {
        self.entries.get_mut(name).map(|accessor| accessor.layers.push(layer)).is_some()
    }

    /// Adds accessors from `other` that are missing here.
    pub(crate) fn merge(&mut self, other: &Self) {
        for (name, accessor) in &other.entries {
            self.entries.entry(name.clone()).or_insert_with(|| accessor.clone());
        }
    }
}
