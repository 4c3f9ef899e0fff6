//! # Features
//!
//! A feature is a named bundle of behaviour mixed into a contract definition.
//! Registering one on a builder installs it there and records it in the
//! [`FeatureRegistry`]; nested blocks declared afterwards receive every
//! registered feature automatically. Nested blocks declared before the
//! registration do not.

use crate::error::ConfigError;
use crate::schema::ContractBuilder;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// Identifier a feature is registered under.
pub type FeatureId = &'static str;

/// Reusable behaviour attached to a schema.
pub trait Feature: Debug + Send + Sync {
    /// Unique name; a registry holds at most one feature per name.
    fn name(&self) -> FeatureId;

    /// Schema-time hook, run once for every schema the feature is attached to.
    ///
    /// # Errors
    /// Any [`ConfigError`] aborts the definition being built.
    fn install(&self, _builder: &mut ContractBuilder) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Input hook applied to every incoming scalar before coercion.
    fn normalize(&self, value: Value) -> Value {
        value
    }
}

/// Ordered set of features enabled on one schema.
#[derive(Debug, Clone, Default)]
pub struct FeatureRegistry {
    entries: Vec<Arc<dyn Feature>>,
}

impl FeatureRegistry {
    /// Adds `feature` unless one with the same name is present. Returns `true` if added.
    pub fn register(&mut self, feature: Arc<dyn Feature>) -> bool {
        if self.contains(feature.name()) {
            return false;
        }
        self.entries.push(feature);
        true
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|f| f.name() == name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<FeatureId> {
        self.entries.iter().map(|f| f.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Feature>> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn snapshot(&self) -> Vec<Arc<dyn Feature>> {
        self.entries.clone()
    }

    pub(crate) fn normalize(&self, value: Value) -> Value {
        self.entries.iter().fold(value, |v, f| f.normalize(v))
    }
}

/// Trims surrounding whitespace from string input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Strip;

impl Feature for Strip {
    fn name(&self) -> FeatureId {
        "strip"
    }

    fn normalize(&self, value: Value) -> Value {
        match value {
            Value::String(s) if s.trim().len() != s.len() => Value::String(s.trim().to_owned()),
            other => other,
        }
    }
}

/// Turns blank string input into `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullifyBlank;

impl Feature for NullifyBlank {
    fn name(&self) -> FeatureId {
        "nullify_blank"
    }

    fn normalize(&self, value: Value) -> Value {
        match value {
            Value::String(s) if s.trim().is_empty() => Value::Null,
            other => other,
        }
    }
}

/// Looks up a built-in feature by name.
#[must_use]
pub fn builtin(name: &str) -> Option<Arc<dyn Feature>> {
    match name {
        "strip" => Some(Arc::new(Strip)),
        "nullify_blank" => Some(Arc::new(NullifyBlank)),
        _ => None,
    }
}
