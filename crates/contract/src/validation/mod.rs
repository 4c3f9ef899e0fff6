//! # Validation
//!
//! Rules are plain values attached to a schema. A contract runs its own rules in
//! registration order, then validates each nested contract and merges the
//! nested messages under the property's name.
//!
//! Every rule except [`Rule::Presence`] ignores `null`, so presence stays the
//! single place that decides whether a field is required.

mod errors;
mod rules;

pub use errors::Errors;
pub use rules::Rule;

use crate::contract::Contract;
use std::fmt::Debug;
use std::sync::Arc;

/// A validation step executed against a contract.
pub trait Validator: Debug + Send + Sync {
    /// Identity used to ignore repeated registrations.
    fn key(&self) -> String;

    /// The property this validator reads, if it targets a single one.
    fn attribute(&self) -> Option<&str> {
        None
    }

    fn validate(&self, contract: &Contract, errors: &mut Errors);
}

/// A built-in [`Rule`] bound to one property.
#[derive(Debug, Clone)]
pub struct FieldRule {
    field: String,
    rule: Rule,
}

impl FieldRule {
    pub fn new(field: impl Into<String>, rule: Rule) -> Self {
        Self { field: field.into(), rule }
    }
}

impl Validator for FieldRule {
    fn key(&self) -> String {
        format!("{}({})", self.rule.signature(), self.field)
    }

    fn attribute(&self) -> Option<&str> {
        Some(&self.field)
    }

    fn validate(&self, contract: &Contract, errors: &mut Errors) {
        // Undeclared fields are rejected when the schema is built.
        let Ok(value) = contract.get(&self.field) else {
            return;
        };
        if let Some(message) = self.rule.check(&value) {
            errors.add(self.field.clone(), message);
        }
    }
}

/// Validation callback signature for [`CustomValidator`].
pub type ValidateFn = Arc<dyn Fn(&Contract, &mut Errors) + Send + Sync>;

/// A named closure validator, for object-level checks.
#[derive(Clone)]
pub struct CustomValidator {
    name: String,
    check: ValidateFn,
}

impl CustomValidator {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Contract, &mut Errors) + Send + Sync + 'static,
    {
        Self { name: name.into(), check: Arc::new(check) }
    }
}

impl Debug for CustomValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomValidator").field("name", &self.name).finish_non_exhaustive()
    }
}

impl Validator for CustomValidator {
    fn key(&self) -> String {
        format!("custom({})", self.name)
    }

    fn validate(&self, contract: &Contract, errors: &mut Errors) {
        (self.check)(contract, errors);
    }
}

/// Validators of one schema, unique by [`Validator::key`].
#[derive(Debug, Clone, Default)]
pub struct ValidatorSet {
    entries: Vec<Arc<dyn Validator>>,
}

impl ValidatorSet {
    /// Adds `validator` unless an equivalent one is registered. Returns `true` if added.
    pub fn insert(&mut self, validator: Arc<dyn Validator>) -> bool {
        let key = validator.key();
        if self.entries.iter().any(|v| v.key() == key) {
            return false;
        }
        self.entries.push(validator);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Validator>> {
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

    pub(crate) fn run(&self, contract: &Contract, errors: &mut Errors) {
        for validator in &self.entries {
            validator.validate(contract, errors);
        }
    }
}
