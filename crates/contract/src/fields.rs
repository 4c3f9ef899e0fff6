use crate::contract::Contract;
use fxhash::FxHashMap;
use serde_json::Value;

/// One slot of a [`FieldStore`].
#[derive(Debug, Clone)]
pub enum Field {
    /// Scalar or list of scalars, stored as given.
    Value(Value),
    /// Nested contract, `None` when the model had no nested object.
    Form(Option<Box<Contract>>),
    /// Collection of nested contracts.
    Forms(Vec<Contract>),
}

impl Field {
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_form(&self) -> Option<&Contract> {
        match self {
            Self::Form(form) => form.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_forms(&self) -> Option<&[Contract]> {
        match self {
            Self::Forms(forms) => Some(forms),
            _ => None,
        }
    }
}

/// The editable copy of a contract's values, keyed by storage key.
///
/// Seeded from the model on construction and overwritten by input during
/// validation. It never touches the model itself.
///
/// A slot whose input could not be coerced keeps the raw value together with
/// the failure message until the slot is written again.
#[derive(Debug, Clone, Default)]
pub struct FieldStore {
    slots: FxHashMap<String, Field>,
    failures: FxHashMap<String, &'static str>,
}

impl FieldStore {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Field> {
        self.slots.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.slots.get_mut(key)
    }

    /// Scalar value under `key`, if the slot holds one.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.get(key).and_then(Field::as_value)
    }

    /// Replaces the slot under `key` and clears its recorded failure.
    pub fn insert(&mut self, key: impl Into<String>, field: Field) {
        let key = key.into();
        self.failures.remove(&key);
        self.slots.insert(key, field);
    }

    /// Message of the last failed write under `key`.
    #[must_use]
    pub fn failure(&self, key: &str) -> Option<&'static str> {
        self.failures.get(key).copied()
    }

    pub(crate) fn fail(&mut self, key: impl Into<String>, message: &'static str) {
        self.failures.insert(key.into(), message);
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }
}
