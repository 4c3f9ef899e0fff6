//! # Representer
//!
//! Compiled mapping between a schema's properties and the three places values
//! live: the model, the field store and raw input/output documents.
//!
//! * **setup**: model → field store, values copied as-is.
//! * **deserialize**: input → field store, with feature normalization and coercion.
//! * **serialize**: field store → JSON object keyed by public names.
//! * **sync**: field store → model, writing only values that differ.
//!
//! Nested bindings delegate to the nested schema's own representer. During
//! deserialize an existing nested contract is handed to the inner step as is;
//! a new one is only created when the store has none.

use crate::coerce::{coerce, failure_message};
use crate::contract::Contract;
use crate::feature::FeatureRegistry;
use crate::fields::{Field, FieldStore};
use crate::model::Model;
use crate::property::PropertyDefinition;
use crate::schema::Schema;
use formwork_domain::coercion::Coercion;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::trace;

const INVALID: &str = "is invalid";

#[derive(Debug, Clone)]
enum BindingKind {
    Scalar(Option<Coercion>),
    Scalars(Option<Coercion>),
    Form(Arc<Schema>),
    Forms(Arc<Schema>),
}

/// Mapping instructions for a single property.
#[derive(Debug, Clone)]
pub struct Binding {
    name: String,
    private_name: Option<String>,
    kind: BindingKind,
}

impl Binding {
    fn compile(property: &PropertyDefinition) -> Self {
        let kind = match (property.nested(), property.is_collection()) {
            (Some(schema), false) => BindingKind::Form(Arc::clone(schema)),
            (Some(schema), true) => BindingKind::Forms(Arc::clone(schema)),
            (None, false) => BindingKind::Scalar(property.coercion()),
            (None, true) => BindingKind::Scalars(property.coercion()),
        };
        Self { name: property.name().to_owned(), private_name: property.private_name.clone(), kind }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn key(&self) -> &str {
        self.private_name.as_deref().unwrap_or(&self.name)
    }

    /// Input lookup: public name first, private name as fallback.
    fn pick<'a>(&self, input: &'a Map<String, Value>) -> Option<&'a Value> {
        input.get(&self.name).or_else(|| self.private_name.as_ref().and_then(|p| input.get(p)))
    }
}

/// Compiled mapping definition of one schema.
#[derive(Debug, Clone, Default)]
pub struct Representer {
    bindings: Vec<Binding>,
    features: FeatureRegistry,
}

impl Representer {
    pub(crate) fn compile(properties: &[PropertyDefinition], features: &FeatureRegistry) -> Self {
        Self { bindings: properties.iter().map(Binding::compile).collect(), features: features.clone() }
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub(crate) fn setup<M: Model + ?Sized>(&self, model: &M) -> FieldStore {
        let mut store = FieldStore::default();

        for binding in &self.bindings {
            let raw = model.read(binding.key());
            let field = match &binding.kind {
                BindingKind::Scalar(_) | BindingKind::Scalars(_) => {
                    Field::Value(raw.unwrap_or(Value::Null))
                },
                BindingKind::Form(schema) => Field::Form(match raw {
                    Some(Value::Object(map)) => {
                        Some(Box::new(Contract::new(Arc::clone(schema), &map)))
                    },
                    _ => None,
                }),
                BindingKind::Forms(schema) => Field::Forms(match raw {
                    Some(Value::Array(items)) => items
                        .iter()
                        .map(|item| Contract::new(Arc::clone(schema), item))
                        .collect(),
                    _ => Vec::new(),
                }),
            };
            trace!(property = %binding.name, key = binding.key(), "field seeded from model");
            store.insert(binding.key(), field);
        }

        store
    }

    /// Writes `input` into `store`. Values that cannot be coerced are kept raw and
    /// their failure is recorded on the slot; nested failures live in the nested stores.
    pub(crate) fn deserialize(&self, store: &mut FieldStore, input: &Map<String, Value>) {
        for binding in &self.bindings {
            let Some(raw) = binding.pick(input) else {
                continue;
            };
            trace!(property = %binding.name, "deserializing input");

            let (field, failure) = match &binding.kind {
                BindingKind::Scalar(coercion) => {
                    let (value, failure) = self.scalar(raw.clone(), *coercion);
                    (Field::Value(value), failure)
                },
                BindingKind::Scalars(coercion) => {
                    let (value, failure) = self.scalars(raw, *coercion);
                    (Field::Value(value), failure)
                },
                BindingKind::Form(schema) => {
                    let current = store.get_mut(binding.key()).and_then(|f| match f {
                        Field::Form(form) => form.take(),
                        _ => None,
                    });
                    match raw {
                        Value::Object(map) => {
                            let mut form = prepare(current, schema);
                            form.absorb(map);
                            (Field::Form(Some(form)), None)
                        },
                        Value::Null => (Field::Form(None), None),
                        _ => (Field::Form(current), Some(INVALID)),
                    }
                },
                BindingKind::Forms(schema) => {
                    let current = match store.get_mut(binding.key()) {
                        Some(Field::Forms(forms)) => std::mem::take(forms),
                        _ => Vec::new(),
                    };
                    match raw {
                        Value::Array(items) => {
                            let (forms, rejected) = reconcile(current, items, schema);
                            (Field::Forms(forms), rejected.then_some(INVALID))
                        },
                        Value::Null => (Field::Forms(Vec::new()), None),
                        _ => (Field::Forms(current), Some(INVALID)),
                    }
                },
            };

            store.insert(binding.key(), field);
            if let Some(message) = failure {
                store.fail(binding.key(), message);
            }
        }
    }

    pub(crate) fn serialize(&self, store: &FieldStore) -> Map<String, Value> {
        let mut out = Map::new();

        for binding in &self.bindings {
            let value = match store.get(binding.key()) {
                Some(Field::Value(value)) => value.clone(),
                Some(Field::Form(Some(form))) => Value::Object(form.to_nested_hash()),
                Some(Field::Forms(forms)) => {
                    forms.iter().map(|f| Value::Object(f.to_nested_hash())).collect()
                },
                Some(Field::Form(None)) | None => Value::Null,
            };
            out.insert(binding.name.clone(), value);
        }

        out
    }

    pub(crate) fn sync<M: Model + ?Sized>(&self, store: &FieldStore, model: &mut M) {
        for binding in &self.bindings {
            let key = binding.key();
            let current = model.read(key);

            let value = match store.get(key) {
                Some(Field::Value(value)) => value.clone(),
                Some(Field::Form(Some(form))) => {
                    let mut nested = match &current {
                        Some(Value::Object(map)) => map.clone(),
                        _ => Map::new(),
                    };
                    form.sync(&mut nested);
                    Value::Object(nested)
                },
                Some(Field::Form(None)) if current.as_ref().is_some_and(Value::is_object) => {
                    Value::Null
                },
                Some(Field::Forms(forms))
                    if forms.is_empty() && !current.as_ref().is_some_and(Value::is_array) =>
                {
                    continue;
                },
                Some(Field::Forms(forms)) => {
                    let mut items = match &current {
                        Some(Value::Array(items)) => items.clone(),
                        _ => Vec::new(),
                    };
                    items.resize(forms.len(), Value::Null);
                    for (item, form) in items.iter_mut().zip(forms) {
                        form.sync(item);
                    }
                    Value::Array(items)
                },
                Some(Field::Form(None)) | None => continue,
            };

            if current.as_ref().unwrap_or(&Value::Null) != &value {
                trace!(property = %binding.name, key, "writing field to model");
                model.write(key, value);
            }
        }
    }

    fn scalar(&self, raw: Value, coercion: Option<Coercion>) -> (Value, Option<&'static str>) {
        let value = self.features.normalize(raw);
        match coercion {
            None => (value, None),
            Some(kind) => match coerce(kind, value.clone()) {
                Ok(coerced) => (coerced, None),
                Err(message) => (value, Some(message)),
            },
        }
    }

    fn scalars(&self, raw: &Value, coercion: Option<Coercion>) -> (Value, Option<&'static str>) {
        let Value::Array(items) = raw else {
            return (raw.clone(), Some(INVALID));
        };

        let mut failed = false;
        let values = items
            .iter()
            .map(|item| {
                let (value, failure) = self.scalar(item.clone(), coercion);
                failed |= failure.is_some();
                value
            })
            .collect();

        (Value::Array(values), failed.then(|| coercion.map_or(INVALID, failure_message)))
    }
}

/// Reuses the existing nested contract, or wraps an empty model when there is none.
fn prepare(current: Option<Box<Contract>>, schema: &Arc<Schema>) -> Box<Contract> {
    current.unwrap_or_else(|| Box::new(Contract::empty(Arc::clone(schema))))
}

/// Matches incoming items to existing contracts by position; the result has the
/// input's length. The flag reports items that were not objects.
fn reconcile(current: Vec<Contract>, items: &[Value], schema: &Arc<Schema>) -> (Vec<Contract>, bool) {
    let mut existing = current.into_iter();
    let mut rejected = false;

    let forms: Vec<Contract> = items
        .iter()
        .map(|item| {
            let mut form = prepare(existing.next().map(Box::new), schema);
            match item {
                Value::Object(map) => form.absorb(map),
                _ => rejected = true,
            }
            *form
        })
        .collect();

    (forms, rejected)
}
