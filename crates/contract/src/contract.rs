use crate::error::ContractError;
use crate::fields::{Field, FieldStore};
use crate::model::Model;
use crate::representer::Representer;
use crate::schema::Schema;
use crate::validation::Errors;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Lifecycle of a contract instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractState {
    /// Built from a model, never validated.
    Constructed,
    /// The last `validate` call succeeded.
    Valid,
    /// The last `validate` call collected errors.
    Invalid,
}

/// A form object: a schema, an editable copy of the model's values and the
/// outcome of the last validation.
///
/// The model is only borrowed: read once by [`Contract::new`] and written by
/// [`Contract::sync`]. Accessors work on the field store in between.
///
/// # Example
/// ```rust
/// use formwork_contract::prelude::*;
/// use serde_json::json;
///
/// # fn main() -> Result<(), ConfigError> {
/// let mut album = ContractBuilder::new("album");
/// album.property("title", PropertyOptions::new())?;
/// album.validates(&["title"], Rule::Presence)?;
/// let schema = album.build()?;
///
/// let model = json!({ "title": "Synchronicity" });
/// let mut form = Contract::new(schema, &model);
///
/// let input = json!({ "title": "" });
/// assert!(!form.validate(input.as_object().unwrap()));
/// assert_eq!(form.errors().get("title"), Some(&["can't be blank".to_owned()][..]));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Contract {
    schema: Arc<Schema>,
    fields: FieldStore,
    errors: Errors,
    state: ContractState,
}

impl Contract {
    /// Copies every declared property off `model`. Nested objects become nested contracts.
    pub fn new<M: Model + ?Sized>(schema: Arc<Schema>, model: &M) -> Self {
        let fields = schema.representer().setup(model);
        Self {
            schema,
            fields,
            errors: Errors::new(),
            state: ContractState::Constructed,
        }
    }

    /// A contract over a model without attributes.
    pub fn empty(schema: Arc<Schema>) -> Self {
        Self::new(schema, &Map::new())
    }

    #[must_use]
    pub const fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    #[must_use]
    pub const fn fields(&self) -> &FieldStore {
        &self.fields
    }

    #[must_use]
    pub fn mapper(&self) -> &Representer {
        self.schema.representer()
    }

    #[must_use]
    pub const fn state(&self) -> ContractState {
        self.state
    }

    /// Messages collected by the last [`Contract::validate`] call.
    #[must_use]
    pub const fn errors(&self) -> &Errors {
        &self.errors
    }

    /// Reads a property through its accessor.
    ///
    /// Nested properties read as their serialized form (`null` when absent).
    ///
    /// # Errors
    /// Returns [`ContractError::UnknownProperty`] if `name` is not declared.
    pub fn get(&self, name: &str) -> Result<Value, ContractError> {
        let accessor = self.schema.accessors().get(name).ok_or_else(|| ContractError::unknown(name))?;

        let base = match self.fields.get(accessor.key()) {
            Some(Field::Value(value)) => value.clone(),
            Some(Field::Form(Some(form))) => Value::Object(form.to_nested_hash()),
            Some(Field::Forms(forms)) => {
                forms.iter().map(|f| Value::Object(f.to_nested_hash())).collect()
            },
            Some(Field::Form(None)) | None => Value::Null,
        };

        Ok(accessor.read(self, base))
    }

    /// Writes a property through its accessor. Nested properties only accept `null`.
    ///
    /// # Errors
    /// * [`ContractError::UnknownProperty`] if `name` is not declared.
    /// * [`ContractError::TypeMismatch`] for a non-null value on a nested property.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ContractError> {
        let accessor = self.schema.accessors().get(name).ok_or_else(|| ContractError::unknown(name))?;
        let value = accessor.write(self, value.into());
        let key = accessor.key().to_owned();

        let field = match self.fields.get(&key) {
            Some(Field::Value(_)) | None => Field::Value(value),
            Some(Field::Form(_)) if value.is_null() => Field::Form(None),
            Some(Field::Forms(_)) if value.is_null() => Field::Forms(Vec::new()),
            Some(Field::Form(_) | Field::Forms(_)) => {
                return Err(ContractError::TypeMismatch {
                    message: format!("'{name}' is nested, write through `nested_mut`").into(),
                    context: Some(self.schema.name().to_owned().into()),
                });
            },
        };
        self.fields.insert(key, field);
        Ok(())
    }

    /// The nested contract of a singular nested property.
    #[must_use]
    pub fn nested(&self, name: &str) -> Option<&Self> {
        let key = self.schema.accessors().get(name)?.key();
        self.fields.get(key).and_then(Field::as_form)
    }

    pub fn nested_mut(&mut self, name: &str) -> Option<&mut Self> {
        let key = self.schema.accessors().get(name)?.key().to_owned();
        match self.fields.get_mut(&key)? {
            Field::Form(form) => form.as_deref_mut(),
            _ => None,
        }
    }

    /// The nested contracts of a nested collection property.
    #[must_use]
    pub fn nested_collection(&self, name: &str) -> Option<&[Self]> {
        let key = self.schema.accessors().get(name)?.key();
        self.fields.get(key).and_then(Field::as_forms)
    }

    /// Maps `input` into the field store and validates the whole tree.
    ///
    /// Properties missing from `input` keep their current values. Errors from any
    /// previous call are discarded.
    pub fn validate(&mut self, input: &Map<String, Value>) -> bool {
        self.absorb(input);
        self.check();

        debug!(
            contract = %self.schema.name(),
            valid = self.errors.is_empty(),
            failing = self.errors.len(),
            "validation finished"
        );

        self.errors.is_empty()
    }

    /// Re-runs validation on the current field store without new input.
    ///
    /// Values that failed coercion are still reported until they are overwritten.
    pub fn revalidate(&mut self) -> bool {
        self.check();
        self.errors.is_empty()
    }

    /// Writes the field store back onto `model`. Unchanged attributes are left alone.
    pub fn sync<M: Model + ?Sized>(&self, model: &mut M) {
        self.schema.representer().sync(&self.fields, model);
    }

    /// Syncs onto `model`, then hands the nested hash to `persist`.
    pub fn save<M, F, T>(&self, model: &mut M, persist: F) -> T
    where
        M: Model + ?Sized,
        F: FnOnce(&mut M, Map<String, Value>) -> T,
    {
        self.sync(model);
        persist(model, self.to_nested_hash())
    }

    /// The field store as a JSON object keyed by public names.
    #[must_use]
    pub fn to_nested_hash(&self) -> Map<String, Value> {
        self.schema.representer().serialize(&self.fields)
    }

    pub(crate) fn absorb(&mut self, input: &Map<String, Value>) {
        let schema = Arc::clone(&self.schema);
        schema.representer().deserialize(&mut self.fields, input);
    }

    fn check(&mut self) {
        let schema = Arc::clone(&self.schema);
        let mut errors = Errors::new();

        for property in schema.properties() {
            if let Some(message) = self.fields.failure(property.storage_key()) {
                errors.add(property.name(), message);
            }
        }
        schema.validators().run(self, &mut errors);

        for property in schema.properties().iter().filter(|p| p.is_nested()) {
            match self.fields.get_mut(property.storage_key()) {
                Some(Field::Form(Some(form))) => {
                    form.check();
                    errors.merge_nested(property.name(), &form.errors);
                },
                Some(Field::Forms(forms)) => {
                    for form in forms.iter_mut() {
                        form.check();
                        errors.merge_nested(property.name(), &form.errors);
                    }
                },
                _ => {},
            }
        }

        let properties = schema.properties();
        errors.order_by(|head| {
            properties.iter().position(|p| p.name() == head).unwrap_or(properties.len())
        });

        self.state = if errors.is_empty() { ContractState::Valid } else { ContractState::Invalid };
        self.errors = errors;
    }
}
