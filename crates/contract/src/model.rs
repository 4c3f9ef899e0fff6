use serde_json::{Map, Value};

/// An object a contract can read attributes from and write them back to.
///
/// Nested models are exchanged as JSON objects: a nested property reads its
/// attribute as a [`Value::Object`] and wraps it in a sub-contract.
///
/// # Example
/// ```rust
/// use formwork_contract::Model;
/// use serde_json::Value;
///
/// #[derive(Debug, Default)]
/// struct Song {
///     title: Option<String>,
/// }
///
/// impl Model for Song {
///     fn read(&self, name: &str) -> Option<Value> {
///         match name {
///             "title" => Some(self.title.clone().map_or(Value::Null, Value::String)),
///             _ => None,
///         }
///     }
///
///     fn write(&mut self, name: &str, value: Value) {
///         if name == "title" {
///             self.title = value.as_str().map(str::to_owned);
///         }
///     }
/// }
/// ```
pub trait Model {
    /// Returns the attribute, or `None` when the model has no such attribute.
    fn read(&self, name: &str) -> Option<Value>;

    /// Overwrites the attribute.
    fn write(&mut self, name: &str, value: Value);
}

impl Model for Map<String, Value> {
    fn read(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }

    fn write(&mut self, name: &str, value: Value) {
        self.insert(name.to_owned(), value);
    }
}

/// Non-object values behave as models without attributes; writing turns them into objects.
impl Model for Value {
    fn read(&self, name: &str) -> Option<Value> {
        self.as_object().and_then(|map| map.read(name))
    }

    fn write(&mut self, name: &str, value: Value) {
        if !self.is_object() {
            *self = Self::Object(Map::new());
        }
        if let Self::Object(map) = self {
            map.write(name, value);
        }
    }
}

impl<M: Model + ?Sized> Model for &mut M {
    fn read(&self, name: &str) -> Option<Value> {
        (**self).read(name)
    }

    fn write(&mut self, name: &str, value: Value) {
        (**self).write(name, value);
    }
}
