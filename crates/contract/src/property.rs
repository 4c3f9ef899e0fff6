use crate::feature::FeatureId;
use crate::schema::Schema;
use formwork_domain::coercion::Coercion;
use formwork_domain::flags::PropertyFlags;
use std::sync::Arc;

/// Options accepted by [`crate::ContractBuilder::property`].
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct PropertyOptions {
    pub(crate) private_name: Option<String>,
    pub(crate) coercion: Option<Coercion>,
    pub(crate) collection: bool,
    pub(crate) form: Option<Arc<Schema>>,
    pub(crate) inherit: bool,
}

impl PropertyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and writes the model attribute `name` instead of the public name.
    pub fn as_name(mut self, name: impl Into<String>) -> Self {
        self.private_name = Some(name.into());
        self
    }

    pub const fn coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = Some(coercion);
        self
    }

    pub const fn collection(mut self, enabled: bool) -> Self {
        self.collection = enabled;
        self
    }

    /// Uses an already built schema for the nested value.
    pub fn form(mut self, schema: Arc<Schema>) -> Self {
        self.form = Some(schema);
        self
    }

    /// Extends the inherited definition of the same name instead of replacing it.
    pub const fn inherit(mut self, enabled: bool) -> Self {
        self.inherit = enabled;
        self
    }
}

/// A declared property as stored in a compiled [`Schema`].
#[derive(Debug, Clone)]
pub struct PropertyDefinition {
    pub(crate) name: String,
    pub(crate) private_name: Option<String>,
    pub(crate) coercion: Option<Coercion>,
    pub(crate) flags: PropertyFlags,
    pub(crate) features: Vec<FeatureId>,
    pub(crate) nested: Option<Arc<Schema>>,
}

impl PropertyDefinition {
    /// Public name: accessor name, input key and error path segment.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn private_name(&self) -> Option<&str> {
        self.private_name.as_deref()
    }

    /// Key used for the field store and the model attribute.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        self.private_name.as_deref().unwrap_or(&self.name)
    }

    #[must_use]
    pub const fn coercion(&self) -> Option<Coercion> {
        self.coercion
    }

    #[must_use]
    pub const fn flags(&self) -> PropertyFlags {
        self.flags
    }

    /// Features propagated into the nested schema at declaration time.
    #[must_use]
    pub fn features(&self) -> &[FeatureId] {
        &self.features
    }

    #[must_use]
    pub fn nested(&self) -> Option<&Arc<Schema>> {
        self.nested.as_ref()
    }

    #[must_use]
    pub const fn is_nested(&self) -> bool {
        self.flags.is_nested()
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        self.flags.is_collection()
    }
}
