//! # Schema
//!
//! A [`ContractBuilder`] collects property declarations, validators, features
//! and accessor overrides. [`ContractBuilder::build`] compiles them into an
//! immutable [`Schema`] shared through `Arc`.
//!
//! Nested blocks are compiled in two phases. Declaring one only records the
//! block together with the features registered at that moment; the nested
//! builder is created, seeded with those features and run at `build()`.
//!
//! ## Example
//! ```rust
//! use formwork_contract::prelude::*;
//!
//! # fn main() -> Result<(), ConfigError> {
//! let mut album = ContractBuilder::new("album");
//! album.feature(std::sync::Arc::new(Strip))?;
//! album.property("title", PropertyOptions::new())?;
//! album.property_with("hit", PropertyOptions::new(), |hit| {
//!     hit.property("title", PropertyOptions::new())?;
//!     hit.validates(&["title"], Rule::Presence)?;
//!     Ok(())
//! })?;
//! let schema = album.build()?;
//!
//! let hit = schema.property("hit").and_then(|p| p.nested()).expect("nested schema");
//! assert!(hit.features().contains("strip"));
//! # Ok(())
//! # }
//! ```

use crate::accessor::{AccessorOverride, AccessorTable};
use crate::error::ConfigError;
use crate::feature::{Feature, FeatureRegistry};
use crate::property::{PropertyDefinition, PropertyOptions};
use crate::representer::Representer;
use crate::validation::{FieldRule, Rule, Validator, ValidatorSet};
use formwork_domain::constants::is_reserved;
use formwork_domain::flags::PropertyFlags;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

type Body = Box<dyn FnOnce(&mut ContractBuilder) -> Result<(), ConfigError>>;

/// Compiled, immutable contract definition.
#[derive(Debug)]
pub struct Schema {
    name: String,
    properties: Vec<PropertyDefinition>,
    features: FeatureRegistry,
    validators: ValidatorSet,
    accessors: AccessorTable,
    representer: Representer,
}

impl Schema {
    /// Shorthand for [`ContractBuilder::new`].
    pub fn builder(name: impl Into<String>) -> ContractBuilder {
        ContractBuilder::new(name)
    }

    /// Starts a derived definition from an independent copy of this one.
    ///
    /// Properties, features, validators and accessor overrides are copied into the
    /// new builder; changes made there never reach `self`.
    pub fn extend(&self, name: impl Into<String>) -> ContractBuilder {
        let name = name.into();
        debug!(parent = %self.name, derived = %name, "extending schema");

        ContractBuilder {
            name,
            declarations: self
                .properties
                .iter()
                .map(|definition| PropertyDecl {
                    definition: definition.clone(),
                    nested: definition.nested.clone().map(NestedSpec::Form),
                })
                .collect(),
            features: self.features.clone(),
            validators: self.validators.clone(),
            accessors: self.accessors.clone(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Properties in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[PropertyDefinition] {
        &self.properties
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub const fn features(&self) -> &FeatureRegistry {
        &self.features
    }

    #[must_use]
    pub const fn validators(&self) -> &ValidatorSet {
        &self.validators
    }

    #[must_use]
    pub const fn accessors(&self) -> &AccessorTable {
        &self.accessors
    }

    #[must_use]
    pub const fn representer(&self) -> &Representer {
        &self.representer
    }

    /// Same as [`Schema::representer`].
    #[must_use]
    pub const fn mapper(&self) -> &Representer {
        &self.representer
    }
}

enum NestedSpec {
    /// A schema built elsewhere, or inherited from a parent definition.
    Form(Arc<Schema>),
    /// A block compiled at `build()`.
    Block { base: Option<Arc<Schema>>, features: Vec<Arc<dyn Feature>>, bodies: Vec<Body> },
}

impl fmt::Debug for NestedSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Form(schema) => f.debug_tuple("Form").field(&schema.name).finish(),
            Self::Block { base, features, bodies } => f
                .debug_struct("Block")
                .field("base", &base.as_ref().map(|s| s.name()))
                .field("features", &features.iter().map(|f| f.name()).collect::<Vec<_>>())
                .field("bodies", &bodies.len())
                .finish(),
        }
    }
}

#[derive(Debug)]
struct PropertyDecl {
    definition: PropertyDefinition,
    nested: Option<NestedSpec>,
}

/// Declarative surface for defining a contract.
///
/// Every declaration either succeeds or fails without touching the builder.
pub struct ContractBuilder {
    name: String,
    declarations: Vec<PropertyDecl>,
    features: FeatureRegistry,
    validators: ValidatorSet,
    accessors: AccessorTable,
}

impl fmt::Debug for ContractBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractBuilder")
            .field("name", &self.name)
            .field("declarations", &self.declarations)
            .field("features", &self.features.names())
            .field("validators", &self.validators.len())
            .finish_non_exhaustive()
    }
}

impl ContractBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declarations: Vec::new(),
            features: FeatureRegistry::default(),
            validators: ValidatorSet::default(),
            accessors: AccessorTable::default(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the properties declared so far, in order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.declarations.iter().map(|d| d.definition.name.as_str())
    }

    #[must_use]
    pub const fn features(&self) -> &FeatureRegistry {
        &self.features
    }

    /// Declares a property. Redeclaring a name replaces it in place.
    ///
    /// # Errors
    /// * [`ConfigError::ReservedName`] for a reserved name.
    /// * [`ConfigError::InvalidOption`] for an empty name or contradictory options.
    pub fn property(
        &mut self,
        name: &str,
        options: PropertyOptions,
    ) -> Result<&mut Self, ConfigError> {
        self.declare(name, options, None)
    }

    /// Declares a nested property whose schema is defined by `body`.
    ///
    /// `body` runs at [`ContractBuilder::build`] against a nested builder that already
    /// has every feature registered here so far. With `inherit`, the block extends
    /// the existing nested definition of the same name.
    ///
    /// # Errors
    /// See [`ContractBuilder::property`]. `inherit` without an existing nested
    /// property and `form` combined with a block are rejected.
    pub fn property_with<F>(
        &mut self,
        name: &str,
        options: PropertyOptions,
        body: F,
    ) -> Result<&mut Self, ConfigError>
    where
        F: FnOnce(&mut Self) -> Result<(), ConfigError> + 'static,
    {
        self.declare(name, options, Some(Box::new(body)))
    }

    /// # Errors
    /// See [`ContractBuilder::property`].
    pub fn collection(
        &mut self,
        name: &str,
        options: PropertyOptions,
    ) -> Result<&mut Self, ConfigError> {
        self.declare(name, options.collection(true), None)
    }

    /// # Errors
    /// See [`ContractBuilder::property_with`].
    pub fn collection_with<F>(
        &mut self,
        name: &str,
        options: PropertyOptions,
        body: F,
    ) -> Result<&mut Self, ConfigError>
    where
        F: FnOnce(&mut Self) -> Result<(), ConfigError> + 'static,
    {
        self.declare(name, options.collection(true), Some(Box::new(body)))
    }

    /// Declares each of `names` with the same options.
    ///
    /// # Errors
    /// Stops at the first failing name; earlier names stay declared.
    pub fn properties(
        &mut self,
        names: &[&str],
        options: &PropertyOptions,
    ) -> Result<&mut Self, ConfigError> {
        for name in names {
            self.declare(name, options.clone(), None)?;
        }
        Ok(self)
    }

    /// Attaches `rule` to every field in `fields`. Repeated registrations are ignored.
    ///
    /// # Errors
    /// [`ConfigError::InvalidOption`] when `fields` is empty.
    pub fn validates(&mut self, fields: &[&str], rule: Rule) -> Result<&mut Self, ConfigError> {
        if fields.is_empty() {
            return Err(ConfigError::invalid("`validates` needs at least one field", &self.name));
        }
        for field in fields {
            self.validate_with(FieldRule::new(*field, rule.clone()));
        }
        Ok(self)
    }

    /// Registers a validator unless one with the same key is present.
    pub fn validate_with<V: Validator + 'static>(&mut self, validator: V) -> &mut Self {
        self.register_validator(Arc::new(validator));
        self
    }

    /// Registers `feature` and installs it, unless it is already registered.
    ///
    /// # Errors
    /// Whatever the feature's install hook returns.
    pub fn feature(&mut self, feature: Arc<dyn Feature>) -> Result<&mut Self, ConfigError> {
        if self.features.register(Arc::clone(&feature)) {
            debug!(contract = %self.name, feature = feature.name(), "feature installed");
            feature.install(self)?;
        }
        Ok(self)
    }

    /// Merges a reusable schema fragment.
    ///
    /// Properties replace declarations of the same name, validators and features
    /// already present are skipped, and accessor overrides are added for
    /// properties that have none yet.
    pub fn include(&mut self, fragment: &Schema) -> &mut Self {
        debug!(contract = %self.name, fragment = %fragment.name, "including fragment");

        self.accessors.merge(&fragment.accessors);
        for definition in &fragment.properties {
            self.accessors.define(&definition.name, definition.storage_key());
            self.upsert(PropertyDecl {
                definition: definition.clone(),
                nested: definition.nested.clone().map(NestedSpec::Form),
            });
        }
        for validator in fragment.validators.iter() {
            self.register_validator(Arc::clone(validator));
        }
        for feature in fragment.features.iter() {
            self.features.register(Arc::clone(feature));
        }
        self
    }

    /// Layers `layer` over the accessor of property `name`.
    ///
    /// # Errors
    /// [`ConfigError::InvalidOption`] if `name` is not declared.
    pub fn override_accessor(
        &mut self,
        name: &str,
        layer: AccessorOverride,
    ) -> Result<&mut Self, ConfigError> {
        if !self.accessors.push_layer(name, layer) {
            return Err(ConfigError::invalid(
                format!("cannot override accessor of undeclared property '{name}'"),
                &self.name,
            ));
        }
        Ok(self)
    }

    /// Compiles the definition, building nested blocks first.
    ///
    /// # Errors
    /// Errors raised by nested blocks, and [`ConfigError::InvalidOption`] for a
    /// validator bound to an undeclared property.
    pub fn build(self) -> Result<Arc<Schema>, ConfigError> {
        let Self { name, declarations, features, validators, accessors } = self;

        let mut properties = Vec::with_capacity(declarations.len());
        for PropertyDecl { mut definition, nested } in declarations {
            definition.nested = match nested {
                None => None,
                Some(NestedSpec::Form(schema)) => Some(schema),
                Some(NestedSpec::Block { base, features, bodies }) => {
                    let nested_name = format!("{name}.{}", definition.name);
                    Some(compile_block(nested_name, base, features, bodies)?)
                },
            };
            properties.push(definition);
        }

        if let Some(field) = validators
            .iter()
            .filter_map(|v| v.attribute())
            .find(|field| !properties.iter().any(|p| p.name == *field))
        {
            return Err(ConfigError::invalid(
                format!("validation refers to undeclared property '{field}'"),
                &name,
            ));
        }

        let representer = Representer::compile(&properties, &features);
        debug!(
            contract = %name,
            properties = properties.len(),
            validators = validators.len(),
            features = ?features.names(),
            "schema compiled"
        );

        Ok(Arc::new(Schema { name, properties, features, validators, accessors, representer }))
    }

    fn declare(
        &mut self,
        name: &str,
        options: PropertyOptions,
        body: Option<Body>,
    ) -> Result<&mut Self, ConfigError> {
        self.check_name(name)?;

        let nested = options.form.is_some() || body.is_some();
        if options.form.is_some() && body.is_some() {
            return Err(ConfigError::invalid("`form` cannot be combined with a block", name));
        }
        if nested && options.coercion.is_some() {
            return Err(ConfigError::invalid("nested properties cannot be coerced", name));
        }
        if options.inherit && body.is_none() {
            return Err(ConfigError::invalid("`inherit` needs a block", name));
        }

        let PropertyOptions { private_name, coercion, collection, form, inherit } = options;
        let spec = match (form, body) {
            (Some(schema), _) => Some(NestedSpec::Form(schema)),
            (None, Some(body)) => Some(self.block(name, inherit, body)?),
            (None, None) => None,
        };

        let mut flags = PropertyFlags::empty();
        flags.set(PropertyFlags::COLLECTION, collection);
        if spec.is_some() {
            flags |= PropertyFlags::FORM;
        } else if coercion.is_some() {
            flags |= PropertyFlags::TYPED;
        }

        let features = match &spec {
            Some(NestedSpec::Block { features, .. }) => features.iter().map(|f| f.name()).collect(),
            _ => Vec::new(),
        };

        let definition = PropertyDefinition {
            name: name.to_owned(),
            private_name,
            coercion,
            flags,
            features,
            nested: None,
        };
        trace!(contract = %self.name, property = name, flags = ?flags.labels(), "property declared");

        self.accessors.define(name, definition.storage_key());
        self.upsert(PropertyDecl { definition, nested: spec });
        Ok(self)
    }

    /// Records a nested block, snapshotting the features registered so far.
    fn block(&mut self, name: &str, inherit: bool, body: Body) -> Result<NestedSpec, ConfigError> {
        let snapshot = self.features.snapshot();
        if !inherit {
            return Ok(NestedSpec::Block { base: None, features: snapshot, bodies: vec![body] });
        }

        let inherited = self
            .declarations
            .iter_mut()
            .find(|d| d.definition.name == name)
            .and_then(|d| d.nested.take());

        match inherited {
            Some(NestedSpec::Form(base)) => {
                Ok(NestedSpec::Block { base: Some(base), features: snapshot, bodies: vec![body] })
            },
            Some(NestedSpec::Block { base, mut features, mut bodies }) => {
                for feature in snapshot {
                    if !features.iter().any(|f| f.name() == feature.name()) {
                        features.push(feature);
                    }
                }
                bodies.push(body);
                Ok(NestedSpec::Block { base, features, bodies })
            },
            None => Err(ConfigError::invalid("`inherit` needs an inherited nested property", name)),
        }
    }

    fn check_name(&self, name: &str) -> Result<(), ConfigError> {
        if name.trim().is_empty() {
            return Err(ConfigError::invalid("property name cannot be empty", &self.name));
        }
        if is_reserved(name) {
            return Err(ConfigError::ReservedName {
                name: name.to_owned().into(),
                context: Some(self.name.clone().into()),
            });
        }
        Ok(())
    }

    fn upsert(&mut self, decl: PropertyDecl) {
        match self.declarations.iter_mut().find(|d| d.definition.name == decl.definition.name) {
            Some(slot) => *slot = decl,
            None => self.declarations.push(decl),
        }
    }

    fn register_validator(&mut self, validator: Arc<dyn Validator>) {
        let key = validator.key();
        if self.validators.insert(validator) {
            trace!(contract = %self.name, validator = %key, "validator registered");
        }
    }
}

fn compile_block(
    name: String,
    base: Option<Arc<Schema>>,
    features: Vec<Arc<dyn Feature>>,
    bodies: Vec<Body>,
) -> Result<Arc<Schema>, ConfigError> {
    let mut builder = match base {
        Some(base) => base.extend(name),
        None => ContractBuilder::new(name),
    };
    for feature in features {
        builder.feature(feature)?;
    }
    for body in bodies {
        body(&mut builder)?;
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{NullifyBlank, Strip};
    use formwork_domain::coercion::Coercion;

    fn album() -> ContractBuilder {
        let mut builder = ContractBuilder::new("album");
        builder
            .property("title", PropertyOptions::new())
            .and_then(|b| b.property("year", PropertyOptions::new().coercion(Coercion::Integer)))
            .expect("valid declarations");
        builder
    }

    #[test]
    fn redeclaration_keeps_position() {
        let mut builder = album();
        builder.property("title", PropertyOptions::new().as_name("name")).expect("redeclare");

        let schema = builder.build().expect("build");
        let names: Vec<_> = schema.properties().iter().map(PropertyDefinition::name).collect();

        assert_eq!(names, ["title", "year"]);
        assert_eq!(schema.property("title").and_then(|p| p.private_name()), Some("name"));
        assert_eq!(schema.accessors().get("title").map(|a| a.key()), Some("name"));
    }

    #[test]
    fn rejected_declarations_leave_builder_untouched() {
        let mut builder = album();

        assert!(matches!(
            builder.property("fields", PropertyOptions::new()),
            Err(ConfigError::ReservedName { .. })
        ));
        assert!(builder.property("", PropertyOptions::new()).is_err());
        assert!(
            builder
                .property_with("hit", PropertyOptions::new().coercion(Coercion::Integer), |_| Ok(()))
                .is_err()
        );
        assert!(builder.property_with("hit", PropertyOptions::new().inherit(true), |_| Ok(())).is_err());

        assert_eq!(builder.property_names().collect::<Vec<_>>(), ["title", "year"]);
    }

    #[test]
    fn typed_flags_follow_options() {
        let mut builder = album();
        builder
            .collection_with("songs", PropertyOptions::new(), |song| {
                song.property("title", PropertyOptions::new()).map(|_| ())
            })
            .expect("collection");

        let schema = builder.build().expect("build");
        let songs = schema.property("songs").expect("songs");

        assert!(songs.is_collection());
        assert_eq!(songs.flags(), PropertyFlags::FORM | PropertyFlags::COLLECTION);
        assert_eq!(schema.property("year").map(PropertyDefinition::flags), Some(PropertyFlags::TYPED));
        assert!(schema.property("title").is_some_and(|p| p.flags().is_empty()));
    }

    #[test]
    fn features_install_once() {
        let mut builder = album();
        builder.feature(Arc::new(Strip)).expect("strip");
        builder.feature(Arc::new(Strip)).expect("strip again");
        builder.feature(Arc::new(NullifyBlank)).expect("nullify");

        assert_eq!(builder.features().names(), ["strip", "nullify_blank"]);
    }

    #[test]
    fn validators_need_declared_fields() {
        let mut builder = album();
        builder.validates(&["artist"], Rule::Presence).expect("registered");

        assert!(matches!(builder.build(), Err(ConfigError::InvalidOption { .. })));
        assert!(album().validates(&[], Rule::Presence).is_err());
    }

    #[test]
    fn override_requires_declared_property() {
        let mut builder = album();
        assert!(builder.override_accessor("title", AccessorOverride::new()).is_ok());
        assert!(builder.override_accessor("artist", AccessorOverride::new()).is_err());
    }
}
