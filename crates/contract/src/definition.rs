//! Compiles declarative [`FormDefinition`]s into schemas.

use crate::error::{ConfigError, ConfigErrorExt};
use crate::feature::builtin;
use crate::property::PropertyOptions;
use crate::schema::{ContractBuilder, Schema};
use crate::validation::Rule;
use formwork_domain::definition::{FormDefinition, PropertySpec, RuleSpec, ValidationSpec};
use std::sync::Arc;

/// Builds the schema described by `definition`.
///
/// Features are registered before any property, so every nested property
/// receives all of them.
///
/// # Errors
/// * [`ConfigError::UnknownFeature`] for a feature name that is not built in.
/// * Any error the equivalent builder calls would return.
pub fn compile(definition: &FormDefinition) -> Result<Arc<Schema>, ConfigError> {
    let mut builder = ContractBuilder::new(definition.name.as_str());

    for name in &definition.features {
        let feature = builtin(name).ok_or_else(|| ConfigError::UnknownFeature {
            name: name.clone().into(),
            context: Some(definition.name.clone().into()),
        })?;
        builder.feature(feature)?;
    }

    declare(&mut builder, &definition.properties, &definition.validations)?;
    builder.build()
}

fn declare(
    builder: &mut ContractBuilder,
    properties: &[PropertySpec],
    validations: &[ValidationSpec],
) -> Result<(), ConfigError> {
    for spec in properties {
        let mut options = PropertyOptions::new().collection(spec.collection);
        if let Some(private_name) = &spec.private_name {
            options = options.as_name(private_name.as_str());
        }
        if let Some(coercion) = spec.coercion {
            options = options.coercion(coercion);
        }

        if spec.is_nested() {
            let children = spec.properties.clone();
            let rules = spec.validations.clone();
            builder.property_with(&spec.name, options, move |nested| {
                declare(nested, &children, &rules)
            })?;
        } else {
            if !spec.validations.is_empty() {
                return Err(ConfigError::invalid(
                    "only nested properties can carry validations",
                    &spec.name,
                ));
            }
            builder.property(&spec.name, options)?;
        }
    }

    for validation in validations {
        let fields: Vec<&str> = validation.fields.iter().map(String::as_str).collect();
        let rule = to_rule(&validation.rule).context(builder.name().to_owned())?;
        builder.validates(&fields, rule)?;
    }

    Ok(())
}

fn to_rule(spec: &RuleSpec) -> Result<Rule, ConfigError> {
    Ok(match spec {
        RuleSpec::Presence => Rule::Presence,
        RuleSpec::Length { min, max } => Rule::Length { min: *min, max: *max },
        RuleSpec::Numericality { min, max, only_integer } => {
            Rule::Numericality { min: *min, max: *max, only_integer: *only_integer }
        },
        RuleSpec::Inclusion { values } => Rule::Inclusion(values.clone()),
        RuleSpec::Format { pattern } => Rule::format(pattern)?,
    })
}
