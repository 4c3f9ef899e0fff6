use anyhow::{Context, Result};
use formwork::contract::{Contract, PropertyDefinition, Schema};
use formwork::kernel::document::read_object;
use formwork::load_schema;
use serde_json::{Map, Value, json};
use std::path::Path;
use tracing::info;

/// Result of a command, mapped to the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Valid,
    Invalid,
}

/// Validates `input` against the definition, optionally syncing it onto `model`.
pub fn validate(definition: &Path, model: &str, input: &str, sync: bool) -> Result<(Outcome, Value)> {
    let schema = load_schema(definition)
        .with_context(|| format!("Failed to load definition {}", definition.display()))?;
    let mut model = read_object(model).context("Failed to read model")?;
    let input = read_object(input).context("Failed to read input")?;

    let mut form = Contract::new(schema, &model);
    let valid = form.validate(&input);
    info!(definition = %definition.display(), valid, "input validated");

    if !valid {
        return Ok((Outcome::Invalid, json!({ "valid": false, "errors": form.errors() })));
    }

    let mut report = json!({ "valid": true, "errors": {} });
    if sync {
        form.sync(&mut model);
        report["model"] = Value::Object(model);
    }
    Ok((Outcome::Valid, report))
}

/// Describes the compiled schema of a definition.
pub fn inspect(definition: &Path) -> Result<Value> {
    let schema = load_schema(definition)
        .with_context(|| format!("Failed to load definition {}", definition.display()))?;
    Ok(describe(&schema))
}

fn describe(schema: &Schema) -> Value {
    json!({
        "name": schema.name(),
        "features": schema.features().names(),
        "validators": schema.validators().iter().map(|v| v.key()).collect::<Vec<_>>(),
        "properties": schema.properties().iter().map(describe_property).collect::<Vec<_>>(),
    })
}

fn describe_property(property: &PropertyDefinition) -> Value {
    let mut out = Map::new();
    out.insert("name".to_owned(), property.name().into());
    if let Some(private_name) = property.private_name() {
        out.insert("as".to_owned(), private_name.into());
    }
    if let Some(coercion) = property.coercion() {
        out.insert("type".to_owned(), coercion.as_str().into());
    }
    out.insert("flags".to_owned(), property.flags().labels().into());
    if let Some(nested) = property.nested() {
        out.insert("features".to_owned(), property.features().into());
        out.insert("form".to_owned(), describe(nested));
    }
    Value::Object(out)
}
