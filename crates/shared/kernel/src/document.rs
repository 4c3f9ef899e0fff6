//! Form definitions and JSON documents.

use config::{Config, File};
use formwork_domain::definition::FormDefinition;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::debug;

#[formwork_derive::formwork_error]
pub enum DocumentError {
    #[error("Definition error{}: {source}", format_context(.context))]
    Definition { source: config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("JSON error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Expected a JSON object{}", format_context(.context))]
    NotAnObject { context: Option<Cow<'static, str>> },
}

/// Reads a [`FormDefinition`]. The format follows the file extension
/// (`.toml`, `.json`, `.yaml`).
///
/// # Errors
/// [`DocumentError::Definition`] if the file is missing or does not describe a form.
pub fn load_definition(path: &Path) -> Result<FormDefinition, DocumentError> {
    debug!(path = %path.display(), "loading form definition");

    let definition = Config::builder()
        .add_source(File::from(path).required(true))
        .build()
        .and_then(Config::try_deserialize::<FormDefinition>)
        .context(path.display().to_string())?;

    Ok(definition)
}

/// Parses `source` as a JSON object. Inline JSON (starting with `{`) is used as is,
/// anything else is treated as a file path.
///
/// # Errors
/// * [`DocumentError::Io`] if the file cannot be read.
/// * [`DocumentError::Json`] for malformed JSON.
/// * [`DocumentError::NotAnObject`] when the document is not an object.
pub fn read_object(source: &str) -> Result<Map<String, Value>, DocumentError> {
    let (raw, origin) = if source.trim_start().starts_with('{') {
        (Cow::Borrowed(source), "inline".to_owned())
    } else {
        (Cow::Owned(fs::read_to_string(source).context(source.to_owned())?), source.to_owned())
    };

    match serde_json::from_str::<Value>(&raw).context(origin.clone())? {
        Value::Object(map) => Ok(map),
        _ => Err(DocumentError::NotAnObject { context: Some(origin.into()) }),
    }
}
