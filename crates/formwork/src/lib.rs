//! Facade crate for formwork.
//! Re-exports the contract engine with its domain types and, with the `loader`
//! feature, the kernel loaders. Keep this crate thin: it composes other crates.
//!
//! ## Usage
//! ```rust,no_run
//! use formwork::prelude::*;
//!
//! # fn main() -> Result<(), formwork::FormworkError> {
//! let schema = formwork::load_schema("album.toml".as_ref())?;
//! let mut form = Contract::new(schema, &Map::new());
//! form.validate(&Map::new());
//! # Ok(())
//! # }
//! ```

pub use formwork_contract as contract;
pub use formwork_domain as domain;
#[cfg(feature = "loader")]
pub use formwork_kernel as kernel;

pub use formwork_contract::prelude;

use std::borrow::Cow;

/// Build-time enabled features (by Cargo feature).
pub const ENABLED: &[&str] = &[
    #[cfg(feature = "loader")]
    "loader",
];

#[must_use]
pub fn is_enabled(name: &str) -> bool {
    ENABLED.contains(&name)
}

#[formwork_derive::formwork_error]
pub enum FormworkError {
    /// The definition could not be compiled into a schema.
    #[error("Schema error{}: {source}", format_context(.context))]
    Schema { source: formwork_contract::ConfigError, context: Option<Cow<'static, str>> },

    /// The definition file could not be read.
    #[cfg(feature = "loader")]
    #[error("Document error{}: {source}", format_context(.context))]
    Document {
        source: formwork_kernel::document::DocumentError,
        context: Option<Cow<'static, str>>,
    },
}

/// Reads a definition file and compiles it.
///
/// # Errors
/// [`FormworkError::Document`] when the file cannot be read,
/// [`FormworkError::Schema`] when the definition is invalid.
#[cfg(feature = "loader")]
pub fn load_schema(
    path: &std::path::Path,
) -> Result<std::sync::Arc<formwork_contract::Schema>, FormworkError> {
    let definition = formwork_kernel::document::load_definition(path)?;
    let schema = formwork_contract::compile(&definition).context(definition.name.clone())?;
    Ok(schema)
}
