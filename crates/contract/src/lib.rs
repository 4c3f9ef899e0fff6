//! # Form Contracts
//!
//! Declarative form objects over JSON-like models.
//!
//! A [`ContractBuilder`] declares which model attributes a form exposes, how
//! incoming values are coerced and which rules they must satisfy. Building it
//! yields a shared, immutable [`Schema`]. A [`Contract`] is one form instance:
//! it copies the model's values into its own field store, validates raw input
//! against the schema and writes the result back with [`Contract::sync`].
//!
//! Properties nest. A nested property gets its own schema, either built
//! elsewhere or defined inline with a block, and nested validation errors are
//! reported under dotted paths such as `hit.rating`.
//!
//! ## Example
//! ```rust
//! use formwork_contract::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), ConfigError> {
//! let mut album = ContractBuilder::new("album");
//! album.property("title", PropertyOptions::new())?;
//! album.property_with("hit", PropertyOptions::new(), |hit| {
//!     hit.property("title", PropertyOptions::new())?;
//!     hit.property("rating", PropertyOptions::new().coercion(Coercion::Integer))?;
//!     hit.validates(&["title", "rating"], Rule::Presence)?;
//!     Ok(())
//! })?;
//! let schema = album.build()?;
//!
//! let mut model = json!({ "title": "Dummy", "hit": { "title": null, "rating": null } });
//! let mut form = Contract::new(schema, &model);
//!
//! assert!(!form.validate(&Map::new()));
//! assert_eq!(form.errors().paths().collect::<Vec<_>>(), ["hit.title", "hit.rating"]);
//!
//! let input = json!({ "hit": { "title": "LA Drone", "rating": "10" } });
//! assert!(form.validate(input.as_object().unwrap()));
//!
//! form.sync(&mut model);
//! assert_eq!(model["hit"]["rating"], json!(10));
//! # Ok(())
//! # }
//! ```

mod accessor;
mod coerce;
mod contract;
mod definition;
mod error;
mod feature;
mod fields;
mod model;
mod property;
mod representer;
mod schema;
mod validation;

pub use accessor::{Accessor, AccessorOverride, AccessorTable, ReadHook, WriteHook};
pub use contract::{Contract, ContractState};
pub use definition::compile;
pub use error::{ConfigError, ConfigErrorExt, ContractError, ContractErrorExt};
pub use feature::{Feature, FeatureId, FeatureRegistry, NullifyBlank, Strip, builtin};
pub use fields::{Field, FieldStore};
pub use model::Model;
pub use property::{PropertyDefinition, PropertyOptions};
pub use representer::{Binding, Representer};
pub use schema::{ContractBuilder, Schema};
pub use validation::{
    CustomValidator, Errors, FieldRule, Rule, ValidateFn, Validator, ValidatorSet,
};

pub use formwork_domain::coercion::Coercion;
pub use formwork_domain::flags::PropertyFlags;

pub mod prelude {
    pub use crate::{
        AccessorOverride, Coercion, ConfigError, Contract, ContractBuilder, ContractError,
        CustomValidator, Errors, Feature, Model, NullifyBlank, PropertyOptions, Rule, Schema,
        Strip,
    };
    pub use serde_json::{Map, Value};
}
