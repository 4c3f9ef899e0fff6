//! Declarative form definitions.
//!
//! A [`FormDefinition`] is the data-only counterpart of the builder API and can be
//! read from TOML, JSON or YAML:
//!
//! ```toml
//! name = "album"
//! features = ["strip"]
//!
//! [[properties]]
//! name = "title"
//! type = "string"
//!
//! [[properties]]
//! name = "hit"
//!
//!   [[properties.properties]]
//!   name = "rating"
//!   type = "integer"
//!
//!   [[properties.validations]]
//!   fields = ["rating"]
//!   rule = "presence"
//!
//! [[validations]]
//! fields = ["title"]
//! rule = "presence"
//! ```

use crate::coercion::Coercion;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level form definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub name: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub properties: Vec<PropertySpec>,
    #[serde(default)]
    pub validations: Vec<ValidationSpec>,
}

/// A single property. It is nested when it declares `properties` of its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySpec {
    pub name: String,
    #[serde(default, rename = "as", skip_serializing_if = "Option::is_none")]
    pub private_name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub coercion: Option<Coercion>,
    #[serde(default)]
    pub collection: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Self>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validations: Vec<ValidationSpec>,
}

impl PropertySpec {
    #[must_use]
    pub fn is_nested(&self) -> bool {
        !self.properties.is_empty()
    }
}

/// A rule applied to one or more fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSpec {
    pub fields: Vec<String>,
    #[serde(flatten)]
    pub rule: RuleSpec,
}

/// Built-in validation rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleSpec {
    Presence,
    Length {
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
    },
    Numericality {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
        #[serde(default)]
        only_integer: bool,
    },
    Inclusion {
        values: Vec<Value>,
    },
    Format {
        pattern: String,
    },
}
