use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target type applied to scalar input values while deserializing a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coercion {
    String,
    Integer,
    Float,
    Boolean,
}

impl Coercion {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Coercion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" | "str" => Ok(Self::String),
            "integer" | "int" => Ok(Self::Integer),
            "float" | "decimal" => Ok(Self::Float),
            "boolean" | "bool" => Ok(Self::Boolean),
            other => Err(format!("unknown coercion type '{other}'")),
        }
    }
}
