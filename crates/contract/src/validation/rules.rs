use crate::error::ConfigError;
use regex::Regex;
use serde_json::Value;

/// Built-in field rules.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Not `null`, not a blank string, not an empty list or object.
    Presence,
    /// Character count of strings, element count of lists.
    Length { min: Option<usize>, max: Option<usize> },
    /// A number, or a string that parses as one.
    Numericality { min: Option<f64>, max: Option<f64>, only_integer: bool },
    /// One of the listed values.
    Inclusion(Vec<Value>),
    /// A string matching the expression.
    Format(Regex),
}

impl Rule {
    /// Compiles a [`Rule::Format`].
    ///
    /// # Errors
    /// Returns [`ConfigError::Pattern`] if `pattern` is not a valid regular expression.
    pub fn format(pattern: &str) -> Result<Self, ConfigError> {
        Ok(Self::Format(Regex::new(pattern)?))
    }

    pub(crate) fn signature(&self) -> String {
        match self {
            Self::Presence => "presence".to_owned(),
            Self::Length { min, max } => format!("length[{min:?},{max:?}]"),
            Self::Numericality { min, max, only_integer } => {
                format!("numericality[{min:?},{max:?},{only_integer}]")
            },
            Self::Inclusion(values) => format!("inclusion{}", Value::Array(values.clone())),
            Self::Format(regex) => format!("format[{}]", regex.as_str()),
        }
    }

    /// Returns the failure message, or `None` when `value` passes.
    pub(crate) fn check(&self, value: &Value) -> Option<String> {
        if let Self::Presence = self {
            return is_blank(value).then(|| "can't be blank".to_owned());
        }
        if value.is_null() {
            return None;
        }

        match self {
            Self::Presence => None,
            Self::Length { min, max } => check_length(value, *min, *max),
            Self::Numericality { min, max, only_integer } => {
                check_number(value, *min, *max, *only_integer)
            },
            Self::Inclusion(values) => {
                (!values.contains(value)).then(|| "is not included in the list".to_owned())
            },
            Self::Format(regex) => match value {
                Value::String(s) if regex.is_match(s) => None,
                _ => Some("is invalid".to_owned()),
            },
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn check_length(value: &Value, min: Option<usize>, max: Option<usize>) -> Option<String> {
    let len = match value {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        _ => return Some("is invalid".to_owned()),
    };

    if let Some(min) = min.filter(|&min| len < min) {
        return Some(format!("is too short (minimum is {min} characters)"));
    }
    if let Some(max) = max.filter(|&max| len > max) {
        return Some(format!("is too long (maximum is {max} characters)"));
    }
    None
}

fn check_number(
    value: &Value,
    min: Option<f64>,
    max: Option<f64>,
    only_integer: bool,
) -> Option<String> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let Some(number) = number else {
        return Some("is not a number".to_owned());
    };

    if only_integer && number.fract() != 0.0 {
        return Some("must be an integer".to_owned());
    }
    if let Some(min) = min.filter(|&min| number < min) {
        return Some(format!("must be greater than or equal to {min}"));
    }
    if let Some(max) = max.filter(|&max| number > max) {
        return Some(format!("must be less than or equal to {max}"));
    }
    None
}
