//! Scalar coercion applied to incoming values.
//!
//! `null` is never coerced. Blank strings become `null` for the numeric and
//! boolean targets, which is what an empty form field means.

use formwork_domain::coercion::Coercion;
use serde_json::{Number, Value};

/// Coerces `value` to `kind`, returning the validation message on failure.
pub(crate) fn coerce(kind: Coercion, value: Value) -> Result<Value, &'static str> {
    if value.is_null() {
        return Ok(value);
    }

    match kind {
        Coercion::String => to_string(value),
        Coercion::Integer => to_integer(value),
        Coercion::Float => to_float(value),
        Coercion::Boolean => to_boolean(value),
    }
}

/// The message reported when `kind` cannot be produced.
pub(crate) const fn failure_message(kind: Coercion) -> &'static str {
    match kind {
        Coercion::String => "is not a valid string",
        Coercion::Integer => "is not a valid integer",
        Coercion::Float => "is not a valid float",
        Coercion::Boolean => "is not a valid boolean",
    }
}

fn to_string(value: Value) -> Result<Value, &'static str> {
    match value {
        Value::String(_) => Ok(value),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        _ => Err(failure_message(Coercion::String)),
    }
}

fn to_integer(value: Value) -> Result<Value, &'static str> {
    let fail = failure_message(Coercion::Integer);
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::Number(n)),
        Value::Number(n) => n.as_f64().and_then(integral).map(Value::from).ok_or(fail),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(Value::Null);
            }
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
                .map(Value::from)
                .ok_or(fail)
        },
        _ => Err(fail),
    }
}

fn to_float(value: Value) -> Result<Value, &'static str> {
    let fail = failure_message(Coercion::Float);
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(Value::Null);
            }
            s.parse::<f64>().ok()
        },
        _ => None,
    };
    parsed.and_then(Number::from_f64).map(Value::Number).ok_or(fail)
}

fn to_boolean(value: Value) -> Result<Value, &'static str> {
    let fail = failure_message(Coercion::Boolean);
    match value {
        Value::Bool(_) => Ok(value),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Ok(Value::Bool(true)),
            Some(0) => Ok(Value::Bool(false)),
            _ => Err(fail),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(Value::Null),
            "true" | "t" | "1" | "yes" | "y" | "on" => Ok(Value::Bool(true)),
            "false" | "f" | "0" | "no" | "n" | "off" => Ok(Value::Bool(false)),
            _ => Err(fail),
        },
        _ => Err(fail),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15).then_some(f as i64)
}
