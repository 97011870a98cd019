//! Numeric normalization for values read from the store.
//!
//! Both DynamoDB and MongoDB hand numbers back as arbitrary-precision decimals.
//! Whole values become JSON integers and everything else becomes an `f64`, so
//! `5` never turns into `5.0` on the way out.

use serde_json::{Map, Number, Value};

/// Extended-JSON wrapper key MongoDB uses for `Decimal128`.
pub const DECIMAL_WRAPPER_KEY: &str = "$numberDecimal";

/// Parse decimal text into the narrowest faithful JSON number.
pub fn normalize_decimal_str(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(int) = text.parse::<i64>() {
        return Some(Number::from(int));
    }
    if let Ok(uint) = text.parse::<u64>() {
        return Some(Number::from(uint));
    }

    let float = text.parse::<f64>().ok().filter(|f| f.is_finite())?;
    whole_as_integer(float).or_else(|| Number::from_f64(float))
}

/// Recursively normalize numbers inside a value read from a store.
pub fn normalize(value: Value) -> Value {
    match value {
        Value::Number(number) => Value::Number(normalize_number(number)),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        Value::Object(map) => normalize_object(map),
        other => other,
    }
}

fn normalize_object(map: Map<String, Value>) -> Value {
    if map.len() == 1 {
        if let Some(Value::String(text)) = map.get(DECIMAL_WRAPPER_KEY) {
            if let Some(number) = normalize_decimal_str(text) {
                return Value::Number(number);
            }
        }
    }

    Value::Object(map.into_iter().map(|(k, v)| (k, normalize(v))).collect())
}

fn normalize_number(number: Number) -> Number {
    if number.is_i64() || number.is_u64() {
        return number;
    }
    number
        .as_f64()
        .and_then(whole_as_integer)
        .unwrap_or(number)
}

fn whole_as_integer(float: f64) -> Option<Number> {
    if float.fract() != 0.0 {
        return None;
    }
    if float >= i64::MIN as f64 && float < i64::MAX as f64 {
        return Some(Number::from(float as i64));
    }
    if float >= 0.0 && float < u64::MAX as f64 {
        return Some(Number::from(float as u64));
    }
    None
}
