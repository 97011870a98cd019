//! Conversion between DynamoDB attribute values and JSON.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{Map, Number, Value};

use crate::numeric::normalize_decimal_str;

/// Convert one attribute into JSON, normalizing `N` decimals.
pub fn to_json(attribute: &AttributeValue) -> Value {
    match attribute {
        AttributeValue::S(text) => Value::String(text.clone()),
        AttributeValue::N(text) => number_to_json(text),
        AttributeValue::Bool(flag) => Value::Bool(*flag),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(items) => Value::Array(items.iter().map(to_json).collect()),
        AttributeValue::M(map) => Value::Object(map_to_json(map)),
        AttributeValue::Ss(items) => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(items) => {
            Value::Array(items.iter().map(|n| number_to_json(n)).collect())
        }
        AttributeValue::B(blob) => Value::String(STANDARD.encode(blob.as_ref())),
        AttributeValue::Bs(blobs) => Value::Array(
            blobs
                .iter()
                .map(|blob| Value::String(STANDARD.encode(blob.as_ref())))
                .collect(),
        ),
        other => {
            tracing::warn!("Unsupported DynamoDB attribute type: {:?}", other);
            Value::Null
        }
    }
}

/// Convert a whole item (as returned by `GetItem`) into a JSON object.
pub fn item_to_json(item: &HashMap<String, AttributeValue>) -> Value {
    Value::Object(map_to_json(item))
}

/// Convert JSON back into an attribute for writes.
pub fn json_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(flag) => AttributeValue::Bool(*flag),
        Value::Number(number) => AttributeValue::N(number.to_string()),
        Value::String(text) => AttributeValue::S(text.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(json_to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(key, value)| (key.clone(), json_to_attribute(value)))
                .collect(),
        ),
    }
}

fn map_to_json(map: &HashMap<String, AttributeValue>) -> Map<String, Value> {
    map.iter()
        .map(|(key, attribute)| (key.clone(), to_json(attribute)))
        .collect()
}

fn number_to_json(text: &str) -> Value {
    match normalize_decimal_str(text) {
        Some(number) => Value::Number(number),
        None => {
            tracing::warn!("DynamoDB returned a non-numeric N value: {}", text);
            Value::Number(Number::from(0))
        }
    }
}
