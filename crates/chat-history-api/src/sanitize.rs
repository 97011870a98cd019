//! Projection of stored messages into the response shape.
//!
//! Stored messages are loose JSON written by other services over time, so each
//! one is checked field by field. A bad attachment is replaced by a stub and a
//! bad message by a placeholder; neither stops the rest of the transcript.

use serde::Serialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;

pub const UNKNOWN_FILE_NAME: &str = "Unknown file";
pub const UNKNOWN_ROLE: &str = "unknown";
pub const ATTACHMENT_ERROR_NOTE: &str = "An error occurred while processing the attachment";
pub const MESSAGE_ERROR_CONTENT: &str = "An error occurred while processing this message";
pub const MESSAGE_ERROR_NOTE: &str = "Message processing error";

/// A copied-through key: `None` when absent, `Some(None)` when stored as null.
pub type Passthrough = Option<Option<String>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedAttachment {
    pub file_name: String,
    pub file_type: String,
    pub size: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_url: Passthrough,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Passthrough,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SanitizedMessage {
    pub id: String,
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Passthrough,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Passthrough,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<SanitizedAttachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum SanitizeError {
    #[error("expected an object, got {0}")]
    NotAnObject(&'static str),

    #[error("field `{field}` should be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}

/// Sanitize a whole transcript, keeping order and length.
pub fn sanitize_messages(messages: &[Value]) -> Vec<SanitizedMessage> {
    messages
        .iter()
        .enumerate()
        .map(|(index, message)| {
            sanitize_message(message).unwrap_or_else(|e| {
                let message_id = message
                    .get("id")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown");
                tracing::error!(message_id = %message_id, "Message processing error: {}", e);
                placeholder_message(message, index)
            })
        })
        .collect()
}

pub fn sanitize_message(message: &Value) -> Result<SanitizedMessage, SanitizeError> {
    let fields = as_object(message)?;

    let attachment = fields
        .get("attachment")
        .filter(|value| is_truthy(value))
        .map(|value| {
            sanitize_attachment(value).unwrap_or_else(|e| {
                tracing::error!("Attachment processing error: {}", e);
                fallback_attachment(value)
            })
        });

    Ok(SanitizedMessage {
        id: string_or_default(fields, "id")?,
        role: string_or_default(fields, "role")?,
        content: string_or_default(fields, "content")?,
        mode: passthrough_string(fields, "mode")?,
        model: passthrough_string(fields, "model")?,
        attachment,
        note: None,
    })
}

pub fn sanitize_attachment(attachment: &Value) -> Result<SanitizedAttachment, SanitizeError> {
    let fields = as_object(attachment)?;

    let s3_key = optional_string(fields, "s3Key")?.filter(|key| !key.is_empty());
    if let Some(key) = &s3_key {
        let file_name = fields
            .get("fileName")
            .and_then(Value::as_str)
            .unwrap_or_default();
        tracing::info!(file_name = %file_name, s3_key = %key, "Attachment stored in S3");
    }

    Ok(SanitizedAttachment {
        file_name: string_or_default(fields, "fileName")?,
        file_type: string_or_default(fields, "fileType")?,
        size: number_or_zero(fields, "size")?,
        s3_key,
        // Legacy inline payloads; new history entries only keep the S3 key.
        data: optional_string(fields, "data")?.filter(|data| !data.is_empty()),
        display_url: passthrough_string(fields, "displayUrl")?,
        note: passthrough_string(fields, "note")?,
    })
}

fn fallback_attachment(attachment: &Value) -> SanitizedAttachment {
    let text = |key: &str| attachment.get(key).and_then(Value::as_str).map(str::to_string);

    SanitizedAttachment {
        file_name: text("fileName").unwrap_or_else(|| UNKNOWN_FILE_NAME.to_string()),
        file_type: text("fileType").unwrap_or_default(),
        size: attachment
            .get("size")
            .and_then(Value::as_number)
            .cloned()
            .unwrap_or_else(|| Number::from(0)),
        s3_key: None,
        data: None,
        display_url: None,
        note: Some(Some(ATTACHMENT_ERROR_NOTE.to_string())),
    }
}

fn placeholder_message(message: &Value, index: usize) -> SanitizedMessage {
    let text = |key: &str| message.get(key).and_then(Value::as_str).map(str::to_string);

    SanitizedMessage {
        id: text("id").unwrap_or_else(|| index.to_string()),
        role: text("role").unwrap_or_else(|| UNKNOWN_ROLE.to_string()),
        content: text("content").unwrap_or_else(|| MESSAGE_ERROR_CONTENT.to_string()),
        mode: None,
        model: None,
        attachment: None,
        note: Some(MESSAGE_ERROR_NOTE.to_string()),
    }
}

fn as_object(value: &Value) -> Result<&Map<String, Value>, SanitizeError> {
    value
        .as_object()
        .ok_or(SanitizeError::NotAnObject(type_name(value)))
}

fn optional_string(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, SanitizeError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(SanitizeError::WrongType {
            field,
            expected: "a string",
        }),
    }
}

fn passthrough_string(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Passthrough, SanitizeError> {
    match fields.get(field) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(_) => optional_string(fields, field).map(Some),
    }
}

fn string_or_default(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<String, SanitizeError> {
    Ok(optional_string(fields, field)?.unwrap_or_default())
}

fn number_or_zero(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Number, SanitizeError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(Number::from(0)),
        Some(Value::Number(number)) => Ok(number.clone()),
        Some(_) => Err(SanitizeError::WrongType {
            field,
            expected: "a number",
        }),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
