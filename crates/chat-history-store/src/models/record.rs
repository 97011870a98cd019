use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, StoreError};

/// One stored record per user: the user's whole chat list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserChatRecord {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub chats: Vec<ChatDocument>,
}

impl UserChatRecord {
    pub fn new(user_id: impl Into<String>, chats: Vec<ChatDocument>) -> Self {
        Self {
            user_id: user_id.into(),
            chats,
        }
    }

    /// Build a record from a normalized store item.
    ///
    /// A missing `chats` attribute means the user has no chats yet.
    pub fn from_value(user_id: impl Into<String>, value: Value) -> Result<Self> {
        let user_id = user_id.into();
        let mut item = match value {
            Value::Object(map) => map,
            other => {
                return Err(StoreError::InvalidRecord {
                    user_id,
                    reason: format!("expected an object, got {}", type_name(&other)),
                })
            }
        };

        let chats = match item.remove("chats") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(entries)) => entries.into_iter().map(ChatDocument::from).collect(),
            Some(other) => {
                return Err(StoreError::InvalidRecord {
                    user_id,
                    reason: format!("`chats` must be a list, got {}", type_name(&other)),
                })
            }
        };

        Ok(Self { user_id, chats })
    }

    /// First chat whose `id` equals `chat_id`.
    pub fn find_chat(&self, chat_id: &str) -> Option<&ChatDocument> {
        self.chats.iter().find(|chat| chat.id() == Some(chat_id))
    }

    /// The chat list with every chat matching `chat_id` removed.
    pub fn without_chat(&self, chat_id: &str) -> Vec<ChatDocument> {
        self.chats
            .iter()
            .filter(|chat| chat.id() != Some(chat_id))
            .cloned()
            .collect()
    }
}

/// A chat exactly as stored.
///
/// Chats are written by another service, so the entry is kept as loose JSON and
/// only the fields this crate understands are read through accessors. Chats
/// loaded from a database also carry their native encoding, which is what gets
/// written back when the chat list is rewritten; unknown fields and attribute
/// types therefore survive a delete untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatDocument {
    value: Value,
    #[serde(skip)]
    stored: Option<StoredChat>,
}

/// Backend-native encoding of one chat, as read from the database
#[derive(Debug, Clone, PartialEq)]
pub enum StoredChat {
    #[cfg(feature = "dynamodb")]
    Dynamo(aws_sdk_dynamodb::types::AttributeValue),
    #[cfg(feature = "mongodb")]
    Mongo(mongodb::bson::Bson),
}

impl ChatDocument {
    pub fn new(id: impl Into<String>, title: impl Into<String>, messages: Vec<Value>) -> Self {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::String(id.into()));
        map.insert("title".to_string(), Value::String(title.into()));
        map.insert("messages".to_string(), Value::Array(messages));
        Self::from(Value::Object(map))
    }

    /// Attach the encoding this chat was read with
    pub fn with_stored(mut self, stored: StoredChat) -> Self {
        self.stored = Some(stored);
        self
    }

    pub fn stored(&self) -> Option<&StoredChat> {
        self.stored.as_ref()
    }

    pub fn id(&self) -> Option<&str> {
        self.value.get("id").and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.value.get("title").and_then(Value::as_str)
    }

    pub fn messages(&self) -> Option<&[Value]> {
        self.value
            .get("messages")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }
}

// Two chats are equal when their content is; the native encoding is a cache.
impl PartialEq for ChatDocument {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl From<Value> for ChatDocument {
    fn from(value: Value) -> Self {
        Self {
            value,
            stored: None,
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_without_chats_is_empty() {
        let record = UserChatRecord::from_value("u1", json!({ "userId": "u1" })).unwrap();
        assert!(record.chats.is_empty());
    }

    #[test]
    fn test_from_value_rejects_non_list_chats() {
        let err = UserChatRecord::from_value("u1", json!({ "chats": "nope" })).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord { .. }));
    }

    #[test]
    fn test_accessors_tolerate_non_object_entries() {
        let record = UserChatRecord::from_value(
            "u1",
            json!({ "chats": [42, { "id": "c1", "title": "T1", "messages": [] }] }),
        )
        .unwrap();

        assert_eq!(record.chats[0].id(), None);
        assert_eq!(record.chats[0].messages(), None);
        assert_eq!(record.find_chat("c1").and_then(ChatDocument::title), Some("T1"));
    }

    #[test]
    fn test_without_chat_keeps_unknown_fields() {
        let record = UserChatRecord::from_value(
            "u1",
            json!({ "chats": [
                { "id": "c1", "title": "T1", "createdAt": "2024-01-01" },
                { "id": "c2", "title": "T2", "createdAt": "2024-01-02" }
            ] }),
        )
        .unwrap();

        let remaining = record.without_chat("c1");
        assert_eq!(remaining.len(), 1);
        assert_eq!(
            remaining[0].as_value(),
            &json!({ "id": "c2", "title": "T2", "createdAt": "2024-01-02" })
        );
    }
}
