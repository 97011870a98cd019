use mongodb::bson::{self, Bson, Document};
use serde_json::Value;

use crate::error::Result;
use crate::models::{ChatDocument, StoredChat, UserChatRecord};
use crate::numeric;

const CHATS_KEY: &str = "chats";

// Conversions between MongoDB documents and the store's JSON model

/// Convert a stored document into normalized JSON
///
/// Relaxed extended JSON keeps plain numbers as numbers and wraps `Decimal128`
/// as `{"$numberDecimal": "..."}`, which `numeric::normalize` unwraps.
pub fn document_to_json(document: Document) -> Value {
    numeric::normalize(Bson::Document(document).into_relaxed_extjson())
}

/// Build a record from a stored document, keeping each chat's BSON value
pub fn document_to_record(user_id: &str, document: Document) -> Result<UserChatRecord> {
    let stored = document.get_array(CHATS_KEY).ok().cloned();
    let mut record = UserChatRecord::from_value(user_id, document_to_json(document))?;
    if let Some(stored) = stored {
        record.chats = record
            .chats
            .into_iter()
            .zip(stored)
            .map(|(chat, value)| chat.with_stored(StoredChat::Mongo(value)))
            .collect();
    }
    Ok(record)
}

/// Convert a chat list into the BSON array written by `$set`
///
/// Chats read from the collection are written back as they were stored.
pub fn chats_to_bson(chats: &[ChatDocument]) -> Result<Bson> {
    let items = chats
        .iter()
        .map(|chat| match chat.stored() {
            Some(StoredChat::Mongo(value)) => Ok(value.clone()),
            _ => Ok(bson::to_bson(chat.as_value())?),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Bson::Array(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use serde_json::json;

    #[test]
    fn test_document_to_json_normalizes_whole_doubles() {
        let document = doc! {
            "userId": "u1",
            "chats": [{ "id": "c1", "messages": [{ "attachment": { "size": 10.0_f64 } }] }]
        };

        let value = document_to_json(document);
        assert_eq!(value["chats"][0]["messages"][0]["attachment"]["size"], json!(10));
    }

    #[test]
    fn test_delete_rewrite_keeps_native_bson_types() {
        let thumb = bson::Binary {
            subtype: bson::spec::BinarySubtype::Generic,
            bytes: b"hi".to_vec(),
        };
        let created_at = bson::DateTime::from_millis(1_714_557_600_000);
        let kept = doc! {
            "id": "c2",
            "createdAt": created_at,
            "thumb": thumb,
            "total": 7_i64,
        };
        let document = doc! {
            "userId": "u1",
            "chats": [{ "id": "c1" }, kept.clone()],
        };

        let record = document_to_record("u1", document).unwrap();
        let remaining = record.without_chat("c1");

        assert_eq!(
            chats_to_bson(&remaining).unwrap(),
            Bson::Array(vec![Bson::Document(kept)])
        );
    }

    #[test]
    fn test_chats_to_bson_keeps_structure() {
        let chats = vec![ChatDocument::from(json!({ "id": "c1", "title": "T1", "extra": 3 }))];

        let Bson::Array(items) = chats_to_bson(&chats).unwrap() else {
            panic!("expected an array");
        };
        let Bson::Document(chat) = &items[0] else {
            panic!("expected a document");
        };
        assert_eq!(chat.get_str("id").unwrap(), "c1");
        assert_eq!(chat.get_str("title").unwrap(), "T1");
    }
}
