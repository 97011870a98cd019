use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection};

use crate::dbs::mongo::models::{chats_to_bson, document_to_record};
use crate::error::{Result, StoreError};
use crate::models::{ChatDocument, UserChatRecord};
use crate::trait_client::ChatStore;

/// MongoDB collection holding one document per user, keyed by `userId`
#[derive(Clone)]
pub struct MongoChatStore {
    collection: Collection<Document>,
}

impl MongoChatStore {
    pub fn new(client: &Client, database: &str, collection: &str) -> Self {
        let collection = client.database(database).collection(collection);
        Self { collection }
    }

    /// Connect to MongoDB and create the store
    pub async fn connect(mongodb_uri: &str, database: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self::new(&client, database, collection))
    }
}

#[async_trait]
impl ChatStore for MongoChatStore {
    async fn get_record(&self, user_id: &str) -> Result<Option<UserChatRecord>> {
        let filter = doc! { "userId": user_id };
        let Some(document) = self.collection.find_one(filter).await? else {
            return Ok(None);
        };

        Ok(Some(document_to_record(user_id, document)?))
    }

    async fn replace_chats(
        &self,
        user_id: &str,
        chats: Vec<ChatDocument>,
        expected_len: usize,
    ) -> Result<()> {
        let expected = i64::try_from(expected_len).map_err(|_| {
            StoreError::Internal(format!("chat count {} out of range", expected_len))
        })?;
        let filter = doc! { "userId": user_id, "chats": { "$size": expected } };
        let update = doc! { "$set": { "chats": chats_to_bson(&chats)? } };

        let result = self.collection.update_one(filter, update).await?;
        if result.matched_count == 0 {
            return Err(StoreError::Conflict(user_id.to_string()));
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mongodb"
    }
}
