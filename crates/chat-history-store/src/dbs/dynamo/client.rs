use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use crate::dbs::dynamo::attribute::{item_to_json, json_to_attribute};
use crate::error::{Result, StoreError};
use crate::models::{ChatDocument, StoredChat, UserChatRecord};
use crate::trait_client::ChatStore;

const USER_ID_KEY: &str = "userId";
const CHATS_KEY: &str = "chats";

/// DynamoDB table holding one item per user, keyed by `userId`
#[derive(Clone)]
pub struct DynamoChatStore {
    client: Client,
    table_name: String,
}

impl DynamoChatStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Load AWS configuration from the environment and build a client
    ///
    /// `endpoint_url` points the client at DynamoDB Local or another
    /// compatible endpoint.
    pub async fn connect(
        table_name: impl Into<String>,
        region: Option<String>,
        endpoint_url: Option<String>,
    ) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
        if let Some(endpoint_url) = endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }
        let client = Client::from_conf(builder.build());

        Ok(Self::new(client, table_name))
    }
}

/// Build a record from a `GetItem` item, keeping each chat's attribute value
fn record_from_item(
    user_id: &str,
    item: &HashMap<String, AttributeValue>,
) -> Result<UserChatRecord> {
    let mut record = UserChatRecord::from_value(user_id, item_to_json(item))?;
    if let Some(AttributeValue::L(stored)) = item.get(CHATS_KEY) {
        record.chats = record
            .chats
            .into_iter()
            .zip(stored)
            .map(|(chat, attribute)| chat.with_stored(StoredChat::Dynamo(attribute.clone())))
            .collect();
    }
    Ok(record)
}

/// Attribute values for a rewrite; chats read from the table go back unchanged
fn chat_attributes(chats: &[ChatDocument]) -> Vec<AttributeValue> {
    chats
        .iter()
        .map(|chat| match chat.stored() {
            Some(StoredChat::Dynamo(attribute)) => attribute.clone(),
            _ => json_to_attribute(chat.as_value()),
        })
        .collect()
}

#[async_trait]
impl ChatStore for DynamoChatStore {
    async fn get_record(&self, user_id: &str) -> Result<Option<UserChatRecord>> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(USER_ID_KEY, AttributeValue::S(user_id.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::Dynamo(DisplayErrorContext(&e).to_string()))?;

        match response.item {
            Some(item) => Ok(Some(record_from_item(user_id, &item)?)),
            None => Ok(None),
        }
    }

    async fn replace_chats(
        &self,
        user_id: &str,
        chats: Vec<ChatDocument>,
        expected_len: usize,
    ) -> Result<()> {
        let chats = chat_attributes(&chats);

        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(USER_ID_KEY, AttributeValue::S(user_id.to_string()))
            .update_expression("SET chats = :chats")
            .condition_expression("size(chats) = :expected")
            .expression_attribute_values(":chats", AttributeValue::L(chats))
            .expression_attribute_values(
                ":expected",
                AttributeValue::N(expected_len.to_string()),
            )
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|service| service.is_conditional_check_failed_exception()) =>
            {
                Err(StoreError::Conflict(user_id.to_string()))
            }
            Err(e) => Err(StoreError::Dynamo(DisplayErrorContext(&e).to_string())),
        }
    }

    fn backend_name(&self) -> &'static str {
        "dynamodb"
    }
}
