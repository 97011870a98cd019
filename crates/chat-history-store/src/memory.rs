use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::models::{ChatDocument, UserChatRecord};
use crate::numeric;
use crate::trait_client::ChatStore;

/// Process-local store keyed by user ID
///
/// Backs local runs (optionally seeded from a JSON file) and the handler tests.
#[derive(Default)]
pub struct InMemoryChatStore {
    records: RwLock<HashMap<String, UserChatRecord>>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = UserChatRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.user_id.clone(), record))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Load records from a JSON array of `{"userId": ..., "chats": [...]}` items
    pub async fn from_seed_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let items: Vec<Value> = serde_json::from_str(&raw)?;

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            let user_id = item
                .get("userId")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    StoreError::Config(format!("seed item in {} has no userId", path.display()))
                })?
                .to_string();
            records.push(UserChatRecord::from_value(user_id, numeric::normalize(item))?);
        }

        tracing::info!(
            records = records.len(),
            path = %path.display(),
            "Seeded in-memory store"
        );
        Ok(Self::with_records(records))
    }
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    async fn get_record(&self, user_id: &str) -> Result<Option<UserChatRecord>> {
        Ok(self.records.read().await.get(user_id).cloned())
    }

    async fn replace_chats(
        &self,
        user_id: &str,
        chats: Vec<ChatDocument>,
        expected_len: usize,
    ) -> Result<()> {
        let mut records = self.records.write().await;
        match records.get_mut(user_id) {
            Some(record) if record.chats.len() == expected_len => {
                record.chats = chats;
                Ok(())
            }
            _ => Err(StoreError::Conflict(user_id.to_string())),
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
