use std::sync::Arc;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use chat_history_store::{ChatStore, UserChatRecord};

use crate::error::{ApiError, ApiResult};
use crate::event::InvocationEvent;
use crate::response::{CorsProfile, InvocationResponse};

/// Sidebar entry for one chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatListItem {
    pub id: Option<String>,
    pub title: Option<String>,
}

/// Lists the caller's chats as `{id, title}` pairs in stored order
#[derive(Clone)]
pub struct ChatListHandler {
    store: Arc<dyn ChatStore>,
}

impl ChatListHandler {
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self { store }
    }

    /// Handle one invocation
    ///
    /// Every failure, including a missing identity claim, becomes a generic
    /// 500 with the minimal header set.
    pub async fn handle(&self, event: &InvocationEvent) -> InvocationResponse {
        match self.list(event).await {
            Ok(items) => InvocationResponse::json(StatusCode::OK, CorsProfile::List, &items)
                .unwrap_or_else(|e| {
                    ApiError::from(e).into_invocation_response(CorsProfile::Minimal)
                }),
            Err(e) => {
                tracing::error!("Chat list failed: {}", e);
                ApiError::Internal.into_invocation_response(CorsProfile::Minimal)
            }
        }
    }

    pub async fn list(&self, event: &InvocationEvent) -> ApiResult<Vec<ChatListItem>> {
        let user_id = event.user_id().ok_or(ApiError::AuthenticationFailed)?;

        let items = self
            .store
            .get_record(user_id)
            .await?
            .map(|record| summarize(&record))
            .unwrap_or_default();

        tracing::info!(user_id = %user_id, chats = items.len(), "Listed chats");
        Ok(items)
    }
}

fn summarize(record: &UserChatRecord) -> Vec<ChatListItem> {
    record
        .chats
        .iter()
        .map(|chat| ChatListItem {
            id: chat.id().map(str::to_string),
            title: chat.title().map(str::to_string),
        })
        .collect()
}
