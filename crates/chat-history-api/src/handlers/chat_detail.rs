use std::sync::Arc;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use chat_history_store::ChatStore;

use crate::error::{ApiError, ApiResult};
use crate::event::InvocationEvent;
use crate::response::{CorsProfile, InvocationResponse};
use crate::sanitize::{sanitize_messages, SanitizedMessage};

pub const CHAT_ID_PARAM: &str = "chatId";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteChatResponse {
    pub success: bool,
    pub message: String,
}

/// Reads or deletes one chat of the caller
#[derive(Clone)]
pub struct ChatDetailHandler {
    store: Arc<dyn ChatStore>,
}

impl ChatDetailHandler {
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self { store }
    }

    /// Handle one invocation; every error becomes a JSON error response
    pub async fn handle(&self, event: &InvocationEvent) -> InvocationResponse {
        tracing::debug!(event = %event.raw(), "Received chat detail event");

        match self.dispatch(event).await {
            Ok(response) => response,
            Err(e) => e.into_invocation_response(CorsProfile::Detail),
        }
    }

    async fn dispatch(&self, event: &InvocationEvent) -> ApiResult<InvocationResponse> {
        let method = event.http_method().ok_or_else(|| ApiError::MethodNotFound {
            event_keys: event.top_level_keys(),
            request_context_keys: event.request_context_keys(),
        })?;
        tracing::info!(method = %method, "Resolved HTTP method");

        // Preflight needs neither identity nor store access.
        if method == "OPTIONS" {
            return Ok(InvocationResponse::empty(StatusCode::OK, CorsProfile::Detail));
        }

        let user_id = event.user_id().ok_or(ApiError::AuthenticationFailed)?;

        match method.as_str() {
            "GET" => {
                let chat_id = chat_id(event)?;
                let messages = self.get_messages(user_id, chat_id).await?;
                Ok(InvocationResponse::json(StatusCode::OK, CorsProfile::Detail, &messages)?)
            }
            "DELETE" => {
                let chat_id = chat_id(event)?;
                self.delete_chat(user_id, chat_id).await?;
                let body = DeleteChatResponse {
                    success: true,
                    message: "Chat deleted successfully".to_string(),
                };
                Ok(InvocationResponse::json(StatusCode::OK, CorsProfile::Detail, &body)?)
            }
            _ => Err(ApiError::MethodNotAllowed(method)),
        }
    }

    /// Sanitized messages of one chat, in stored order
    ///
    /// A missing user record is reported the same way as a missing chat.
    pub async fn get_messages(
        &self,
        user_id: &str,
        chat_id: &str,
    ) -> ApiResult<Vec<SanitizedMessage>> {
        let record = self
            .store
            .get_record(user_id)
            .await?
            .ok_or_else(|| ApiError::ChatNotFound(chat_id.to_string()))?;

        let chat = record
            .find_chat(chat_id)
            .ok_or_else(|| ApiError::ChatNotFound(chat_id.to_string()))?;

        let messages = sanitize_messages(chat.messages().unwrap_or_default());
        tracing::info!(chat_id = %chat_id, messages = messages.len(), "Loaded chat messages");
        Ok(messages)
    }

    /// Remove one chat from the user's record; returns the remaining chat count
    pub async fn delete_chat(&self, user_id: &str, chat_id: &str) -> ApiResult<usize> {
        let record = self
            .store
            .get_record(user_id)
            .await?
            .ok_or_else(|| ApiError::ChatAlreadyDeleted(chat_id.to_string()))?;

        let original_len = record.chats.len();
        let remaining = record.without_chat(chat_id);
        if remaining.len() == original_len {
            return Err(ApiError::ChatAlreadyDeleted(chat_id.to_string()));
        }

        let remaining_len = remaining.len();
        self.store
            .replace_chats(user_id, remaining, original_len)
            .await?;

        tracing::info!(chat_id = %chat_id, remaining = remaining_len, "Deleted chat");
        Ok(remaining_len)
    }
}

fn chat_id(event: &InvocationEvent) -> ApiResult<&str> {
    event.path_parameter(CHAT_ID_PARAM).ok_or(ApiError::MissingChatId)
}
