use axum::http::StatusCode;
use serde_json::json;
use thiserror::Error;

use chat_history_store::StoreError;

use crate::response::{CorsProfile, InvocationResponse};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP method not found in request")]
    MethodNotFound {
        event_keys: Vec<String>,
        request_context_keys: Option<Vec<String>>,
    },

    #[error("Chat ID not found in path parameters")]
    MissingChatId,

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Chat not found")]
    ChatNotFound(String),

    #[error("Chat not found or already deleted")]
    ChatAlreadyDeleted(String),

    #[error("Method {0} not allowed")]
    MethodNotAllowed(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotFound { .. } | ApiError::MissingChatId => StatusCode::BAD_REQUEST,
            ApiError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            ApiError::ChatNotFound(_) | ApiError::ChatAlreadyDeleted(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Store(_) | ApiError::Serialization(_) | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Convert into the JSON error response; internal details are only logged
    pub fn into_invocation_response(self, cors: CorsProfile) -> InvocationResponse {
        let status = self.status();
        let body = match self {
            ApiError::MethodNotFound {
                ref event_keys,
                ref request_context_keys,
            } => {
                tracing::error!("Could not resolve the HTTP method from the event");
                json!({
                    "error": self.to_string(),
                    "debug": {
                        "eventKeys": event_keys,
                        "requestContextKeys": request_context_keys,
                    }
                })
            }
            ApiError::ChatNotFound(ref chat_id) | ApiError::ChatAlreadyDeleted(ref chat_id) => {
                tracing::warn!(chat_id = %chat_id, "{}", self);
                json!({ "error": self.to_string() })
            }
            ApiError::MissingChatId
            | ApiError::AuthenticationFailed
            | ApiError::MethodNotAllowed(_) => {
                tracing::warn!("{}", self);
                json!({ "error": self.to_string() })
            }
            ApiError::Store(ref e) => {
                tracing::error!("Store error: {}", e);
                json!({ "error": "Internal server error" })
            }
            ApiError::Serialization(ref e) => {
                tracing::error!("Serialization error: {}", e);
                json!({ "error": "Internal server error" })
            }
            ApiError::Internal => {
                tracing::error!("Internal error: {}", self);
                json!({ "error": "Internal server error" })
            }
        };

        InvocationResponse::json(status, cors, &body)
            .unwrap_or_else(|_| InvocationResponse::internal_error(cors))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
