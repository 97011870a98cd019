//! HTTP adapters: each request is rewritten into the gateway event shape and
//! handed to the same handlers a serverless runtime would call.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode},
};
use std::sync::Arc;

use crate::{
    event::InvocationEvent,
    handlers::chat_detail::CHAT_ID_PARAM,
    response::{CorsProfile, InvocationResponse},
    state::AppState,
};

/// List the caller's chats
pub async fn list_chats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> InvocationResponse {
    let user_id = verified_identity(&state, &headers);
    let event = InvocationEvent::http_api("GET", "/chats", &[], user_id);

    state.chat_list.handle(&event).await
}

/// Preflight for the chat list
pub async fn list_preflight() -> InvocationResponse {
    InvocationResponse::empty(StatusCode::OK, CorsProfile::List)
}

/// Read, delete or preflight one chat; other methods get a 405 from the handler
pub async fn chat_detail(
    State(state): State<Arc<AppState>>,
    method: Method,
    Path(chat_id): Path<String>,
    headers: HeaderMap,
) -> InvocationResponse {
    let user_id = verified_identity(&state, &headers);
    let raw_path = format!("/chats/{}", chat_id);
    let event = InvocationEvent::http_api(
        method.as_str(),
        &raw_path,
        &[(CHAT_ID_PARAM, chat_id.as_str())],
        user_id,
    );

    state.chat_detail.handle(&event).await
}

/// Subject placed on the request by the upstream authorizer
fn verified_identity<'a>(state: &AppState, headers: &'a HeaderMap) -> Option<&'a str> {
    headers
        .get(state.config.auth.identity_header.as_str())
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
