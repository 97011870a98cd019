pub mod chats;
pub mod health;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::middleware::logging;
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    let api_routes = Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Chats
        .route("/chats", get(chats::list_chats).options(chats::list_preflight))
        .route("/chats/:chat_id", any(chats::chat_detail));

    api_routes
        .layer(axum::middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
