use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: HashMap<String, String>,
}

/// Health check endpoint
///
/// Returns the health status of the API and its store
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let mut services = HashMap::new();

    // A point read of a key no user can have is the cheapest round trip
    let store_ok = match state.store.get_record("_health_check").await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            false
        }
    };
    services.insert(
        state.store.backend_name().to_string(),
        if store_ok { "connected" } else { "disconnected" }.to_string(),
    );

    let (status, label) = if store_ok {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            services,
        }),
    )
}
