use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use storebot_core::config::AppConfig;

/// Collaborator facts worth reporting without making network calls:
/// lookups are request-scoped, so readiness here means "configured".
#[derive(Clone)]
pub struct HealthState {
    llm_model: String,
    shopify_store: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub chat_backend: HealthCheck,
    pub order_api: HealthCheck,
    pub checked_at: String,
}

pub fn router(config: &AppConfig) -> Router {
    let state = HealthState {
        llm_model: config.llm.model.clone(),
        shopify_store: config.shopify.normalized_store_name(),
    };
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let payload = HealthResponse {
        status: "ready",
        service: HealthCheck {
            status: "ready",
            detail: "storebot-server runtime initialized".to_string(),
        },
        chat_backend: HealthCheck {
            status: "ready",
            detail: format!("chat completions configured for model {}", state.llm_model),
        },
        order_api: HealthCheck {
            status: "ready",
            detail: format!("order lookups configured for store {}", state.shopify_store),
        },
        checked_at: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(payload))
}
