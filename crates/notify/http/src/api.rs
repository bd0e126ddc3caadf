//! Subscription and health endpoints.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use notify_storage::SubscriptionStore;

use crate::handlers::error_response;

/// Register admin push token request.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub token: String,
}

/// Register an admin browser's push token.
pub async fn subscribe_handler<S>(State(store): State<S>, body: Bytes) -> Response
where
    S: SubscriptionStore,
{
    let request: SubscribeRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, format!("invalid request: {}", e));
        }
    };

    let token = request.token.trim();
    if token.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "token is required");
    }

    match store.add_subscription(token).await {
        Ok(()) => {
            tracing::info!("admin push subscription registered");
            (
                StatusCode::OK,
                Json(serde_json::json!({ "message": "Subscribed" })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to store subscription");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e))
        }
    }
}

/// Liveness probe.
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
