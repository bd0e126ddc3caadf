//! Notification webhook handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre::WrapErr as _;
use serde::{Deserialize, Serialize};

use notify_core::StatusUpdate;
use notify_service::{AdminNotify, AdminOutcome, CustomerNotify};

/// Notification summary.
#[derive(Debug, Serialize, Deserialize)]
pub struct NotifyResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<usize>,
}

impl NotifyResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: None,
            failure: None,
        }
    }
}

impl From<&AdminOutcome> for NotifyResponse {
    fn from(outcome: &AdminOutcome) -> Self {
        match outcome {
            AdminOutcome::Sent {
                success, failure, ..
            } => Self {
                message: outcome.message().to_string(),
                success: Some(*success),
                failure: Some(*failure),
            },
            _ => Self::new(outcome.message()),
        }
    }
}

/// Error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

/// Handle the new-order database webhook.
pub async fn admin_notify_handler<A>(State(service): State<A>, body: Bytes) -> Response
where
    A: AdminNotify,
{
    match service.notify_new_order(&body).await {
        Ok(outcome) => (StatusCode::OK, Json(NotifyResponse::from(&outcome))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "admin notify handler error");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e))
        }
    }
}

/// Handle an order status change.
pub async fn customer_notify_handler<C>(State(service): State<C>, body: Bytes) -> Response
where
    C: CustomerNotify,
{
    match customer_notify_inner(&service, &body).await {
        Ok(message) => (StatusCode::OK, Json(NotifyResponse::new(message))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "customer notify handler error");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e))
        }
    }
}

async fn customer_notify_inner<C: CustomerNotify>(
    service: &C,
    body: &[u8],
) -> color_eyre::eyre::Result<&'static str> {
    let update: StatusUpdate =
        serde_json::from_slice(body).wrap_err("failed to parse status update")?;

    let outcome = service.notify_status_change(&update).await?;

    Ok(outcome.message())
}
