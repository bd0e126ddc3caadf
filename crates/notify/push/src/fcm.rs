//! FCM push implementation over the HTTP v1 API.

use std::collections::BTreeMap;
use std::sync::Arc;

use color_eyre::eyre::WrapErr as _;
use futures::StreamExt as _;
use google_cloud_auth::credentials::{
    CacheableResource, Credentials, service_account::Builder as CredentialsBuilder,
};
use http::{Extensions, HeaderMap};
use notify_core::{MulticastReport, PushMessage, PushResult};
use serde::{Deserialize, Serialize};

use crate::Pusher;

/// Production FCM endpoint.
pub const FCM_BASE_URL: &str = "https://fcm.googleapis.com";

/// Upper bound on in-flight per-token requests of one multicast.
const MAX_CONCURRENT_SENDS: usize = 32;

#[derive(Clone)]
enum Auth {
    ServiceAccount(Arc<Credentials>),
    AccessToken(String),
}

/// FCM pusher authenticated with a Firebase service account.
#[derive(Clone)]
pub struct FcmPusher {
    client: reqwest::Client,
    auth: Auth,
    project_id: String,
    base_url: String,
}

impl FcmPusher {
    /// Create a pusher from a service-account JSON document.
    pub fn from_service_account(
        client: reqwest::Client,
        service_account_json: &str,
    ) -> color_eyre::eyre::Result<Self> {
        let json: serde_json::Value = serde_json::from_str(service_account_json)
            .wrap_err("malformed service account credentials")?;

        let project_id = json
            .get("project_id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| color_eyre::eyre::eyre!("service account is missing project_id"))?
            .to_string();

        let credentials = CredentialsBuilder::new(json)
            .build()
            .map_err(|e| color_eyre::eyre::eyre!("failed to build FCM credentials: {}", e))?;

        Ok(Self {
            client,
            auth: Auth::ServiceAccount(Arc::new(credentials)),
            project_id,
            base_url: FCM_BASE_URL.to_string(),
        })
    }

    /// Create a pusher from an already minted OAuth access token.
    pub fn with_access_token(
        client: reqwest::Client,
        project_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth: Auth::AccessToken(access_token.into()),
            project_id: project_id.into(),
            base_url: FCM_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn send_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/messages:send",
            self.base_url, self.project_id
        )
    }

    async fn auth_headers(&self) -> color_eyre::eyre::Result<HeaderMap> {
        match &self.auth {
            Auth::ServiceAccount(credentials) => {
                let headers = credentials
                    .headers(Extensions::new())
                    .await
                    .map_err(|e| color_eyre::eyre::eyre!("failed to obtain FCM access token: {}", e))?;

                // No entity tag is sent, so the provider always returns fresh headers.
                match headers {
                    CacheableResource::New { data, .. } => Ok(data),
                    CacheableResource::NotModified => {
                        color_eyre::eyre::bail!("FCM credentials returned no authorization headers")
                    }
                }
            }
            Auth::AccessToken(token) => {
                let mut headers = HeaderMap::new();
                let value = format!("Bearer {}", token)
                    .parse::<http::HeaderValue>()
                    .wrap_err("invalid FCM access token")?;
                headers.insert(http::header::AUTHORIZATION, value);
                Ok(headers)
            }
        }
    }

    async fn send_single(
        &self,
        url: &str,
        headers: &HeaderMap,
        message: &PushMessage,
        token: &str,
    ) -> PushResult {
        let request = SendRequest {
            message: FcmMessage::new(message, token),
        };

        let response = match self
            .client
            .post(url)
            .headers(headers.clone())
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return PushResult::failure(token, e),
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            let name = serde_json::from_str::<SendResponse>(&body)
                .map(|r| r.name)
                .unwrap_or_default();
            PushResult::success(token, name)
        } else {
            tracing::debug!(status = %status, body = %body, "FCM rejected token");
            PushResult::failure(token, error_code(status, &body))
        }
    }
}

impl Pusher for FcmPusher {
    async fn send_multicast(
        &self,
        message: &PushMessage,
        tokens: &[String],
    ) -> color_eyre::eyre::Result<MulticastReport> {
        let headers = self.auth_headers().await?;
        let url = self.send_url();

        let sends: Vec<_> = tokens
            .iter()
            .map(|token| self.send_single(&url, &headers, message, token))
            .collect();

        let responses: Vec<PushResult> = futures::stream::iter(sends)
            .buffered(MAX_CONCURRENT_SENDS)
            .collect()
            .await;

        let report = MulticastReport::new(responses);

        tracing::info!(
            project_id = %self.project_id,
            success = report.success_count(),
            failure = report.failure_count(),
            "FCM multicast sent"
        );

        Ok(report)
    }
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    message: FcmMessage<'a>,
}

#[derive(Debug, Serialize)]
struct FcmMessage<'a> {
    token: &'a str,
    notification: FcmNotification<'a>,
    #[serde(skip_serializing_if = "is_empty_map")]
    data: &'a BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    webpush: Option<WebpushConfig<'a>>,
}

impl<'a> FcmMessage<'a> {
    fn new(message: &'a PushMessage, token: &'a str) -> Self {
        Self {
            token,
            notification: FcmNotification {
                title: &message.title,
                body: &message.body,
            },
            data: &message.data,
            webpush: message.link.as_deref().map(|link| WebpushConfig {
                fcm_options: WebpushFcmOptions { link },
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct WebpushConfig<'a> {
    fcm_options: WebpushFcmOptions<'a>,
}

#[derive(Debug, Serialize)]
struct WebpushFcmOptions<'a> {
    link: &'a str,
}

fn is_empty_map(map: &&BTreeMap<String, String>) -> bool {
    map.is_empty()
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "errorCode", default)]
    error_code: Option<String>,
}

/// Most specific error code in an FCM error body, e.g. `UNREGISTERED`.
fn error_code(status: reqwest::StatusCode, body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) else {
        return format!("HTTP {}", status.as_u16());
    };

    parsed
        .error
        .details
        .into_iter()
        .find_map(|d| d.error_code)
        .or(parsed.error.status)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
