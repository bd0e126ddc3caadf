//! Process-wide FCM client.

use std::sync::Arc;

use notify_core::{MulticastReport, PushMessage};
use tokio::sync::OnceCell;

use crate::{FcmPusher, Pusher};

static SHARED: OnceCell<FcmPusher> = OnceCell::const_new();

/// Pusher that lazily builds one process-wide [`FcmPusher`] on first use.
///
/// Concurrent first sends converge on the same instance. A failed
/// initialization (missing or malformed credentials) is returned to the
/// caller and retried on the next send.
#[derive(Clone)]
pub struct SharedFcmPusher {
    client: reqwest::Client,
    service_account: Option<Arc<str>>,
}

impl SharedFcmPusher {
    pub fn new(client: reqwest::Client, service_account_json: Option<String>) -> Self {
        Self {
            client,
            service_account: service_account_json.map(Arc::from),
        }
    }

    async fn instance(&self) -> color_eyre::eyre::Result<&'static FcmPusher> {
        SHARED
            .get_or_try_init(|| async {
                let json = self.service_account.as_deref().ok_or_else(|| {
                    color_eyre::eyre::eyre!("FCM service account credentials are not configured")
                })?;

                let pusher = FcmPusher::from_service_account(self.client.clone(), json)?;
                tracing::info!(project_id = %pusher.project_id(), "initialized FCM client");

                Ok::<_, color_eyre::eyre::Report>(pusher)
            })
            .await
    }
}

impl Pusher for SharedFcmPusher {
    async fn send_multicast(
        &self,
        message: &PushMessage,
        tokens: &[String],
    ) -> color_eyre::eyre::Result<MulticastReport> {
        self.instance().await?.send_multicast(message, tokens).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_credentials_is_error() {
        let pusher = SharedFcmPusher::new(reqwest::Client::new(), None);
        let err = pusher
            .send_multicast(&PushMessage::new("t", "b"), &["tok".to_string()])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }

    #[tokio::test]
    async fn test_failed_initialization_is_retried() {
        let message = PushMessage::new("t", "b");
        let tokens = ["tok".to_string()];

        let malformed = SharedFcmPusher::new(reqwest::Client::new(), Some("not json".to_string()));
        let err = malformed.send_multicast(&message, &tokens).await.unwrap_err();
        assert!(format!("{:#}", err).contains("malformed service account credentials"));
        assert!(!SHARED.initialized());

        let missing = SharedFcmPusher::new(reqwest::Client::new(), None);
        let err = missing.send_multicast(&message, &tokens).await.unwrap_err();
        assert!(err.to_string().contains("not configured"));
        assert!(!SHARED.initialized());
    }
}
