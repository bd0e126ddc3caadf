//! Admin new-order push notifications.

use color_eyre::eyre::WrapErr as _;
use notify_core::{WebhookEnvelope, dedupe_tokens};
use notify_push::Pusher;
use notify_storage::{SettingsStore, SubscriptionStore};

use crate::{AdminNotify, AdminOutcome, templates};

/// Pushes new orders to every subscribed admin browser.
#[derive(Clone)]
pub struct AdminNotifier<S, P> {
    store: S,
    pusher: P,
}

impl<S, P> AdminNotifier<S, P> {
    /// Create a new admin notifier.
    pub fn new(store: S, pusher: P) -> Self {
        Self { store, pusher }
    }
}

impl<S, P> AdminNotifier<S, P>
where
    S: SettingsStore,
{
    /// Whether push was switched off. Read failures fail open.
    async fn push_disabled(&self) -> bool {
        match self.store.load_settings().await {
            Ok(Some(settings)) => settings.push_disabled(),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load settings, assuming push enabled");
                false
            }
        }
    }
}

impl<S, P> AdminNotify for AdminNotifier<S, P>
where
    S: SettingsStore + SubscriptionStore,
    P: Pusher,
{
    async fn notify_new_order(&self, payload: &[u8]) -> color_eyre::eyre::Result<AdminOutcome> {
        if self.push_disabled().await {
            tracing::info!("push notifications disabled");
            return Ok(AdminOutcome::PushDisabled);
        }

        let envelope: WebhookEnvelope =
            serde_json::from_slice(payload).wrap_err("failed to parse webhook payload")?;
        let record = envelope.require_record()?;

        let stored = self
            .store
            .subscription_tokens()
            .await
            .wrap_err("failed to load subscriptions")?;

        if stored.is_empty() {
            tracing::info!(order_id = %record.id, "no admin subscribers");
            return Ok(AdminOutcome::NoSubscribers);
        }

        let tokens = dedupe_tokens(stored);
        if tokens.is_empty() {
            tracing::info!(order_id = %record.id, "no valid admin tokens");
            return Ok(AdminOutcome::NoValidTokens);
        }

        tracing::info!(
            order_id = %record.id,
            tokens = tokens.len(),
            "sending new order push"
        );

        let message = templates::new_order_push(record);
        let report = self
            .pusher
            .send_multicast(&message, &tokens)
            .await
            .wrap_err("failed to send push notifications")?;

        let success = report.success_count();
        let failure = report.failure_count();

        let mut pruned = 0;
        if failure > 0 {
            let failed = report.failed_tokens(&tokens);

            // A failed prune only leaves stale rows for the next event.
            match self.store.delete_subscriptions(&failed).await {
                Ok(count) => {
                    tracing::info!(count, "pruned failed subscription tokens");
                    pruned = count;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to prune subscription tokens");
                }
            }
        }

        Ok(AdminOutcome::Sent {
            success,
            failure,
            pruned,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryStore, RecordingPusher};
    use notify_core::{OrderRecord, Settings};

    fn payload() -> Vec<u8> {
        serde_json::to_vec(&WebhookEnvelope::insert(OrderRecord::new("ORD123", 499))).unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_token_sent_once() {
        let store = MemoryStore::new().with_tokens(["tok-A", "tok-A"]);
        let pusher = RecordingPusher::new();
        let notifier = AdminNotifier::new(store.clone(), pusher.clone());

        let outcome = notifier.notify_new_order(&payload()).await.unwrap();

        assert_eq!(
            outcome,
            AdminOutcome::Sent {
                success: 1,
                failure: 0,
                pruned: 0
            }
        );
        assert_eq!(outcome.message(), "Notifications sent");

        let calls = pusher.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, vec!["tok-A"]);
        assert!(calls[0].0.body.contains("ORD123"));
        assert!(store.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_push_disabled_skips_provider() {
        let store = MemoryStore::new()
            .with_settings(Settings {
                push_enabled: Some(false),
                ..Default::default()
            })
            .with_tokens(["tok-A"]);
        let pusher = RecordingPusher::new();
        let notifier = AdminNotifier::new(store, pusher.clone());

        let outcome = notifier.notify_new_order(&payload()).await.unwrap();

        assert_eq!(outcome, AdminOutcome::PushDisabled);
        assert_eq!(outcome.message(), "Push notifications disabled");
        assert!(pusher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_settings_failure_fails_open() {
        let store = MemoryStore::new().failing_settings().with_tokens(["tok-A"]);
        let pusher = RecordingPusher::new();
        let notifier = AdminNotifier::new(store, pusher.clone());

        let outcome = notifier.notify_new_order(&payload()).await.unwrap();

        assert!(matches!(outcome, AdminOutcome::Sent { success: 1, .. }));
        assert_eq!(pusher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_no_subscribers() {
        let pusher = RecordingPusher::new();
        let notifier = AdminNotifier::new(MemoryStore::new(), pusher.clone());

        let outcome = notifier.notify_new_order(&payload()).await.unwrap();

        assert_eq!(outcome, AdminOutcome::NoSubscribers);
        assert_eq!(outcome.message(), "No subscribers");
        assert!(pusher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_only_blank_tokens() {
        let pusher = RecordingPusher::new();
        let notifier = AdminNotifier::new(MemoryStore::new().with_tokens(["", " "]), pusher.clone());

        let outcome = notifier.notify_new_order(&payload()).await.unwrap();

        assert_eq!(outcome, AdminOutcome::NoValidTokens);
        assert!(pusher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_record_is_error() {
        let notifier = AdminNotifier::new(
            MemoryStore::new().with_tokens(["tok-A"]),
            RecordingPusher::new(),
        );

        let result = notifier.notify_new_order(br#"{"type": "INSERT"}"#).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_push_disabled_ignores_body() {
        let store = MemoryStore::new().with_settings(Settings {
            push_enabled: Some(false),
            ..Default::default()
        });
        let notifier = AdminNotifier::new(store, RecordingPusher::new());

        let outcome = notifier.notify_new_order(b"{not json").await.unwrap();
        assert_eq!(outcome, AdminOutcome::PushDisabled);
    }

    #[tokio::test]
    async fn test_malformed_body_is_error() {
        let pusher = RecordingPusher::new();
        let notifier = AdminNotifier::new(MemoryStore::new().with_tokens(["tok-A"]), pusher.clone());

        let err = notifier.notify_new_order(b"{not json").await.unwrap_err();
        assert!(err.to_string().contains("failed to parse webhook payload"));
        assert!(pusher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_prunes_exactly_failed_tokens() {
        let store = MemoryStore::new().with_tokens(["tok-A", "tok-B", "tok-C", "tok-B", "tok-D"]);
        let pusher = RecordingPusher::new().rejecting(["tok-B", "tok-D"]);
        let notifier = AdminNotifier::new(store.clone(), pusher.clone());

        let outcome = notifier.notify_new_order(&payload()).await.unwrap();

        assert_eq!(pusher.calls()[0].1, vec!["tok-A", "tok-B", "tok-C", "tok-D"]);
        assert_eq!(store.deleted(), vec!["tok-B", "tok-D"]);
        assert_eq!(store.tokens(), vec!["tok-A", "tok-C"]);
        assert_eq!(
            outcome,
            AdminOutcome::Sent {
                success: 2,
                failure: 2,
                pruned: 3
            }
        );
    }

    #[tokio::test]
    async fn test_provider_error_is_error() {
        let notifier = AdminNotifier::new(
            MemoryStore::new().with_tokens(["tok-A"]),
            RecordingPusher::new().failing("invalid service account"),
        );

        assert!(notifier.notify_new_order(&payload()).await.is_err());
    }
}
