//! In-memory collaborators for tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use notify_channels::{Delivery, Email, Mailer, Messenger, TemplateMessage};
use notify_core::{MulticastReport, PushMessage, PushResult, Settings};
use notify_push::Pusher;
use notify_storage::{SettingsStore, SubscriptionStore};

/// In-memory settings and subscription store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    settings: Arc<Mutex<Option<Settings>>>,
    tokens: Arc<Mutex<Vec<String>>>,
    deleted: Arc<Mutex<Vec<String>>>,
    fail_settings: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(self, settings: Settings) -> Self {
        *self.settings.lock().unwrap() = Some(settings);
        self
    }

    pub fn with_tokens<I, T>(self, tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tokens
            .lock()
            .unwrap()
            .extend(tokens.into_iter().map(Into::into));
        self
    }

    /// Make every settings read fail.
    pub fn failing_settings(mut self) -> Self {
        self.fail_settings = true;
        self
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }

    /// Tokens passed to deletions, in call order.
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

impl SettingsStore for MemoryStore {
    async fn load_settings(&self) -> color_eyre::eyre::Result<Option<Settings>> {
        if self.fail_settings {
            color_eyre::eyre::bail!("settings table unavailable");
        }
        Ok(self.settings.lock().unwrap().clone())
    }
}

impl SubscriptionStore for MemoryStore {
    async fn subscription_tokens(&self) -> color_eyre::eyre::Result<Vec<String>> {
        Ok(self.tokens())
    }

    async fn add_subscription(&self, token: &str) -> color_eyre::eyre::Result<()> {
        let mut tokens = self.tokens.lock().unwrap();
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
        Ok(())
    }

    async fn delete_subscriptions(&self, tokens: &[&str]) -> color_eyre::eyre::Result<usize> {
        self.deleted
            .lock()
            .unwrap()
            .extend(tokens.iter().map(|t| t.to_string()));

        let mut stored = self.tokens.lock().unwrap();
        let before = stored.len();
        stored.retain(|t| !tokens.contains(&t.as_str()));
        Ok(before - stored.len())
    }
}

/// Pusher that records multicasts and fails a configured set of tokens.
#[derive(Clone, Default)]
pub struct RecordingPusher {
    calls: Arc<Mutex<Vec<(PushMessage, Vec<String>)>>>,
    rejected: Arc<HashSet<String>>,
    error: Option<String>,
}

impl RecordingPusher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report these tokens as failed.
    pub fn rejecting<I, T>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.rejected = Arc::new(tokens.into_iter().map(Into::into).collect());
        self
    }

    /// Fail every multicast outright.
    pub fn failing(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn calls(&self) -> Vec<(PushMessage, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Pusher for RecordingPusher {
    async fn send_multicast(
        &self,
        message: &PushMessage,
        tokens: &[String],
    ) -> color_eyre::eyre::Result<MulticastReport> {
        if let Some(error) = &self.error {
            color_eyre::eyre::bail!("{}", error);
        }

        self.calls
            .lock()
            .unwrap()
            .push((message.clone(), tokens.to_vec()));

        let responses = tokens
            .iter()
            .enumerate()
            .map(|(i, token)| {
                if self.rejected.contains(token) {
                    PushResult::failure(token.as_str(), "UNREGISTERED")
                } else {
                    PushResult::success(token.as_str(), format!("messages/{}", i))
                }
            })
            .collect();

        Ok(MulticastReport::new(responses))
    }
}

/// Mailer that records sent emails.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<Email>>>,
    error: Option<String>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every send with a transport error.
    pub fn failing(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for RecordingMailer {
    async fn send_email(&self, email: &Email) -> color_eyre::eyre::Result<Delivery> {
        if let Some(error) = &self.error {
            color_eyre::eyre::bail!("{}", error);
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(Delivery::Accepted(None))
    }
}

/// Messenger that records sent template messages.
#[derive(Clone, Default)]
pub struct RecordingMessenger {
    sent: Arc<Mutex<Vec<TemplateMessage>>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<TemplateMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Messenger for RecordingMessenger {
    async fn send_template(
        &self,
        message: &TemplateMessage,
    ) -> color_eyre::eyre::Result<Delivery> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(Delivery::Accepted(None))
    }
}
