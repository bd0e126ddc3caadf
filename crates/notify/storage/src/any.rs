//! Runtime-selected storage backend.

use notify_core::Settings;

use crate::traits::*;
use crate::{PgStorage, RestStorage};

/// Storage chosen from configuration at startup.
#[derive(Clone)]
pub enum AnyStorage {
    Postgres(PgStorage),
    Rest(RestStorage),
}

impl AnyStorage {
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Rest(_) => "rest",
        }
    }
}

impl SettingsStore for AnyStorage {
    async fn load_settings(&self) -> color_eyre::eyre::Result<Option<Settings>> {
        match self {
            Self::Postgres(s) => s.load_settings().await,
            Self::Rest(s) => s.load_settings().await,
        }
    }
}

impl SubscriptionStore for AnyStorage {
    async fn subscription_tokens(&self) -> color_eyre::eyre::Result<Vec<String>> {
        match self {
            Self::Postgres(s) => s.subscription_tokens().await,
            Self::Rest(s) => s.subscription_tokens().await,
        }
    }

    async fn add_subscription(&self, token: &str) -> color_eyre::eyre::Result<()> {
        match self {
            Self::Postgres(s) => s.add_subscription(token).await,
            Self::Rest(s) => s.add_subscription(token).await,
        }
    }

    async fn delete_subscriptions(&self, tokens: &[&str]) -> color_eyre::eyre::Result<usize> {
        match self {
            Self::Postgres(s) => s.delete_subscriptions(tokens).await,
            Self::Rest(s) => s.delete_subscriptions(tokens).await,
        }
    }
}
