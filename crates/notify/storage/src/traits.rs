//! Storage traits.

use notify_core::Settings;

/// Settings storage operations.
#[trait_variant::make(Send)]
pub trait SettingsStore: Send + Sync {
    /// Load the global settings record, if one exists.
    async fn load_settings(&self) -> color_eyre::eyre::Result<Option<Settings>>;
}

/// Admin push-subscription storage operations.
#[trait_variant::make(Send)]
pub trait SubscriptionStore: Send + Sync {
    /// Get every stored subscription token. May contain duplicates.
    async fn subscription_tokens(&self) -> color_eyre::eyre::Result<Vec<String>>;

    /// Register a token. Registering an existing token is a no-op.
    async fn add_subscription(&self, token: &str) -> color_eyre::eyre::Result<()>;

    /// Delete the rows holding the given tokens, returning the number removed.
    async fn delete_subscriptions(&self, tokens: &[&str]) -> color_eyre::eyre::Result<usize>;
}

/// Combined storage trait.
pub trait AllStorage: SettingsStore + SubscriptionStore {}

impl<T> AllStorage for T where T: SettingsStore + SubscriptionStore {}
