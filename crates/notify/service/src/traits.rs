//! Service traits.

use notify_channels::Delivery;
use notify_core::StatusUpdate;

/// Outcome of an admin new-order notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminOutcome {
    /// Push is switched off in settings.
    PushDisabled,
    /// No subscription rows exist.
    NoSubscribers,
    /// Rows exist but no usable token remained after deduplication.
    NoValidTokens,
    /// The multicast was dispatched.
    Sent {
        success: usize,
        failure: usize,
        /// Rows removed for tokens the provider rejected.
        pruned: usize,
    },
}

impl AdminOutcome {
    /// Human-readable summary returned to the caller.
    pub fn message(&self) -> &'static str {
        match self {
            Self::PushDisabled => "Push notifications disabled",
            Self::NoSubscribers => "No subscribers",
            Self::NoValidTokens => "No valid tokens",
            Self::Sent { .. } => "Notifications sent",
        }
    }
}

/// What happened on one customer channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelOutcome {
    /// Switched off in settings.
    Disabled,
    /// Provider credentials are not configured.
    NotConfigured,
    /// The request carries no address for this channel.
    NoRecipient,
    /// A send was attempted.
    Attempted(Delivery),
}

/// Outcome of a customer status notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerOutcome {
    pub email: ChannelOutcome,
    pub whatsapp: ChannelOutcome,
}

impl CustomerOutcome {
    pub fn message(&self) -> &'static str {
        "Notifications processed"
    }
}

/// Admin new-order notification service trait.
#[trait_variant::make(Send)]
pub trait AdminNotify: Send + Sync {
    /// Notify subscribed admins about the order in a raw webhook payload.
    ///
    /// The payload is only parsed once push is known to be enabled.
    async fn notify_new_order(&self, payload: &[u8]) -> color_eyre::eyre::Result<AdminOutcome>;
}

/// Customer status notification service trait.
#[trait_variant::make(Send)]
pub trait CustomerNotify: Send + Sync {
    /// Notify a customer about an order status change.
    async fn notify_status_change(
        &self,
        update: &StatusUpdate,
    ) -> color_eyre::eyre::Result<CustomerOutcome>;
}
