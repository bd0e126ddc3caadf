//! Push notification traits.

use notify_core::{MulticastReport, PushMessage};

/// Multicast push sender.
#[trait_variant::make(Send)]
pub trait Pusher: Send + Sync {
    /// Send one message to every token.
    ///
    /// Per-token failures are reported in the returned report, in token
    /// order. An `Err` means nothing could be sent at all.
    async fn send_multicast(
        &self,
        message: &PushMessage,
        tokens: &[String],
    ) -> color_eyre::eyre::Result<MulticastReport>;
}
