//! Customer order status notifications.

use color_eyre::eyre::WrapErr as _;
use notify_channels::{Delivery, Mailer, Messenger};
use notify_core::{CustomerChannels, StatusUpdate};
use notify_storage::SettingsStore;

use crate::{ChannelOutcome, CustomerNotify, CustomerOutcome, templates};

/// Emails and messages customers when their order status changes.
///
/// A channel whose provider is `None` is treated as not configured.
#[derive(Clone)]
pub struct CustomerNotifier<S, M, W> {
    store: S,
    mailer: Option<M>,
    messenger: Option<W>,
}

impl<S, M, W> CustomerNotifier<S, M, W> {
    /// Create a new customer notifier.
    pub fn new(store: S, mailer: Option<M>, messenger: Option<W>) -> Self {
        Self {
            store,
            mailer,
            messenger,
        }
    }
}

impl<S, M, W> CustomerNotifier<S, M, W>
where
    S: SettingsStore,
    M: Mailer,
    W: Messenger,
{
    async fn channels(&self) -> CustomerChannels {
        match self.store.load_settings().await {
            Ok(settings) => CustomerChannels::resolve(settings.as_ref()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load settings, using channel defaults");
                CustomerChannels::default()
            }
        }
    }

    async fn email(
        &self,
        enabled: bool,
        update: &StatusUpdate,
    ) -> color_eyre::eyre::Result<ChannelOutcome> {
        if !enabled {
            return Ok(ChannelOutcome::Disabled);
        }
        let Some(mailer) = &self.mailer else {
            tracing::debug!("email provider not configured");
            return Ok(ChannelOutcome::NotConfigured);
        };
        let Some(to) = update.email() else {
            tracing::info!(order_id = %update.order_id, "no customer email, skipping");
            return Ok(ChannelOutcome::NoRecipient);
        };

        let email = templates::status_email(update, to);
        let delivery = mailer
            .send_email(&email)
            .await
            .wrap_err("failed to send status email")?;

        log_delivery("email", &update.order_id, &delivery);
        Ok(ChannelOutcome::Attempted(delivery))
    }

    async fn whatsapp(
        &self,
        enabled: bool,
        update: &StatusUpdate,
    ) -> color_eyre::eyre::Result<ChannelOutcome> {
        if !enabled {
            return Ok(ChannelOutcome::Disabled);
        }
        let Some(messenger) = &self.messenger else {
            tracing::debug!("WhatsApp provider not configured");
            return Ok(ChannelOutcome::NotConfigured);
        };
        let Some(phone) = update.phone() else {
            tracing::info!(order_id = %update.order_id, "no customer phone, skipping WhatsApp");
            return Ok(ChannelOutcome::NoRecipient);
        };

        let Some(message) = templates::status_template(update, phone) else {
            tracing::warn!(order_id = %update.order_id, "customer phone has no digits, skipping WhatsApp");
            return Ok(ChannelOutcome::NoRecipient);
        };
        let delivery = messenger
            .send_template(&message)
            .await
            .wrap_err("failed to send WhatsApp message")?;

        log_delivery("whatsapp", &update.order_id, &delivery);
        Ok(ChannelOutcome::Attempted(delivery))
    }
}

fn log_delivery(channel: &str, order_id: &str, delivery: &Delivery) {
    match delivery {
        Delivery::Accepted(id) => {
            tracing::info!(channel, order_id, message_id = ?id, "status notification sent");
        }
        Delivery::Rejected { status, body } => {
            tracing::warn!(channel, order_id, status, body = %body, "provider rejected status notification");
        }
    }
}

impl<S, M, W> CustomerNotify for CustomerNotifier<S, M, W>
where
    S: SettingsStore,
    M: Mailer,
    W: Messenger,
{
    async fn notify_status_change(
        &self,
        update: &StatusUpdate,
    ) -> color_eyre::eyre::Result<CustomerOutcome> {
        let channels = self.channels().await;

        tracing::info!(
            order_id = %update.order_id,
            status = %update.status,
            email = channels.email,
            whatsapp = channels.whatsapp,
            "processing status notification"
        );

        let email = self.email(channels.email, update).await?;
        let whatsapp = self.whatsapp(channels.whatsapp, update).await?;

        Ok(CustomerOutcome { email, whatsapp })
    }
}
