//! Delivery channel traits.

/// Outcome of a delivery the provider accepted or declined.
///
/// Transport failures are reported as `Err` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Accepted, with the provider's message id when it returns one.
    Accepted(Option<String>),
    /// The provider answered with a non-success status.
    Rejected { status: u16, body: String },
}

impl Delivery {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// A transactional email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// A WhatsApp template message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMessage {
    /// Recipient phone number.
    pub to: String,
    pub template: String,
    pub language: String,
    /// Positional body parameters.
    pub parameters: Vec<String>,
}

/// Email sender.
#[trait_variant::make(Send)]
pub trait Mailer: Send + Sync {
    async fn send_email(&self, email: &Email) -> color_eyre::eyre::Result<Delivery>;
}

/// Template message sender.
#[trait_variant::make(Send)]
pub trait Messenger: Send + Sync {
    async fn send_template(&self, message: &TemplateMessage)
    -> color_eyre::eyre::Result<Delivery>;
}
