//! WhatsApp Business Cloud API delivery.

use color_eyre::eyre::WrapErr as _;
use serde::{Deserialize, Serialize};

use crate::{Delivery, Messenger, TemplateMessage};

/// Production Graph API endpoint, including the API version.
pub const WHATSAPP_BASE_URL: &str = "https://graph.facebook.com/v17.0";

/// WhatsApp Cloud API client bound to one sender phone number.
#[derive(Clone)]
pub struct WhatsAppClient {
    client: reqwest::Client,
    access_token: String,
    phone_number_id: String,
    base_url: String,
}

impl WhatsAppClient {
    pub fn new(
        client: reqwest::Client,
        access_token: impl Into<String>,
        phone_number_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            access_token: access_token.into(),
            phone_number_id: phone_number_id.into(),
            base_url: WHATSAPP_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    template: Template<'a>,
}

#[derive(Debug, Serialize)]
struct Template<'a> {
    name: &'a str,
    language: Language<'a>,
    components: Vec<Component<'a>>,
}

#[derive(Debug, Serialize)]
struct Language<'a> {
    code: &'a str,
}

#[derive(Debug, Serialize)]
struct Component<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    parameters: Vec<Parameter<'a>>,
}

#[derive(Debug, Serialize)]
struct Parameter<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    messages: Vec<MessageId>,
}

#[derive(Debug, Deserialize)]
struct MessageId {
    id: String,
}

impl<'a> MessageRequest<'a> {
    fn template(message: &'a TemplateMessage) -> Self {
        let parameters = message
            .parameters
            .iter()
            .map(|text| Parameter {
                kind: "text",
                text: text.as_str(),
            })
            .collect();

        Self {
            messaging_product: "whatsapp",
            to: &message.to,
            kind: "template",
            template: Template {
                name: &message.template,
                language: Language {
                    code: &message.language,
                },
                components: vec![Component {
                    kind: "body",
                    parameters,
                }],
            },
        }
    }
}

impl Messenger for WhatsAppClient {
    async fn send_template(
        &self,
        message: &TemplateMessage,
    ) -> color_eyre::eyre::Result<Delivery> {
        let response = self
            .client
            .post(format!("{}/{}/messages", self.base_url, self.phone_number_id))
            .bearer_auth(&self.access_token)
            .json(&MessageRequest::template(message))
            .send()
            .await
            .wrap_err("failed to send WhatsApp message")?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Ok(Delivery::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let id = serde_json::from_str::<MessageResponse>(&body)
            .ok()
            .and_then(|r| r.messages.into_iter().next())
            .map(|m| m.id);

        Ok(Delivery::Accepted(id))
    }
}
