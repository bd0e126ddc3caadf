//! Resend email delivery.

use color_eyre::eyre::WrapErr as _;
use serde::{Deserialize, Serialize};

use crate::{Delivery, Email, Mailer};

/// Production Resend endpoint.
pub const RESEND_BASE_URL: &str = "https://api.resend.com";

/// Default sender when none is configured.
pub const DEFAULT_SENDER: &str = "Crackers Store <orders@resend.dev>";

/// Resend API client.
#[derive(Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
    base_url: String,
}

impl ResendMailer {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            from: from.into(),
            base_url: RESEND_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

impl Mailer for ResendMailer {
    async fn send_email(&self, email: &Email) -> color_eyre::eyre::Result<Delivery> {
        let request = SendEmailRequest {
            from: &self.from,
            to: [email.to.as_str()],
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .wrap_err("failed to send email")?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Ok(Delivery::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let id = serde_json::from_str::<SendEmailResponse>(&body)
            .ok()
            .and_then(|r| r.id);

        Ok(Delivery::Accepted(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn email() -> Email {
        Email {
            to: "a@b.com".to_string(),
            subject: "Order Update: #O1".to_string(),
            html: "<p>Shipped</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_email_request_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("authorization", "Bearer re_key"))
            .and(body_json(serde_json::json!({
                "from": "Store <orders@example.com>",
                "to": ["a@b.com"],
                "subject": "Order Update: #O1",
                "html": "<p>Shipped</p>"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "em_1"})))
            .expect(1)
            .mount(&server)
            .await;

        let mailer = ResendMailer::new(reqwest::Client::new(), "re_key", "Store <orders@example.com>")
            .with_base_url(server.uri());

        let delivery = mailer.send_email(&email()).await.unwrap();
        assert_eq!(delivery, Delivery::Accepted(Some("em_1".to_string())));
    }

    #[tokio::test]
    async fn test_rejected_email() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(422).set_body_string("invalid `to` field"))
            .mount(&server)
            .await;

        let mailer = ResendMailer::new(reqwest::Client::new(), "re_key", DEFAULT_SENDER)
            .with_base_url(server.uri());

        let delivery = mailer.send_email(&email()).await.unwrap();
        assert!(!delivery.is_accepted());
        assert_eq!(
            delivery,
            Delivery::Rejected {
                status: 422,
                body: "invalid `to` field".to_string()
            }
        );
    }
}
