//! PostgREST storage implementation.
//!
//! Talks to a hosted Postgres through its REST gateway using the project URL
//! and a service key, for deployments without direct database access.

use color_eyre::eyre::WrapErr as _;
use serde::Deserialize;

use crate::traits::*;
use notify_core::Settings;

const SETTINGS_TABLE: &str = "settings";
const SUBSCRIPTIONS_TABLE: &str = "admin_subscriptions";

/// PostgREST-based storage.
#[derive(Clone)]
pub struct RestStorage {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct TokenRow {
    token: String,
}

impl RestStorage {
    /// Create a new REST storage from the project URL and service key.
    pub fn new(
        client: reqwest::Client,
        project_url: &str,
        api_key: impl Into<String>,
    ) -> color_eyre::eyre::Result<Self> {
        let project_url = project_url.trim_end_matches('/');
        if project_url.is_empty() {
            color_eyre::eyre::bail!("data store URL is empty");
        }

        Ok(Self {
            client,
            base_url: format!("{}/rest/v1", project_url),
            api_key: api_key.into(),
        })
    }

    fn request(&self, method: reqwest::Method, table: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.base_url, table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send(
        builder: reqwest::RequestBuilder,
        what: &str,
    ) -> color_eyre::eyre::Result<reqwest::Response> {
        let response = builder
            .send()
            .await
            .wrap_err_with(|| format!("failed to {}", what))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            color_eyre::eyre::bail!("failed to {} ({}): {}", what, status, body);
        }

        Ok(response)
    }
}

/// PostgREST `in` filter for a list of text values.
fn in_filter(values: &[&str]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|v| format!("\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

impl SettingsStore for RestStorage {
    async fn load_settings(&self) -> color_eyre::eyre::Result<Option<Settings>> {
        let request = self.request(reqwest::Method::GET, SETTINGS_TABLE).query(&[
            ("select", "push_enabled,email_enabled,whatsapp_enabled"),
            ("order", "id.asc"),
            ("limit", "1"),
        ]);

        let rows: Vec<Settings> = Self::send(request, "load settings")
            .await?
            .json()
            .await
            .wrap_err("failed to parse settings")?;

        Ok(rows.into_iter().next())
    }
}

impl SubscriptionStore for RestStorage {
    async fn subscription_tokens(&self) -> color_eyre::eyre::Result<Vec<String>> {
        let request = self
            .request(reqwest::Method::GET, SUBSCRIPTIONS_TABLE)
            .query(&[("select", "token")]);

        let rows: Vec<TokenRow> = Self::send(request, "load subscription tokens")
            .await?
            .json()
            .await
            .wrap_err("failed to parse subscription tokens")?;

        Ok(rows.into_iter().map(|row| row.token).collect())
    }

    async fn add_subscription(&self, token: &str) -> color_eyre::eyre::Result<()> {
        let request = self
            .request(reqwest::Method::POST, SUBSCRIPTIONS_TABLE)
            .query(&[("on_conflict", "token")])
            .header("Prefer", "resolution=ignore-duplicates,return=minimal")
            .json(&serde_json::json!({ "token": token }));

        Self::send(request, "store subscription").await?;

        Ok(())
    }

    async fn delete_subscriptions(&self, tokens: &[&str]) -> color_eyre::eyre::Result<usize> {
        if tokens.is_empty() {
            return Ok(0);
        }

        let request = self
            .request(reqwest::Method::DELETE, SUBSCRIPTIONS_TABLE)
            .query(&[("token", in_filter(tokens))])
            .header("Prefer", "return=representation");

        let deleted: Vec<serde_json::Value> = Self::send(request, "delete subscriptions")
            .await?
            .json()
            .await
            .wrap_err("failed to parse deleted subscriptions")?;

        Ok(deleted.len())
    }
}
