//! Environment configuration.

use std::net::SocketAddr;
use std::time::Duration;

use color_eyre::eyre::WrapErr as _;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Where settings and subscriptions live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Direct Postgres connection.
    Postgres { database_url: String },
    /// PostgREST gateway of a hosted project.
    Rest { project_url: String, api_key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResendConfig {
    pub api_key: String,
    pub from: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsAppConfig {
    pub access_token: String,
    pub phone_number_id: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
    /// Firebase service-account JSON; checked lazily on first push.
    pub firebase_service_account: Option<String>,
    pub resend: Option<ResendConfig>,
    pub whatsapp: Option<WhatsAppConfig>,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> color_eyre::eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from a variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> color_eyre::eyre::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = get("NOTIFY_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .wrap_err("invalid NOTIFY_BIND_ADDR")?;

        let store = match (
            get("DATABASE_URL"),
            get("SUPABASE_URL"),
            get("SUPABASE_SERVICE_ROLE_KEY"),
        ) {
            (Some(database_url), _, _) => StoreConfig::Postgres { database_url },
            (None, Some(project_url), Some(api_key)) => StoreConfig::Rest {
                project_url,
                api_key,
            },
            _ => color_eyre::eyre::bail!(
                "no data store configured: set DATABASE_URL or SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY"
            ),
        };

        let resend = get("RESEND_API_KEY").map(|api_key| ResendConfig {
            api_key,
            from: get("RESEND_FROM")
                .unwrap_or_else(|| notify_channels::DEFAULT_SENDER.to_string()),
        });

        let whatsapp = match (get("WHATSAPP_TOKEN"), get("WHATSAPP_PHONE_NUMBER_ID")) {
            (Some(access_token), Some(phone_number_id)) => Some(WhatsAppConfig {
                access_token,
                phone_number_id,
            }),
            _ => None,
        };

        let http_timeout = match get("NOTIFY_HTTP_TIMEOUT_SECS") {
            Some(secs) => secs
                .parse::<u64>()
                .wrap_err("invalid NOTIFY_HTTP_TIMEOUT_SECS")?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            bind_addr,
            store,
            firebase_service_account: get("FIREBASE_SERVICE_ACCOUNT"),
            resend,
            whatsapp,
            http_timeout: Duration::from_secs(http_timeout),
        })
    }
}
