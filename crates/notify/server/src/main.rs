//! Notify Server - order notification webhooks for the storefront.

mod config;

use color_eyre::eyre::WrapErr as _;
use tower_http::trace::TraceLayer;

use config::{Config, StoreConfig};
use notify_channels::{ResendMailer, WhatsAppClient};
use notify_push::SharedFcmPusher;
use notify_service::{AdminNotifier, CustomerNotifier};
use notify_storage::{AnyStorage, PgStorage, RestStorage};

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;

    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "failed to load environment file"),
    }

    tracing::info!("notify-server starting");

    let config = Config::from_env().wrap_err("invalid configuration")?;

    let client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .wrap_err("failed to build HTTP client")?;

    // Initialize storage
    let storage = match &config.store {
        StoreConfig::Postgres { database_url } => {
            let storage =
                PgStorage::new(database_url).wrap_err("failed to initialize storage")?;
            storage
                .run_migrations()
                .wrap_err("failed to run migrations")?;
            AnyStorage::Postgres(storage)
        }
        StoreConfig::Rest {
            project_url,
            api_key,
        } => AnyStorage::Rest(
            RestStorage::new(client.clone(), project_url, api_key.clone())
                .wrap_err("failed to initialize storage")?,
        ),
    };
    tracing::info!(backend = storage.backend(), "storage ready");

    // Delivery channels
    if config.firebase_service_account.is_none() {
        tracing::warn!("FIREBASE_SERVICE_ACCOUNT not set, admin push will fail");
    }
    let pusher = SharedFcmPusher::new(client.clone(), config.firebase_service_account.clone());

    let mailer = config
        .resend
        .as_ref()
        .map(|resend| ResendMailer::new(client.clone(), &resend.api_key, &resend.from));

    let messenger = config.whatsapp.as_ref().map(|whatsapp| {
        WhatsAppClient::new(
            client.clone(),
            &whatsapp.access_token,
            &whatsapp.phone_number_id,
        )
    });

    tracing::info!(
        email = mailer.is_some(),
        whatsapp = messenger.is_some(),
        "customer channels configured"
    );

    // Build router
    let app = notify_http::notify_app(
        AdminNotifier::new(storage.clone(), pusher),
        CustomerNotifier::new(storage.clone(), mailer, messenger),
        storage,
    )
    .layer(TraceLayer::new_for_http());

    // Start server
    tracing::info!(addr = %config.bind_addr, "listening");

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .wrap_err("failed to bind")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("server error")?;

    tracing::info!("notify-server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
