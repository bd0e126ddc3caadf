//! Postgres storage implementation.

use color_eyre::eyre::WrapErr as _;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

use crate::models::*;
use crate::schema::*;
use crate::traits::*;
use notify_core::Settings;

type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Postgres-based storage.
///
/// Diesel is blocking, so every query runs on the blocking thread pool.
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Create a new Postgres storage from a database URL.
    pub fn new(database_url: &str) -> color_eyre::eyre::Result<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(10)
            .build(manager)
            .wrap_err("failed to create connection pool")?;

        Ok(Self { pool })
    }

    /// Run migrations.
    pub fn run_migrations(&self) -> color_eyre::eyre::Result<()> {
        use diesel_migrations::MigrationHarness as _;

        let mut conn = self
            .pool
            .get()
            .wrap_err("failed to get connection for migrations")?;

        let applied = conn
            .run_pending_migrations(crate::MIGRATIONS)
            .map_err(|e| color_eyre::eyre::eyre!("migration failed: {}", e))?;

        tracing::info!(count = applied.len(), "applied migrations");

        Ok(())
    }

    async fn with_conn<T, F>(&self, f: F) -> color_eyre::eyre::Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> color_eyre::eyre::Result<T> + Send + 'static,
    {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().wrap_err("failed to get database connection")?;
            f(&mut conn)
        })
        .await
        .wrap_err("database task panicked")?
    }
}

impl SettingsStore for PgStorage {
    async fn load_settings(&self) -> color_eyre::eyre::Result<Option<Settings>> {
        self.with_conn(|conn| {
            let row: Option<SettingsRow> = settings::table
                .order(settings::id.asc())
                .select(SettingsRow::as_select())
                .first(conn)
                .optional()
                .wrap_err("failed to load settings")?;

            Ok(row.map(Settings::from))
        })
        .await
    }
}

impl SubscriptionStore for PgStorage {
    async fn subscription_tokens(&self) -> color_eyre::eyre::Result<Vec<String>> {
        self.with_conn(|conn| {
            admin_subscriptions::table
                .order(admin_subscriptions::id.asc())
                .select(admin_subscriptions::token)
                .load::<String>(conn)
                .wrap_err("failed to load subscription tokens")
        })
        .await
    }

    async fn add_subscription(&self, token: &str) -> color_eyre::eyre::Result<()> {
        let token = token.to_string();

        self.with_conn(move |conn| {
            let new_subscription = NewSubscription {
                token: &token,
                created_at: chrono::Utc::now(),
            };

            diesel::insert_into(admin_subscriptions::table)
                .values(&new_subscription)
                .on_conflict(admin_subscriptions::token)
                .do_nothing()
                .execute(conn)
                .wrap_err("failed to store subscription")?;

            Ok(())
        })
        .await
    }

    async fn delete_subscriptions(&self, tokens: &[&str]) -> color_eyre::eyre::Result<usize> {
        if tokens.is_empty() {
            return Ok(0);
        }

        let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();

        self.with_conn(move |conn| {
            diesel::delete(
                admin_subscriptions::table.filter(admin_subscriptions::token.eq_any(&tokens)),
            )
            .execute(conn)
            .wrap_err("failed to delete subscriptions")
        })
        .await
    }
}
