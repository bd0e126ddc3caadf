//! Database models.

use diesel::prelude::*;

use crate::schema::{admin_subscriptions, settings};

/// Settings record.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = settings)]
pub struct SettingsRow {
    pub id: i32,
    pub push_enabled: Option<bool>,
    pub email_enabled: Option<bool>,
    pub whatsapp_enabled: Option<bool>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<SettingsRow> for notify_core::Settings {
    fn from(row: SettingsRow) -> Self {
        Self {
            push_enabled: row.push_enabled,
            email_enabled: row.email_enabled,
            whatsapp_enabled: row.whatsapp_enabled,
        }
    }
}

/// Admin push subscription record.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = admin_subscriptions)]
pub struct SubscriptionRow {
    pub id: i64,
    pub token: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// New subscription for insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = admin_subscriptions)]
pub struct NewSubscription<'a> {
    pub token: &'a str,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
