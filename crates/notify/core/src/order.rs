//! Order event payloads.

use crate::FieldValue;

/// Database webhook envelope fired on an order row insert.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct WebhookEnvelope {
    /// Event type (`INSERT`, `UPDATE`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// The new row state.
    #[serde(default)]
    pub record: Option<OrderRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_record: Option<serde_json::Value>,
}

impl WebhookEnvelope {
    /// Wrap an inserted order record.
    pub fn insert(record: OrderRecord) -> Self {
        Self {
            event_type: Some("INSERT".to_string()),
            table: Some("orders".to_string()),
            record: Some(record),
            ..Default::default()
        }
    }

    /// Get the order record, returning an error if the envelope has none.
    pub fn require_record(&self) -> color_eyre::eyre::Result<&OrderRecord> {
        self.record
            .as_ref()
            .ok_or_else(|| color_eyre::eyre::eyre!("no order record in webhook payload"))
    }
}

/// Snapshot of a newly inserted order.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OrderRecord {
    pub id: FieldValue,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<FieldValue>,

    /// Older order rows carry `total` instead of `total_amount`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<FieldValue>,
}

impl OrderRecord {
    /// Create a record with a `total_amount`.
    pub fn new(id: impl Into<FieldValue>, total_amount: impl Into<FieldValue>) -> Self {
        Self {
            id: id.into(),
            total_amount: Some(total_amount.into()),
            total: None,
        }
    }

    /// Order total, preferring `total_amount` over `total`.
    pub fn order_total(&self) -> Option<&FieldValue> {
        self.total_amount.as_ref().or(self.total.as_ref())
    }
}

/// Order status change sent by the storefront for customer notification.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub order_id: String,
    pub status: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
}

impl StatusUpdate {
    /// Customer email, if present and non-blank.
    pub fn email(&self) -> Option<&str> {
        non_blank(self.customer_email.as_deref())
    }

    /// Customer phone number, if present and non-blank.
    pub fn phone(&self) -> Option<&str> {
        non_blank(self.customer_phone.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
