//! Notification content.

use notify_channels::{Email, TemplateMessage};
use notify_core::{OrderRecord, PushMessage, StatusUpdate};

pub const NEW_ORDER_TITLE: &str = "New Order Received!";

/// Admin page opened from the push notification.
pub const ORDERS_LINK: &str = "/admin/orders";

pub const STATUS_TEMPLATE: &str = "order_status_update";
pub const STATUS_TEMPLATE_LANGUAGE: &str = "en";

/// Admin push announcing a new order.
pub fn new_order_push(record: &OrderRecord) -> PushMessage {
    let total = record
        .order_total()
        .map(ToString::to_string)
        .unwrap_or_else(|| "0".to_string());

    PushMessage::new(
        NEW_ORDER_TITLE,
        format!("Order #{} for ₹{} has been placed.", record.id, total),
    )
    .with_data("orderId", record.id.to_string())
    .with_link(ORDERS_LINK)
}

pub fn status_subject(order_id: &str) -> String {
    format!("Order Update: #{}", order_id)
}

/// Status update email addressed to `to`.
pub fn status_email(update: &StatusUpdate, to: &str) -> Email {
    let name = update
        .customer_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("Customer");

    let html = format!(
        concat!(
            "<div style=\"font-family: sans-serif; max-width: 600px; margin: 0 auto;\">",
            "<h2 style=\"color: #d9480f;\">Order Update</h2>",
            "<p>Hi {name},</p>",
            "<p>The status of your order <strong>#{order_id}</strong> is now ",
            "<strong>{status}</strong>.</p>",
            "<p>Thank you for shopping with us. Have a safe and happy celebration!</p>",
            "</div>"
        ),
        name = escape_html(name),
        order_id = escape_html(&update.order_id),
        status = escape_html(&update.status),
    );

    Email {
        to: to.to_string(),
        subject: status_subject(&update.order_id),
        html,
    }
}

/// WhatsApp status template addressed to `phone`.
pub fn status_template(update: &StatusUpdate, phone: &str) -> Option<TemplateMessage> {
    let to = normalize_phone(phone);
    if to.is_empty() {
        return None;
    }

    Some(TemplateMessage {
        to,
        template: STATUS_TEMPLATE.to_string(),
        language: STATUS_TEMPLATE_LANGUAGE.to_string(),
        parameters: vec![update.order_id.clone(), update.status.clone()],
    })
}

/// Digits only; the Cloud API expects the number with country code and no
/// formatting.
fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
