//! Order Notification Channels
//!
//! Customer-facing delivery: transactional email through Resend and
//! template messages through the WhatsApp Business Cloud API.

mod email;
mod traits;
mod whatsapp;

pub use email::*;
pub use traits::*;
pub use whatsapp::*;
