//! Order Notification Service Layer
//!
//! Business logic for notifying admins of new orders and customers of order
//! status changes.

mod admin;
mod customer;
pub mod templates;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
mod traits;

pub use admin::AdminNotifier;
pub use customer::CustomerNotifier;
pub use traits::*;
