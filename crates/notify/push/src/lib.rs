//! Order Notification Push
//!
//! Admin web-push delivery through Firebase Cloud Messaging.

mod fcm;
mod shared;
mod traits;

pub use fcm::*;
pub use shared::SharedFcmPusher;
pub use traits::*;
