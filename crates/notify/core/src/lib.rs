//! Order Notification Core Types
//!
//! Domain types shared by the storage, delivery and HTTP layers.

mod order;
mod push;
mod settings;
mod value;

pub use order::*;
pub use push::*;
pub use settings::*;
pub use value::*;
