//! Order Notification Storage Layer
//!
//! Settings and admin push-subscription storage, backed either by Postgres
//! through diesel or by a PostgREST endpoint.

mod any;
mod models;
mod postgres;
mod rest;
mod schema;
mod traits;

pub use any::AnyStorage;
pub use models::*;
pub use postgres::PgStorage;
pub use rest::RestStorage;
pub use traits::*;

use diesel_migrations::{EmbeddedMigrations, embed_migrations};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");
