//! Core of the rolodex service: session resolution, the validation
//! pipeline, and the ownership-scoped user/contact/address operations
//! behind the HTTP surface.

pub mod addresses;
pub mod contacts;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod users;
pub mod validation;

use std::sync::Arc;

use rolodex_db::Database;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}
