//! Route table

use crate::{
    handlers::{contact::handle_contact, health::handle_health},
    AppState,
};
use axum::{
    routing::{any, get},
    Router,
};

pub const CONTACT_PATH: &str = "/api/contact";

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handle_health))
        .route(CONTACT_PATH, any(handle_contact))
}
