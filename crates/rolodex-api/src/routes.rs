use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};
use serde_json::json;

use crate::AppState;
use crate::middleware::require_auth;
use crate::{addresses, contacts, users};

/// GET /api/ping — liveness check (no auth).
async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "message": "pong" }))
}

/// The full route table. Auth is layered onto the protected set only, so
/// ping/register/login stay reachable without a token.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/ping", get(ping))
        .route("/api/users", post(users::register_user))
        .route("/api/users/login", post(users::login_user))
        .with_state(state.clone());

    let protected = Router::new()
        .route(
            "/api/users/current",
            get(users::current_user).patch(users::update_current_user),
        )
        .route("/api/users/logout", delete(users::logout_user))
        .route(
            "/api/contacts",
            post(contacts::create_contact).get(contacts::search_contacts),
        )
        .route(
            "/api/contacts/{id}",
            get(contacts::get_contact)
                .put(contacts::update_contact)
                .delete(contacts::delete_contact),
        )
        .route(
            "/api/contacts/{contact_id}/addresses",
            post(addresses::create_address).get(addresses::list_addresses),
        )
        .route(
            "/api/contacts/{contact_id}/addresses/{id}",
            get(addresses::get_address)
                .put(addresses::update_address)
                .delete(addresses::delete_address),
        )
        .layer(from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    public.merge(protected)
}
