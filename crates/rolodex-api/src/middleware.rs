use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppState;
use crate::error::ApiError;

/// Header carrying the opaque session token.
pub const API_TOKEN_HEADER: &str = "X-API-TOKEN";

/// The authenticated principal. `require_auth` inserts it into request
/// extensions; handlers take it back out via `Extension<CurrentUser>`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: String,
    pub name: String,
}

/// Resolve the session token to its user. Absent, unknown, and stale tokens
/// all fail identically so the response never reveals which case occurred.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(API_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .ok_or(ApiError::Unauthorized)?;

    // Token lookup hits SQLite; keep it off the async runtime
    let db = state.clone();
    let user = tokio::task::spawn_blocking(move || db.db.get_user_by_token(&token))
        .await??
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(CurrentUser {
        username: user.username,
        name: user.name,
    });

    Ok(next.run(req).await)
}
