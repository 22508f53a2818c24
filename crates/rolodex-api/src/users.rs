use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Extension, Json, extract::State, response::IntoResponse};
use tracing::info;
use uuid::Uuid;

use rolodex_db::Database;
use rolodex_types::api::{
    Envelope, LoginUserRequest, RegisterUserRequest, UpdateUserRequest, UserResponse,
};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::CurrentUser;
use crate::validation::{self, LoginUser, RegisterUser, UpdateProfile};

// ── Core operations ─────────────────────────────────────────────────────

/// Create the account. The existence check and the insert are two steps;
/// the primary key backstops the race between them.
pub fn register(db: &Database, cmd: RegisterUser) -> ApiResult<UserResponse> {
    if db.username_taken(&cmd.username)? {
        return Err(ApiError::BadRequest("Username already exists".to_string()));
    }

    let password_hash = hash_password(&cmd.password)?;
    db.create_user(&cmd.username, &cmd.name, &password_hash)?;

    info!("Registered user {}", cmd.username);

    Ok(UserResponse {
        username: cmd.username,
        name: cmd.name,
        token: None,
    })
}

/// Verify credentials and rotate the session token. Unknown usernames and
/// wrong passwords produce the same message, so the endpoint is not an
/// account-probing oracle. Concurrent logins race on the rotation; the last
/// write wins and earlier tokens stop resolving.
pub fn login(db: &Database, cmd: LoginUser) -> ApiResult<UserResponse> {
    let invalid = || ApiError::BadRequest("Invalid username or password".to_string());

    let user = db.get_user_by_username(&cmd.username)?.ok_or_else(invalid)?;

    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| ApiError::Internal(anyhow!("stored hash unreadable: {e}")))?;

    Argon2::default()
        .verify_password(cmd.password.as_bytes(), &parsed_hash)
        .map_err(|_| invalid())?;

    let token = Uuid::new_v4().to_string();
    db.set_user_token(&user.username, Some(&token))?;

    info!("User {} logged in", user.username);

    Ok(UserResponse {
        username: user.username,
        name: user.name,
        token: Some(token),
    })
}

/// Partial profile update; absent fields keep their stored values.
pub fn update(db: &Database, username: &str, cmd: UpdateProfile) -> ApiResult<UserResponse> {
    let user = db
        .get_user_by_username(username)?
        .ok_or_else(|| ApiError::Internal(anyhow!("authenticated user {username} has no row")))?;

    let name = cmd.name.unwrap_or(user.name);
    let password_hash = match cmd.password {
        Some(password) => hash_password(&password)?,
        None => user.password,
    };

    db.update_user(username, &name, &password_hash)?;

    Ok(UserResponse {
        username: username.to_string(),
        name,
        token: None,
    })
}

/// Clear the session token. No token resolves this user again until the
/// next login.
pub fn logout(db: &Database, username: &str) -> ApiResult<()> {
    db.set_user_token(username, None)?;
    info!("User {username} logged out");
    Ok(())
}

fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(anyhow!("password hash failed: {e}")))?
        .to_string();
    Ok(hash)
}

// ── Handlers ────────────────────────────────────────────────────────────

pub async fn register_user(
    State(state): State<AppState>,
    Json(body): Json<RegisterUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = validation::register_user(body)?;

    let db = state.clone();
    let user = tokio::task::spawn_blocking(move || register(&db.db, cmd)).await??;

    Ok(Json(Envelope { data: user }))
}

pub async fn login_user(
    State(state): State<AppState>,
    Json(body): Json<LoginUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = validation::login_user(body)?;

    let db = state.clone();
    let user = tokio::task::spawn_blocking(move || login(&db.db, cmd)).await??;

    Ok(Json(Envelope { data: user }))
}

pub async fn current_user(Extension(user): Extension<CurrentUser>) -> impl IntoResponse {
    Json(Envelope {
        data: UserResponse {
            username: user.username,
            name: user.name,
            token: None,
        },
    })
}

pub async fn update_current_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = validation::update_user(body)?;

    let db = state.clone();
    let updated =
        tokio::task::spawn_blocking(move || update(&db.db, &user.username, cmd)).await??;

    Ok(Json(Envelope { data: updated }))
}

pub async fn logout_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let username = user.username.clone();
    tokio::task::spawn_blocking(move || logout(&db.db, &username)).await??;

    // the response is the principal that authenticated this request
    Ok(Json(Envelope {
        data: UserResponse {
            username: user.username,
            name: user.name,
            token: None,
        },
    }))
}
