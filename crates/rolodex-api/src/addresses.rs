use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use rolodex_db::Database;
use rolodex_db::models::AddressRow;
use rolodex_types::api::{AddressBody, Envelope};
use rolodex_types::models::Address;

use crate::AppState;
use crate::contacts;
use crate::error::{ApiError, ApiResult};
use crate::middleware::CurrentUser;
use crate::validation::{self, AddressRef, CreateAddress, UpdateAddress};

// ── Core operations ─────────────────────────────────────────────────────
//
// Every operation resolves the contact through the owner chain first, so an
// address under another user's contact reports the contact as missing and
// never reveals that the address exists.

fn require_address(db: &Database, id: i64, contact_id: i64) -> ApiResult<AddressRow> {
    db.get_address(id, contact_id)?.ok_or_else(|| {
        ApiError::NotFound(format!(
            "Address with id {id} not found for contact {contact_id}"
        ))
    })
}

pub fn create(db: &Database, username: &str, cmd: CreateAddress) -> ApiResult<Address> {
    contacts::require_owned(db, username, cmd.contact_id)?;

    let id = db.insert_address(
        cmd.contact_id,
        &cmd.street,
        &cmd.city,
        &cmd.province,
        &cmd.country,
        cmd.postal_code.as_deref(),
    )?;

    Ok(Address {
        id,
        street: cmd.street,
        city: cmd.city,
        province: cmd.province,
        country: cmd.country,
        postal_code: cmd.postal_code,
    })
}

pub fn get(db: &Database, username: &str, r: AddressRef) -> ApiResult<Address> {
    contacts::require_owned(db, username, r.contact_id)?;
    let row = require_address(db, r.id, r.contact_id)?;
    Ok(project(row))
}

pub fn update(db: &Database, username: &str, cmd: UpdateAddress) -> ApiResult<Address> {
    contacts::require_owned(db, username, cmd.contact_id)?;
    require_address(db, cmd.id, cmd.contact_id)?;

    let rows = db.update_address(
        cmd.id,
        cmd.contact_id,
        &cmd.street,
        &cmd.city,
        &cmd.province,
        &cmd.country,
        cmd.postal_code.as_deref(),
    )?;
    if rows == 0 {
        // lost a race with a concurrent delete
        return Err(ApiError::NotFound(format!(
            "Address with id {} not found for contact {}",
            cmd.id, cmd.contact_id
        )));
    }

    Ok(Address {
        id: cmd.id,
        street: cmd.street,
        city: cmd.city,
        province: cmd.province,
        country: cmd.country,
        postal_code: cmd.postal_code,
    })
}

pub fn remove(db: &Database, username: &str, r: AddressRef) -> ApiResult<()> {
    contacts::require_owned(db, username, r.contact_id)?;
    require_address(db, r.id, r.contact_id)?;

    let rows = db.delete_address(r.id, r.contact_id)?;
    if rows == 0 {
        // lost a race with a concurrent delete
        return Err(ApiError::NotFound(format!(
            "Address with id {} not found for contact {}",
            r.id, r.contact_id
        )));
    }

    Ok(())
}

pub fn list(db: &Database, username: &str, contact_id: i64) -> ApiResult<Vec<Address>> {
    contacts::require_owned(db, username, contact_id)?;
    let rows = db.list_addresses(contact_id)?;
    Ok(rows.into_iter().map(project).collect())
}

fn project(row: AddressRow) -> Address {
    Address {
        id: row.id,
        street: row.street,
        city: row.city,
        province: row.province,
        country: row.country,
        postal_code: row.postal_code,
    }
}

// ── Handlers ────────────────────────────────────────────────────────────

pub async fn create_address(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(contact_id): Path<String>,
    Json(body): Json<AddressBody>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = validation::create_address(&contact_id, body)?;

    let db = state.clone();
    let address =
        tokio::task::spawn_blocking(move || create(&db.db, &user.username, cmd)).await??;

    Ok((StatusCode::CREATED, Json(Envelope { data: address })))
}

pub async fn get_address(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((contact_id, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let r = validation::address_ref(&id, &contact_id)?;

    let db = state.clone();
    let address = tokio::task::spawn_blocking(move || get(&db.db, &user.username, r)).await??;

    Ok(Json(Envelope { data: address }))
}

pub async fn update_address(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((contact_id, id)): Path<(String, String)>,
    Json(body): Json<AddressBody>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = validation::update_address(&id, &contact_id, body)?;

    let db = state.clone();
    let address =
        tokio::task::spawn_blocking(move || update(&db.db, &user.username, cmd)).await??;

    // update keeps the create status for historical clients
    Ok((StatusCode::CREATED, Json(Envelope { data: address })))
}

pub async fn delete_address(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((contact_id, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let r = validation::address_ref(&id, &contact_id)?;

    let db = state.clone();
    tokio::task::spawn_blocking(move || remove(&db.db, &user.username, r)).await??;

    Ok(Json(Envelope { data: "Success" }))
}

pub async fn list_addresses(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(contact_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let contact_id = validation::owning_contact_ref(&contact_id)?;

    let db = state.clone();
    let addresses =
        tokio::task::spawn_blocking(move || list(&db.db, &user.username, contact_id)).await??;

    Ok(Json(Envelope { data: addresses }))
}
