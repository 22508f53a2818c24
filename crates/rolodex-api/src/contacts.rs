use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tracing::debug;

use rolodex_db::Database;
use rolodex_db::models::{ContactFilter, ContactRow};
use rolodex_types::api::{ContactBody, Envelope, PagedEnvelope, Paging, SearchContactsQuery};
use rolodex_types::models::Contact;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::CurrentUser;
use crate::validation::{self, CreateContact, SearchContacts, UpdateContact};

// ── Core operations ─────────────────────────────────────────────────────

/// Resolve a contact through the owner predicate. A contact belonging to a
/// different user reports the same error as a missing one.
pub fn require_owned(db: &Database, username: &str, id: i64) -> ApiResult<ContactRow> {
    db.get_contact(id, username)?.ok_or_else(|| {
        ApiError::NotFound(format!("Contact with id {id} not found for user {username}"))
    })
}

pub fn create(db: &Database, username: &str, cmd: CreateContact) -> ApiResult<Contact> {
    let id = db.insert_contact(
        username,
        &cmd.first_name,
        cmd.last_name.as_deref(),
        cmd.email.as_deref(),
        cmd.phone.as_deref(),
    )?;

    debug!("User {username} created contact {id}");

    Ok(Contact {
        id,
        first_name: cmd.first_name,
        last_name: cmd.last_name,
        email: cmd.email,
        phone: cmd.phone,
    })
}

pub fn get(db: &Database, username: &str, id: i64) -> ApiResult<Contact> {
    let row = require_owned(db, username, id)?;
    Ok(project(row))
}

pub fn update(db: &Database, username: &str, cmd: UpdateContact) -> ApiResult<Contact> {
    let id = cmd.id;
    require_owned(db, username, id)?;

    let rows = db.update_contact(
        id,
        username,
        &cmd.first_name,
        cmd.last_name.as_deref(),
        cmd.email.as_deref(),
        cmd.phone.as_deref(),
    )?;
    if rows == 0 {
        // lost a race with a concurrent delete
        return Err(ApiError::NotFound(format!(
            "Contact with id {id} not found for user {username}"
        )));
    }

    Ok(Contact {
        id,
        first_name: cmd.first_name,
        last_name: cmd.last_name,
        email: cmd.email,
        phone: cmd.phone,
    })
}

pub fn remove(db: &Database, username: &str, id: i64) -> ApiResult<()> {
    require_owned(db, username, id)?;

    let rows = db.delete_contact(id, username)?;
    if rows == 0 {
        // lost a race with a concurrent delete
        return Err(ApiError::NotFound(format!(
            "Contact with id {id} not found for user {username}"
        )));
    }

    debug!("User {username} deleted contact {id}");
    Ok(())
}

/// Filtered, paginated scan over the caller's contacts, plus a count over
/// the same predicate. Results are ordered by ascending id so pages walk a
/// stable total order; a page beyond the range is empty with the paging
/// block unchanged.
pub fn search(
    db: &Database,
    username: &str,
    cmd: SearchContacts,
) -> ApiResult<(Vec<Contact>, Paging)> {
    let filter = ContactFilter {
        name: cmd.name,
        email: cmd.email,
        phone: cmd.phone,
    };

    let offset = (cmd.page - 1).saturating_mul(cmd.size);
    let rows = db.search_contacts(username, &filter, cmd.size, offset)?;
    let total = db.count_contacts(username, &filter)?;

    let paging = Paging {
        current_page: cmd.page,
        // size is validated positive, so size - 1 cannot underflow
        total_page: total.saturating_add(cmd.size - 1) / cmd.size,
        size: cmd.size,
    };

    Ok((rows.into_iter().map(project).collect(), paging))
}

fn project(row: ContactRow) -> Contact {
    Contact {
        id: row.id,
        first_name: row.first_name,
        last_name: row.last_name,
        email: row.email,
        phone: row.phone,
    }
}

// ── Handlers ────────────────────────────────────────────────────────────

pub async fn create_contact(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<ContactBody>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = validation::create_contact(body)?;

    let db = state.clone();
    let contact =
        tokio::task::spawn_blocking(move || create(&db.db, &user.username, cmd)).await??;

    Ok(Json(Envelope { data: contact }))
}

pub async fn get_contact(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = validation::contact_ref(&id)?;

    let db = state.clone();
    let contact = tokio::task::spawn_blocking(move || get(&db.db, &user.username, id)).await??;

    Ok(Json(Envelope { data: contact }))
}

pub async fn update_contact(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<ContactBody>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = validation::update_contact(&id, body)?;

    let db = state.clone();
    let contact =
        tokio::task::spawn_blocking(move || update(&db.db, &user.username, cmd)).await??;

    Ok(Json(Envelope { data: contact }))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = validation::contact_ref(&id)?;

    let db = state.clone();
    tokio::task::spawn_blocking(move || remove(&db.db, &user.username, id)).await??;

    Ok(Json(Envelope { data: "Success" }))
}

pub async fn search_contacts(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<SearchContactsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = validation::search_contacts(query)?;

    let db = state.clone();
    let (contacts, paging) =
        tokio::task::spawn_blocking(move || search(&db.db, &user.username, cmd)).await??;

    Ok(Json(PagedEnvelope {
        data: contacts,
        paging,
    }))
}
