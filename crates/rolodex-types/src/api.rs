use serde::{Deserialize, Serialize};

// -- Envelope --

/// Every successful response wraps its payload under a `data` key.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Search responses carry the page of items plus a paging block.
#[derive(Debug, Serialize)]
pub struct PagedEnvelope<T> {
    pub data: Vec<T>,
    pub paging: Paging,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging {
    pub current_page: i64,
    pub total_page: i64,
    pub size: i64,
}

// -- Users --

#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// `token` is present only in the login response.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

// -- Contacts --

/// Shared body for contact create and update. Fields are optional at the
/// deserialization layer; the validation pipeline decides what is required,
/// so a missing field reports a field message instead of a decode error.
#[derive(Debug, Deserialize)]
pub struct ContactBody {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Raw search query parameters. `page` and `size` arrive as strings and are
/// parsed (with defaults) by the validation pipeline.
#[derive(Debug, Deserialize)]
pub struct SearchContactsQuery {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
}

// -- Addresses --

#[derive(Debug, Deserialize)]
pub struct AddressBody {
    pub street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}
