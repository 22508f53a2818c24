use serde::{Deserialize, Serialize};

/// Client-visible projection of a contact. The owning username is internal
/// and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Client-visible projection of an address. The contact foreign key travels
/// in the URL, never in the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub id: i64,
    pub street: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub postal_code: Option<String>,
}
