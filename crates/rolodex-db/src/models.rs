/// Database row types — these map directly to SQLite rows.
/// Distinct from the rolodex-types API models to keep the DB layer independent.

pub struct UserRow {
    pub username: String,
    pub name: String,
    pub password: String,
    pub token: Option<String>,
    pub created_at: String,
}

pub struct ContactRow {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: String,
}

pub struct AddressRow {
    pub id: i64,
    pub contact_id: i64,
    pub street: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub postal_code: Option<String>,
    pub created_at: String,
}

/// Optional predicates for the contact search scan. Present fields all
/// narrow the result (AND semantics).
#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}
