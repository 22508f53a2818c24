//! The validation pipeline: one pure function per operation.
//!
//! Each validator takes the raw deserialized input plus any route-injected
//! identifiers and produces a normalized command, or the full list of field
//! messages. Failures short-circuit the request before any ownership check
//! or storage access, and revalidating the same input yields the same
//! messages in the same order.

use rolodex_types::api::{
    AddressBody, ContactBody, LoginUserRequest, RegisterUserRequest, SearchContactsQuery,
    UpdateUserRequest,
};

use crate::error::ApiError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

// -- Commands --

#[derive(Debug)]
pub struct RegisterUser {
    pub username: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginUser {
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct CreateContact {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug)]
pub struct UpdateContact {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug)]
pub struct SearchContacts {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub page: i64,
    pub size: i64,
}

#[derive(Debug)]
pub struct CreateAddress {
    pub contact_id: i64,
    pub street: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub postal_code: Option<String>,
}

/// Route identifiers for address get/remove, validated as a pair.
#[derive(Debug, Clone, Copy)]
pub struct AddressRef {
    pub id: i64,
    pub contact_id: i64,
}

#[derive(Debug)]
pub struct UpdateAddress {
    pub id: i64,
    pub contact_id: i64,
    pub street: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub postal_code: Option<String>,
}

// -- Validators --

pub fn register_user(body: RegisterUserRequest) -> Result<RegisterUser, ApiError> {
    let mut errors = Vec::new();

    let username = bounded(body.username, "Username", 5, 20, &mut errors);
    let name = bounded(body.name, "Name", 5, 20, &mut errors);
    let password = bounded(body.password, "Password", 6, 20, &mut errors);

    finish(
        errors,
        RegisterUser {
            username,
            name,
            password,
        },
    )
}

pub fn login_user(body: LoginUserRequest) -> Result<LoginUser, ApiError> {
    let mut errors = Vec::new();

    let username = bounded(body.username, "Username", 5, 20, &mut errors);
    let password = bounded(body.password, "Password", 6, 20, &mut errors);

    finish(errors, LoginUser { username, password })
}

pub fn update_user(body: UpdateUserRequest) -> Result<UpdateProfile, ApiError> {
    let mut errors = Vec::new();

    let name = optional_between(body.name, "Name", 5, 20, &mut errors);
    let password = optional_between(body.password, "Password", 6, 20, &mut errors);

    finish(errors, UpdateProfile { name, password })
}

pub fn create_contact(body: ContactBody) -> Result<CreateContact, ApiError> {
    let mut errors = Vec::new();

    let first_name = required_bounded(body.first_name, "First name", 100, &mut errors);
    let last_name = optional_bounded(body.last_name, "Last name", 100, &mut errors);
    let email = optional_email(body.email, &mut errors);
    let phone = optional_bounded(body.phone, "Phone", 20, &mut errors);

    finish(
        errors,
        CreateContact {
            first_name,
            last_name,
            email,
            phone,
        },
    )
}

pub fn update_contact(id: &str, body: ContactBody) -> Result<UpdateContact, ApiError> {
    let mut errors = Vec::new();

    let id = positive_id(id, "Id", &mut errors);
    let first_name = required_bounded(body.first_name, "First name", 100, &mut errors);
    let last_name = optional_bounded(body.last_name, "Last name", 100, &mut errors);
    let email = optional_email(body.email, &mut errors);
    let phone = optional_bounded(body.phone, "Phone", 20, &mut errors);

    finish(
        errors,
        UpdateContact {
            id,
            first_name,
            last_name,
            email,
            phone,
        },
    )
}

pub fn contact_ref(id: &str) -> Result<i64, ApiError> {
    let mut errors = Vec::new();
    let id = positive_id(id, "Id", &mut errors);
    finish(errors, id)
}

pub fn search_contacts(query: SearchContactsQuery) -> Result<SearchContacts, ApiError> {
    let mut errors = Vec::new();

    let name = optional_nonempty(query.name, "Name", &mut errors);
    let email = optional_email(query.email, &mut errors);
    let phone = optional_nonempty(query.phone, "Phone", &mut errors);
    let page = positive_int(query.page, DEFAULT_PAGE, "Page", &mut errors);
    let size = positive_int(query.size, DEFAULT_PAGE_SIZE, "Size", &mut errors);

    finish(
        errors,
        SearchContacts {
            name,
            email,
            phone,
            page,
            size,
        },
    )
}

pub fn create_address(contact_id: &str, body: AddressBody) -> Result<CreateAddress, ApiError> {
    let mut errors = Vec::new();

    let contact_id = positive_id(contact_id, "Contact id", &mut errors);
    let street = required_bounded(body.street, "Street", 255, &mut errors);
    let city = required_bounded(body.city, "City", 100, &mut errors);
    let province = required_bounded(body.province, "Province", 100, &mut errors);
    let country = required_bounded(body.country, "Country", 100, &mut errors);
    let postal_code = optional_bounded(body.postal_code, "Postal code", 10, &mut errors);

    finish(
        errors,
        CreateAddress {
            contact_id,
            street,
            city,
            province,
            country,
            postal_code,
        },
    )
}

/// The contact segment of an address route, validated on its own when no
/// address id is present.
pub fn owning_contact_ref(contact_id: &str) -> Result<i64, ApiError> {
    let mut errors = Vec::new();
    let contact_id = positive_id(contact_id, "Contact id", &mut errors);
    finish(errors, contact_id)
}

pub fn address_ref(id: &str, contact_id: &str) -> Result<AddressRef, ApiError> {
    let mut errors = Vec::new();

    let id = positive_id(id, "Id", &mut errors);
    let contact_id = positive_id(contact_id, "Contact id", &mut errors);

    finish(errors, AddressRef { id, contact_id })
}

pub fn update_address(
    id: &str,
    contact_id: &str,
    body: AddressBody,
) -> Result<UpdateAddress, ApiError> {
    let mut errors = Vec::new();

    let id = positive_id(id, "Id", &mut errors);
    let contact_id = positive_id(contact_id, "Contact id", &mut errors);
    let street = required_bounded(body.street, "Street", 255, &mut errors);
    let city = required_bounded(body.city, "City", 100, &mut errors);
    let province = required_bounded(body.province, "Province", 100, &mut errors);
    let country = required_bounded(body.country, "Country", 100, &mut errors);
    let postal_code = optional_bounded(body.postal_code, "Postal code", 10, &mut errors);

    finish(
        errors,
        UpdateAddress {
            id,
            contact_id,
            street,
            city,
            province,
            country,
            postal_code,
        },
    )
}

// -- Field helpers --

fn finish<T>(errors: Vec<String>, command: T) -> Result<T, ApiError> {
    if errors.is_empty() {
        Ok(command)
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Required field with only an upper length bound.
fn required_bounded(
    value: Option<String>,
    label: &str,
    max: usize,
    errors: &mut Vec<String>,
) -> String {
    let Some(v) = value else {
        errors.push(format!("{label} is required"));
        return String::new();
    };
    if v.is_empty() {
        errors.push(format!("{label} is required"));
    } else if v.chars().count() > max {
        errors.push(format!("{label} must be at most {max} characters"));
    }
    v
}

/// Required field with both length bounds (the user schemas).
fn bounded(
    value: Option<String>,
    label: &str,
    min: usize,
    max: usize,
    errors: &mut Vec<String>,
) -> String {
    let Some(v) = value else {
        errors.push(format!("{label} is required"));
        return String::new();
    };
    if v.is_empty() {
        errors.push(format!("{label} is required"));
        return v;
    }
    let len = v.chars().count();
    if len < min || len > max {
        errors.push(format!(
            "{label} must be between {min} and {max} characters"
        ));
    }
    v
}

/// Optional field that, when present, must satisfy both length bounds.
fn optional_between(
    value: Option<String>,
    label: &str,
    min: usize,
    max: usize,
    errors: &mut Vec<String>,
) -> Option<String> {
    if let Some(v) = &value {
        let len = v.chars().count();
        if len < min || len > max {
            errors.push(format!(
                "{label} must be between {min} and {max} characters"
            ));
        }
    }
    value
}

/// Optional field that only has to fit under the cap when present. An empty
/// string is a legal stored value here, unlike the search filters.
fn optional_bounded(
    value: Option<String>,
    label: &str,
    max: usize,
    errors: &mut Vec<String>,
) -> Option<String> {
    if let Some(v) = &value {
        if v.chars().count() > max {
            errors.push(format!("{label} must be at most {max} characters"));
        }
    }
    value
}

/// Optional field that, when present, must be non-empty (search filters).
fn optional_nonempty(
    value: Option<String>,
    label: &str,
    errors: &mut Vec<String>,
) -> Option<String> {
    if let Some(v) = &value {
        if v.is_empty() {
            errors.push(format!("{label} must not be empty"));
        }
    }
    value
}

/// Optional field that, when present, must look like an email address.
fn optional_email(value: Option<String>, errors: &mut Vec<String>) -> Option<String> {
    if let Some(v) = &value {
        if !valid_email(v) {
            errors.push("Invalid email format".to_string());
        }
    }
    value
}

/// Minimal structural check: exactly one `@` with non-empty parts on both
/// sides, bounded total length. Deliverability is out of scope.
fn valid_email(value: &str) -> bool {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && value.chars().count() <= 254
        }
        _ => false,
    }
}

/// Path identifiers arrive as raw text. `0` stands in for an unparseable
/// id; `finish` discards the command in that case.
fn positive_id(raw: &str, label: &str, errors: &mut Vec<String>) -> i64 {
    match raw.parse::<i64>() {
        Ok(n) if n > 0 => n,
        _ => {
            errors.push(format!("{label} must be a positive integer"));
            0
        }
    }
}

/// Parse an optional numeric query parameter, falling back to the default
/// when absent.
fn positive_int(
    value: Option<String>,
    default: i64,
    label: &str,
    errors: &mut Vec<String>,
) -> i64 {
    match value {
        None => default,
        Some(raw) => match raw.parse::<i64>() {
            Ok(n) if n > 0 => n,
            _ => {
                errors.push(format!("{label} must be a positive integer"));
                default
            }
        },
    }
}
