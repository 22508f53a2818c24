mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{app, create_address, create_contact, register_and_login, send};

fn home() -> serde_json::Value {
    json!({
        "street": "Jalan Mawar 1",
        "city": "Jakarta",
        "province": "DKI Jakarta",
        "country": "Indonesia",
        "postal_code": "12345",
    })
}

#[tokio::test]
async fn create_answers_created_with_the_stored_address() {
    let app = app();
    let token = register_and_login(&app, "johndoe").await;
    let contact = create_contact(&app, &token, json!({ "first_name": "John" })).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/contacts/{contact}/addresses"),
        Some(&token),
        Some(home()),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["id"].as_i64().is_some_and(|id| id >= 1));
    assert_eq!(body["data"]["street"], "Jalan Mawar 1");
    assert_eq!(body["data"]["city"], "Jakarta");
    assert_eq!(body["data"]["province"], "DKI Jakarta");
    assert_eq!(body["data"]["country"], "Indonesia");
    assert_eq!(body["data"]["postal_code"], "12345");
}

#[tokio::test]
async fn postal_code_may_be_omitted() {
    let app = app();
    let token = register_and_login(&app, "johndoe").await;
    let contact = create_contact(&app, &token, json!({ "first_name": "John" })).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/contacts/{contact}/addresses"),
        Some(&token),
        Some(json!({
            "street": "Jalan Mawar 1",
            "city": "Jakarta",
            "province": "DKI Jakarta",
            "country": "Indonesia",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["postal_code"].is_null());
}

#[tokio::test]
async fn empty_postal_code_is_kept() {
    let app = app();
    let token = register_and_login(&app, "johndoe").await;
    let contact = create_contact(&app, &token, json!({ "first_name": "John" })).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/contacts/{contact}/addresses"),
        Some(&token),
        Some(json!({
            "street": "Jalan Mawar 1",
            "city": "Jakarta",
            "province": "DKI Jakarta",
            "country": "Indonesia",
            "postal_code": "",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["postal_code"], "");

    let id = body["data"]["id"].as_i64().unwrap();
    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/contacts/{contact}/addresses/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["data"]["postal_code"], "");
}

#[tokio::test]
async fn create_collects_validation_failures() {
    let app = app();
    let token = register_and_login(&app, "johndoe").await;
    let contact = create_contact(&app, &token, json!({ "first_name": "John" })).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/contacts/{contact}/addresses"),
        Some(&token),
        Some(json!({ "street": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        json!([
            "Street is required",
            "City is required",
            "Province is required",
            "Country is required",
        ])
    );
}

#[tokio::test]
async fn create_under_an_unknown_contact_is_not_found() {
    let app = app();
    let token = register_and_login(&app, "johndoe").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/contacts/9999/addresses",
        Some(&token),
        Some(home()),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["errors"],
        json!("Contact with id 9999 not found for user johndoe")
    );
}

#[tokio::test]
async fn create_under_another_users_contact_is_not_found() {
    let app = app();
    let alice = register_and_login(&app, "alice77").await;
    let bobby = register_and_login(&app, "bobby77").await;
    let contact = create_contact(&app, &alice, json!({ "first_name": "John" })).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/contacts/{contact}/addresses"),
        Some(&bobby),
        Some(home()),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["errors"],
        json!(format!("Contact with id {contact} not found for user bobby77"))
    );
}

#[tokio::test]
async fn get_returns_the_address() {
    let app = app();
    let token = register_and_login(&app, "johndoe").await;
    let contact = create_contact(&app, &token, json!({ "first_name": "John" })).await;
    let id = create_address(&app, &token, contact, home()).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/contacts/{contact}/addresses/{id}"),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["street"], "Jalan Mawar 1");
}

#[tokio::test]
async fn get_unknown_address_is_not_found() {
    let app = app();
    let token = register_and_login(&app, "johndoe").await;
    let contact = create_contact(&app, &token, json!({ "first_name": "John" })).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/contacts/{contact}/addresses/9999"),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["errors"],
        json!(format!("Address with id 9999 not found for contact {contact}"))
    );
}

#[tokio::test]
async fn address_is_only_reachable_through_its_own_contact() {
    let app = app();
    let token = register_and_login(&app, "johndoe").await;
    let first = create_contact(&app, &token, json!({ "first_name": "John" })).await;
    let second = create_contact(&app, &token, json!({ "first_name": "Jane" })).await;
    let id = create_address(&app, &token, first, home()).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/contacts/{second}/addresses/{id}"),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["errors"],
        json!(format!("Address with id {id} not found for contact {second}"))
    );
}

#[tokio::test]
async fn addresses_under_a_foreign_contact_report_the_contact_missing() {
    let app = app();
    let alice = register_and_login(&app, "alice77").await;
    let bobby = register_and_login(&app, "bobby77").await;
    let contact = create_contact(&app, &alice, json!({ "first_name": "John" })).await;
    let id = create_address(&app, &alice, contact, home()).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/contacts/{contact}/addresses/{id}"),
        Some(&bobby),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["errors"],
        json!(format!("Contact with id {contact} not found for user bobby77"))
    );
}

#[tokio::test]
async fn update_answers_created_with_the_new_fields() {
    let app = app();
    let token = register_and_login(&app, "johndoe").await;
    let contact = create_contact(&app, &token, json!({ "first_name": "John" })).await;
    let id = create_address(&app, &token, contact, home()).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/contacts/{contact}/addresses/{id}"),
        Some(&token),
        Some(json!({
            "street": "Jalan Melati 9",
            "city": "Bandung",
            "province": "Jawa Barat",
            "country": "Indonesia",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["street"], "Jalan Melati 9");
    assert!(body["data"]["postal_code"].is_null());

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/contacts/{contact}/addresses/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["data"]["city"], "Bandung");
    assert!(body["data"]["postal_code"].is_null());
}

#[tokio::test]
async fn update_unknown_address_is_not_found() {
    let app = app();
    let token = register_and_login(&app, "johndoe").await;
    let contact = create_contact(&app, &token, json!({ "first_name": "John" })).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/contacts/{contact}/addresses/9999"),
        Some(&token),
        Some(home()),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["errors"],
        json!(format!("Address with id 9999 not found for contact {contact}"))
    );
}

#[tokio::test]
async fn delete_answers_success_and_removes_the_row() {
    let app = app();
    let token = register_and_login(&app, "johndoe").await;
    let contact = create_contact(&app, &token, json!({ "first_name": "John" })).await;
    let id = create_address(&app, &token, contact, home()).await;

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/contacts/{contact}/addresses/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!("Success"));

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/contacts/{contact}/addresses/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_returns_the_contacts_addresses_in_order() {
    let app = app();
    let token = register_and_login(&app, "johndoe").await;
    let first = create_contact(&app, &token, json!({ "first_name": "John" })).await;
    let second = create_contact(&app, &token, json!({ "first_name": "Jane" })).await;
    let a = create_address(&app, &token, first, home()).await;
    let b = create_address(
        &app,
        &token,
        first,
        json!({
            "street": "Jalan Melati 9",
            "city": "Bandung",
            "province": "Jawa Barat",
            "country": "Indonesia",
        }),
    )
    .await;
    create_address(&app, &token, second, home()).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/contacts/{first}/addresses"),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, [a, b]);
}

#[tokio::test]
async fn list_under_an_unknown_contact_is_not_found() {
    let app = app();
    let token = register_and_login(&app, "johndoe").await;

    let (status, body) = send(&app, "GET", "/api/contacts/9999/addresses", Some(&token), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["errors"],
        json!("Contact with id 9999 not found for user johndoe")
    );
}

#[tokio::test]
async fn non_numeric_path_ids_are_rejected() {
    let app = app();
    let token = register_and_login(&app, "johndoe").await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/contacts/abc/addresses",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["Contact id must be a positive integer"]));

    let (status, body) = send(
        &app,
        "GET",
        "/api/contacts/abc/addresses/xyz",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        json!([
            "Id must be a positive integer",
            "Contact id must be a positive integer",
        ])
    );
}

#[tokio::test]
async fn deleting_the_contact_takes_its_addresses_with_it() {
    let app = app();
    let token = register_and_login(&app, "johndoe").await;
    let contact = create_contact(&app, &token, json!({ "first_name": "John" })).await;
    let id = create_address(&app, &token, contact, home()).await;

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/contacts/{contact}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!("Success"));

    // The chain breaks at the contact, so the contact is what gets reported.
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/contacts/{contact}/addresses/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["errors"],
        json!(format!("Contact with id {contact} not found for user johndoe"))
    );
}

#[tokio::test]
async fn contact_and_address_round_trip() {
    let app = app();
    let token = register_and_login(&app, "johndoe").await;

    let contact = create_contact(
        &app,
        &token,
        json!({ "first_name": "John", "last_name": "Doe" }),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/contacts?name=Jo", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], contact);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/contacts/{contact}/addresses"),
        Some(&token),
        Some(json!({ "street": "", "city": "Jakarta", "province": "DKI Jakarta", "country": "Indonesia" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["Street is required"]));

    let id = create_address(&app, &token, contact, home()).await;

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/contacts/{contact}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/contacts/{contact}/addresses/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["errors"],
        json!(format!("Contact with id {contact} not found for user johndoe"))
    );
}
