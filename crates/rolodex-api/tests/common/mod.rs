#![allow(dead_code)] // each test binary uses its own subset of these helpers

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use rolodex_api::{AppStateInner, routes};
use rolodex_db::Database;

/// A fresh app over an empty in-memory database.
pub fn app() -> Router {
    let db = Database::open_in_memory().expect("open in-memory database");
    routes::router(Arc::new(AppStateInner { db }))
}

/// Drive one request through the router and decode the JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("X-API-TOKEN", token);
    }

    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/users/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

/// Register `username` with a fixed password and log in, returning the
/// session token.
pub async fn register_and_login(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/users",
        None,
        Some(json!({
            "username": username,
            "name": "Test Person",
            "password": "secret123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {body}");

    login(app, username, "secret123").await
}

/// Create a contact and return its id.
pub async fn create_contact(app: &Router, token: &str, body: Value) -> i64 {
    let (status, body) = send(app, "POST", "/api/contacts", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::OK, "create contact failed: {body}");
    body["data"]["id"].as_i64().unwrap()
}

/// Create an address under a contact and return its id.
pub async fn create_address(app: &Router, token: &str, contact_id: i64, body: Value) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        &format!("/api/contacts/{contact_id}/addresses"),
        Some(token),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create address failed: {body}");
    body["data"]["id"].as_i64().unwrap()
}
