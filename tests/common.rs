//! Common test utilities for Stores API integration tests
//!
//! This file contains shared functions for all integration tests: building
//! an application over a private in-memory database, sending requests, and
//! creating the stores, items and users most tests start from.

#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::sync::Arc;
use stores_api::{
    AppState,
    auth::{TokenManager, TokenSettings},
    create_app,
    db::init_pool,
};
use tower::Service;

/// Signing secret of every app built by [`create_test_app`]
pub const TEST_SECRET: &str = "integration-secret";

/// Creates a test application with its own in-memory SQLite database
///
/// Each call gets a uniquely named shared-cache database, so tests are
/// isolated from each other and every pooled connection sees the schema.
pub fn create_test_app() -> Router {
    let database_url = format!("file:integration_{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
    let pool = Arc::new(init_pool(&database_url).unwrap());

    let conn = &mut pool.get().unwrap();
    stores_api::run_migrations(conn).unwrap();

    let tokens = Arc::new(TokenManager::new(TokenSettings {
        secret: TEST_SECRET.to_string(),
        access_ttl: chrono::Duration::minutes(15),
        refresh_ttl: chrono::Duration::days(30),
        admin_identity: 1,
    }));

    create_app(AppState::new(pool, tokens))
}

/// Sends a request and returns the status with the parsed JSON body
///
/// A body that is not JSON comes back as `Value::Null`.
pub async fn send(
    app: &mut Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.call(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// Creates a store via the API and returns its ID
pub async fn create_store(app: &mut Router, name: &str) -> i64 {
    let (status, body) = send(app, "POST", "/store", None, Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().unwrap()
}

/// Creates a tag in a store via the API and returns its ID
pub async fn create_tag(app: &mut Router, store_id: i64, name: &str) -> i64 {
    let uri = format!("/store/{}/tag", store_id);
    let (status, body) = send(app, "POST", &uri, None, Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().unwrap()
}

/// Creates an item via the API (needs a fresh token) and returns its ID
pub async fn create_item(app: &mut Router, token: &str, store_id: i64, name: &str, price: f64) -> i64 {
    let payload = json!({ "name": name, "price": price, "store_id": store_id });
    let (status, body) = send(app, "POST", "/item", Some(token), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().unwrap()
}

/// Tokens returned by `/login`
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
}

/// Registers a user and logs them in
///
/// The first user registered on a fresh app gets ID 1, the admin identity.
pub async fn register_and_login(app: &mut Router, username: &str, password: &str) -> Session {
    let credentials = json!({ "username": username, "password": password });

    let (status, body) = send(app, "POST", "/register", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    login(app, username, password).await
}

/// Logs an existing user in
pub async fn login(app: &mut Router, username: &str, password: &str) -> Session {
    let credentials = json!({ "username": username, "password": password });
    let (status, body) = send(app, "POST", "/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    Session {
        access_token: body["access_token"].as_str().unwrap().to_string(),
        refresh_token: body["refresh_token"].as_str().unwrap().to_string(),
    }
}
