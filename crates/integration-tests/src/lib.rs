//! Integration tests for the user service.
//!
//! # Running Tests
//!
//! ```bash
//! # Start MongoDB and the server
//! docker run -d -p 27017:27017 mongo:7
//! USER_SERVICE_DATABASE_URL=mongodb://localhost:27017 cargo run -p user-service-server
//!
//! # Run integration tests
//! cargo test -p user-service-integration-tests -- --ignored
//! ```
//!
//! Set `USER_SERVICE_BASE_URL` to target a server other than
//! `http://localhost:8080`.

use reqwest::Client;
use serde_json::Value;

use user_service_core::UserId;

/// Base URL for the user API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("USER_SERVICE_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// Create a plain HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// Create a user and return the response body.
///
/// # Panics
///
/// Panics if the request fails or the server does not answer `201`.
pub async fn create_user(client: &Client, body: &Value) -> Value {
    let resp = client
        .post(format!("{}/user", base_url()))
        .json(body)
        .send()
        .await
        .expect("Failed to create user");

    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    resp.json().await.expect("Failed to parse created user")
}

/// Extract and validate the `id` of a user body.
///
/// # Panics
///
/// Panics if the body has no well-formed `id`.
#[must_use]
pub fn user_id(body: &Value) -> UserId {
    let id = body["id"].as_str().expect("user body has no id");
    UserId::parse(id).expect("user id is not a valid identifier")
}
