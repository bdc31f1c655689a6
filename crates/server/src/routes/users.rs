//! User resource handlers.
//!
//! Each handler follows the same shape: extract inputs, validate, delegate to
//! the store, map the result to a response. Store errors become HTTP statuses
//! through [`AppError`](crate::error::AppError).

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use user_service_core::{User, UserFields, UserId, UserIdError};

use crate::error::Result;
use crate::state::AppState;

/// Fetch a user by ID.
///
/// `GET /user/{id}` responds `200` with the user as JSON.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<User>> {
    let id = UserId::parse(&id)?;
    let user = state.users().find_by_id(id).await?;
    Ok(Json(user))
}

/// Create a user from a JSON object.
///
/// `POST /user` responds `201` with the stored user, including the assigned
/// ID. The body must be a JSON object; `Content-Type` is not inspected.
#[instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn create(State(state): State<AppState>, body: Bytes) -> Result<(StatusCode, Json<User>)> {
    let fields = UserFields::from_json_slice(&body)?;
    let user = state.users().insert(fields).await?;

    tracing::info!(user_id = %user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Delete a user by ID.
///
/// `DELETE /user/{id}` responds `200` with a plain-text confirmation.
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<String> {
    let id = UserId::parse(&id)?;
    state.users().delete_by_id(id).await?;

    tracing::info!(user_id = %id, "User deleted");
    Ok(format!("Deleted user {id}"))
}

/// Reject `GET` or `DELETE /user/` with an empty ID.
pub async fn missing_id() -> Result<String> {
    Err(UserIdError::WrongLength {
        expected: UserId::HEX_LENGTH,
        len: 0,
    }
    .into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header};
    use serde_json::{Value, json};

    use super::*;
    use crate::db::MemoryUserStore;
    use crate::middleware::REQUEST_ID_HEADER;
    use crate::routes::test_support::{app_with, body_text, send};

    const MISSING_ID: &str = "65a1f0c2e4b0a1b2c3d4e5f6";

    const MALFORMED_IDS: &[&str] = &[
        "not-a-hex-id",
        "123",
        "65a1f0c2e4b0a1b2c3d4e5fz",
        "65a1f0c2e4b0a1b2c3d4e5f6aa",
    ];

    fn post_user(body: &str) -> Request<Body> {
        Request::post("/user")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn get_user(id: &str) -> Request<Body> {
        Request::get(format!("/user/{id}"))
            .body(Body::empty())
            .unwrap()
    }

    fn delete_user(id: &str) -> Request<Body> {
        Request::delete(format!("/user/{id}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_returns_created_with_id() {
        let app = app_with(MemoryUserStore::new());
        let response = send(&app, post_user(r#"{"name":"Ada"}"#)).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["name"], "Ada");
        let id = body["id"].as_str().unwrap();
        assert!(UserId::parse(id).is_ok());
    }

    #[tokio::test]
    async fn test_create_get_delete_get() {
        let app = app_with(MemoryUserStore::new());

        let response = send(&app, post_user(r#"{"name":"Ada"}"#)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_text(response).await;
        let id = serde_json::from_str::<Value>(&created).unwrap()["id"]
            .as_str()
            .unwrap()
            .to_owned();

        let response = send(&app, get_user(&id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, created);

        let response = send(&app, delete_user(&id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/plain")
        );
        assert_eq!(body_text(response).await, format!("Deleted user {id}"));

        let response = send(&app, get_user(&id)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_fields() {
        let app = app_with(MemoryUserStore::new());
        let input = json!({
            "name": "Ada",
            "age": 36,
            "languages": ["en", "fr"],
            "address": {"city": "London"}
        });

        let response = send(&app, post_user(&input.to_string())).await;
        let created: Value = serde_json::from_str(&body_text(response).await).unwrap();
        let id = created["id"].as_str().unwrap();

        let response = send(&app, get_user(id)).await;
        let mut fetched: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(fetched["id"], created["id"]);

        fetched.as_object_mut().unwrap().remove("id");
        assert_eq!(fetched, input);
    }

    #[tokio::test]
    async fn test_create_replaces_client_id() {
        let app = app_with(MemoryUserStore::new());
        let response = send(
            &app,
            post_user(&format!(r#"{{"id":"{MISSING_ID}","name":"Ada"}}"#)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_ne!(body["id"], MISSING_ID);

        let response = send(&app, get_user(MISSING_ID)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_ignores_content_type() {
        let app = app_with(MemoryUserStore::new());
        let request = Request::post("/user")
            .body(Body::from(r#"{"name":"Ada"}"#))
            .unwrap();

        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_body() {
        let store = MemoryUserStore::new();
        let app = app_with(store);

        for body in [r#"{"name":"#, "", "[1,2]", "\"Ada\"", "null"] {
            let response = send(&app, post_user(body)).await;
            assert_eq!(
                response.status(),
                StatusCode::BAD_REQUEST,
                "body {body:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_create_accepts_empty_object() {
        let app = app_with(MemoryUserStore::new());
        let response = send(&app, post_user("{}")).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body.as_object().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let app = app_with(MemoryUserStore::new());
        let response = send(&app, get_user(MISSING_ID)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "User not found");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let app = app_with(MemoryUserStore::new());
        let response = send(&app, delete_user(MISSING_ID)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_ids_are_bad_request() {
        let app = app_with(MemoryUserStore::new());

        for id in MALFORMED_IDS {
            let response = send(&app, get_user(id)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "GET {id}");
            assert_eq!(body_text(response).await, "Invalid ID");

            let response = send(&app, delete_user(id)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "DELETE {id}");
        }
    }

    #[tokio::test]
    async fn test_empty_id_is_bad_request() {
        let app = app_with(MemoryUserStore::new());

        let response = send(&app, get_user("")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Invalid ID");

        let response = send(&app, delete_user("")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_id_checked_before_store() {
        // An unreachable store must not turn a bad ID into a 503
        let app = app_with(MemoryUserStore::unavailable());
        let response = send(&app, get_user("not-a-hex-id")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unavailable_store_is_service_unavailable() {
        let app = app_with(MemoryUserStore::unavailable());

        let response = send(&app, get_user(MISSING_ID)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = send(&app, post_user(r#"{"name":"Ada"}"#)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = send(&app, delete_user(MISSING_ID)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_text(response).await, "Service unavailable");
    }

    #[tokio::test]
    async fn test_request_id_header() {
        let app = app_with(MemoryUserStore::new());

        let response = send(&app, get_user(MISSING_ID)).await;
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let request = Request::get(format!("/user/{MISSING_ID}"))
            .header(REQUEST_ID_HEADER, "upstream-123")
            .body(Body::empty())
            .unwrap();
        let response = send(&app, request).await;
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "upstream-123");
    }
}
