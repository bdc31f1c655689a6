//! HTTP route handlers for the user service.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health          - Liveness check
//! GET    /health/ready    - Readiness check (pings the store)
//!
//! # Users
//! POST   /user            - Create a user from a JSON object
//! GET    /user/{id}       - Fetch a user by hex ID
//! DELETE /user/{id}       - Delete a user by hex ID
//! GET    /user/           - 400, empty ID (also DELETE)
//! ```

pub mod health;
pub mod users;

use axum::{Router, routing::get, routing::post};

use crate::state::AppState;

/// Create the user resource routes.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user", post(users::create))
        .route("/user/", get(users::missing_id).delete(users::missing_id))
        .route("/user/{id}", get(users::show).delete(users::delete))
}

/// Create all routes for the service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(user_routes())
}
