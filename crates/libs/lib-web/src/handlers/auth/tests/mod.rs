//! # Auth Handler Tests
//!
//! Test suite for the session authentication handlers.

mod login;

use super::*;
use crate::server::AppState;
use axum::body::Body;
use axum::http::Request;
use axum::routing::{get, post};
use axum::Router;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

/// Setup test database with schema
pub async fn setup_test_db() -> DbPool {
    let pool = SqlitePoolOptions::new()
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            last_login TIMESTAMP,
            is_active BOOLEAN NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(&pool)
    .await
    .expect("Failed to create users table");

    pool
}

/// Create test config
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        session_secret: "test-secret-key-must-be-at-least-32-characters-long!".to_string(),
        token_ttl_secs: 3600,
        app_origin: "http://localhost:3000".to_string(),
    }
}

/// Create test app with the auth routes
pub fn test_app(pool: DbPool, config: Config) -> Router {
    let state = AppState {
        db: pool,
        config,
    };

    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .with_state(state)
}

/// Build a JSON POST request
pub fn json_post<T: serde::Serialize>(uri: &str, body: &T) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// Extract the `auth=<token>` pair from a response's `Set-Cookie` header,
/// in the form a browser would send it back in a `Cookie` header.
pub fn session_cookie(response: &axum::response::Response) -> Option<String> {
    let header = response
        .headers()
        .get(axum::http::header::SET_COOKIE)?
        .to_str()
        .ok()?;
    header.split(';').next().map(|pair| pair.to_string())
}
