//! # Login Tests
//!
//! Tests for user login, uniform credential failures, and credential
//! record migration.

use super::*;
use axum::http::StatusCode;
use lib_auth::pwd_needs_rehash;
use lib_utils::b64::b64u_encode;

/// Build a valid credential record at the iteration floor, below the
/// current default, so it validates but is due for a refresh.
fn stale_record(password: &str) -> String {
    use pbkdf2::pbkdf2_hmac;
    use sha2::Sha256;

    let iterations = 100_000u32;
    let salt = [7u8; 16];
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut key);

    format!("pbkdf2${}${}${}", iterations, b64u_encode(salt), b64u_encode(key))
}

#[tokio::test]
async fn test_login_success_with_email() {
    // Arrange
    let pool = setup_test_db().await;

    let password = "CorrectHorse9!";
    let password_hash = hash_pwd(password).expect("Password hashing should succeed in test");
    UserRepository::create(&pool, "alice", "alice@example.com", &password_hash)
        .await
        .expect("User creation should succeed in test");

    let app = test_app(pool, test_config());

    let login_req = LoginRequest {
        email_or_username: "alice@example.com".to_string(),
        password: password.to_string(),
    };

    // Act
    let response = app
        .oneshot(json_post("/api/auth/login", &login_req))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = session_cookie(&response).expect("Login should set session cookie");
    assert!(cookie.starts_with("auth="));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let auth_response: AuthResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(auth_response.user.username, "alice");
    assert_eq!(auth_response.user.email, "alice@example.com");
    assert_eq!(auth_response.message, "Login successful");
}

#[tokio::test]
async fn test_login_success_with_username() {
    // Arrange
    let pool = setup_test_db().await;

    let password = "CorrectHorse9!";
    let password_hash = hash_pwd(password).expect("Password hashing should succeed in test");
    UserRepository::create(&pool, "alice", "alice@example.com", &password_hash)
        .await
        .expect("User creation should succeed in test");

    let app = test_app(pool, test_config());

    let login_req = LoginRequest {
        email_or_username: "alice".to_string(),
        password: password.to_string(),
    };

    // Act
    let response = app
        .oneshot(json_post("/api/auth/login", &login_req))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let auth_response: AuthResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(auth_response.user.username, "alice");
    assert_eq!(auth_response.message, "Login successful");
}

#[tokio::test]
async fn test_login_user_not_found() {
    // Arrange
    let pool = setup_test_db().await;
    let app = test_app(pool, test_config());

    let login_req = LoginRequest {
        email_or_username: "nobody@example.com".to_string(),
        password: "CorrectHorse9!".to_string(),
    };

    // Act
    let response = app
        .oneshot(json_post("/api/auth/login", &login_req))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(error_response.error, "Invalid credentials");
}

#[tokio::test]
async fn test_login_wrong_password() {
    // Arrange
    let pool = setup_test_db().await;

    let password_hash = hash_pwd("CorrectHorse9!").expect("Password hashing should succeed in test");
    UserRepository::create(&pool, "alice", "alice@example.com", &password_hash)
        .await
        .expect("User creation should succeed in test");

    let app = test_app(pool, test_config());

    let login_req = LoginRequest {
        email_or_username: "alice@example.com".to_string(),
        password: "WrongHorse9!".to_string(),
    };

    // Act
    let response = app
        .oneshot(json_post("/api/auth/login", &login_req))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(error_response.error, "Invalid credentials");
}

#[tokio::test]
async fn test_login_unknown_user_and_wrong_password_indistinguishable() {
    // Arrange
    let pool = setup_test_db().await;

    let password_hash = hash_pwd("CorrectHorse9!").unwrap();
    UserRepository::create(&pool, "alice", "alice@example.com", &password_hash)
        .await
        .unwrap();

    let wrong_password = app_response(
        test_app(pool.clone(), test_config()),
        LoginRequest {
            email_or_username: "alice@example.com".to_string(),
            password: "WrongHorse9!".to_string(),
        },
    )
    .await;

    let unknown_user = app_response(
        test_app(pool, test_config()),
        LoginRequest {
            email_or_username: "nobody@example.com".to_string(),
            password: "WrongHorse9!".to_string(),
        },
    )
    .await;

    // Assert: status and body identical for both failure modes
    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.0, unknown_user.0);
    assert_eq!(wrong_password.1, unknown_user.1);
}

async fn app_response(app: axum::Router, login_req: LoginRequest) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(json_post("/api/auth/login", &login_req))
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_login_inactive_account() {
    // Arrange
    let pool = setup_test_db().await;

    let password = "CorrectHorse9!";
    let password_hash = hash_pwd(password).unwrap();
    let user = UserRepository::create(&pool, "alice", "alice@example.com", &password_hash)
        .await
        .unwrap();

    sqlx::query("UPDATE users SET is_active = 0 WHERE id = ?")
        .bind(user.id)
        .execute(&pool)
        .await
        .expect("User deactivation should succeed in test");

    let app = test_app(pool, test_config());

    let login_req = LoginRequest {
        email_or_username: "alice@example.com".to_string(),
        password: password.to_string(),
    };

    // Act
    let response = app
        .oneshot(json_post("/api/auth/login", &login_req))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(error_response.error, "Account is deactivated");
}

#[tokio::test]
async fn test_login_updates_last_login() {
    // Arrange
    let pool = setup_test_db().await;

    let password = "CorrectHorse9!";
    let password_hash = hash_pwd(password).unwrap();
    let user = UserRepository::create(&pool, "alice", "alice@example.com", &password_hash)
        .await
        .unwrap();
    assert!(user.last_login.is_none());

    let app = test_app(pool.clone(), test_config());

    let login_req = LoginRequest {
        email_or_username: "alice@example.com".to_string(),
        password: password.to_string(),
    };

    // Act
    let response = app
        .oneshot(json_post("/api/auth/login", &login_req))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);

    let updated_user = UserRepository::find_by_email(&pool, "alice@example.com")
        .await
        .expect("User lookup should succeed in test")
        .expect("User should exist after creation");

    assert!(updated_user.last_login.is_some());
}

#[tokio::test]
async fn test_login_refreshes_stale_credential_record() {
    // Arrange: record at the iteration floor, below the current default
    let pool = setup_test_db().await;

    let password = "CorrectHorse9!";
    let old_record = stale_record(password);
    assert!(pwd_needs_rehash(&old_record));

    let user = UserRepository::create(&pool, "alice", "alice@example.com", &old_record)
        .await
        .unwrap();

    let app = test_app(pool.clone(), test_config());

    let login_req = LoginRequest {
        email_or_username: "alice@example.com".to_string(),
        password: password.to_string(),
    };

    // Act
    let response = app
        .oneshot(json_post("/api/auth/login", &login_req))
        .await
        .unwrap();

    // Assert: login succeeds and the stored record is replaced
    assert_eq!(response.status(), StatusCode::OK);

    let reloaded = UserRepository::find_by_id(&pool, user.id)
        .await
        .unwrap()
        .expect("User should exist");

    assert_ne!(reloaded.password_hash, old_record);
    assert!(!pwd_needs_rehash(&reloaded.password_hash));
    assert!(validate_pwd(password, &reloaded.password_hash));
}
