//! # Authentication Data Transfer Objects
//!
//! Defines request and response structures for authentication endpoints.
//!
//! ## Endpoints Using These DTOs
//!
//! - `POST /api/auth/signup` - [`SignupRequest`] -> [`AuthResponse`]
//! - `POST /api/auth/login` - [`LoginRequest`] -> [`AuthResponse`]
//! - `POST /api/auth/logout` - [`MessageResponse`]
//! - `GET /api/auth/me` - [`MeResponse`]
//!
//! ## Wire Format
//!
//! All DTOs use **snake_case** field names in JSON (default serde behavior).
//! The session token travels in the `auth` cookie, never in a response body.

use serde::{Deserialize, Serialize};

/// Signup request for new user registration.
///
/// # Validation Rules (Server-Side)
///
/// - Username must be 3-20 characters, alphanumeric or underscore
/// - Email must be valid format and not already registered
/// - Password must be at least 8 characters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login request with email or username.
///
/// `email_or_username` may be either an email address (contains '@') or a
/// username. Lookup dispatches on that distinction server-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub email_or_username: String,
    pub password: String,
}

/// Authentication response returned on successful login or signup.
///
/// The session token itself is delivered in the `Set-Cookie` header, not in
/// this body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    pub user: UserInfo,
    pub message: String,
}

/// User information (public, safe to send to client).
///
/// Never includes password hashes or the session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

/// Response for `GET /api/auth/me`.
///
/// `user` is `null` for anonymous visitors; the endpoint answers 200 either
/// way so the frontend can render both states from one call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MeResponse {
    pub user: Option<UserInfo>,
}

/// Plain confirmation message (logout).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

/// Standard error response for all API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}
