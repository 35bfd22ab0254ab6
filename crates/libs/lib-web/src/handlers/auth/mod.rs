//! # Authentication Handlers
//!
//! HTTP request handlers for the session authentication endpoints.
//!
//! ## Overview
//!
//! - User signup with email/password
//! - User login with email or username
//! - Logout by clearing the session cookie
//! - Current-visitor lookup (`me`)
//!
//! The signed session token travels only in the `auth` cookie; response
//! bodies never carry it. Unknown user and wrong password produce the
//! identical `401 Invalid credentials` response.

use crate::cookie::{clear_cookie, set_cookie};
use crate::middleware::MaybeUser;
use axum::{
    extract::{Json, State},
    http::{header::SET_COOKIE, HeaderName, StatusCode},
    response::AppendHeaders,
};
use lib_auth::{hash_pwd, pwd_needs_rehash, sign_token, validate_pwd};
use lib_core::model::store::user_repository::UserRepository;
use lib_core::{
    dto::{
        AuthResponse, ErrorResponse, LoginRequest, MeResponse, MessageResponse, SignupRequest,
        UserInfo,
    },
    Config, DbPool,
};
use lib_utils::validation::{validate_email, validate_min_length, validate_username};
use tracing::{debug, error, info, instrument, warn};

/// Response headers that install the session cookie.
type SessionHeaders = AppendHeaders<[(HeaderName, String); 1]>;

fn session_cookie_headers(token: &str, config: &Config) -> SessionHeaders {
    AppendHeaders([(
        SET_COOKIE,
        set_cookie(token, config.token_ttl_secs, config.cookie_secure()),
    )])
}

fn user_info(id: i64, username: String, email: String, created_at: String) -> UserInfo {
    UserInfo {
        id: id.to_string(),
        username,
        email,
        created_at,
    }
}

/// Signup handler - creates a new user account.
///
/// # Returns
///
/// * `Ok((StatusCode::CREATED, Set-Cookie, AuthResponse))` - Account created, session installed
/// * `Err((StatusCode, ErrorResponse))` - Validation error, duplicate user, or server error
///
/// # Validation
///
/// - Username must be 3-20 characters, alphanumeric or underscore
/// - Email must look like an email address
/// - Email and username must be unique
/// - Password must be at least 8 characters
#[instrument(skip_all, fields(username = %req.username, email = %req.email))]
pub async fn signup(
    State(pool): State<DbPool>,
    State(config): State<Config>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, SessionHeaders, Json<AuthResponse>), (StatusCode, Json<ErrorResponse>)> {
    info!("[SIGNUP] New user signup request");
    debug!("   Username: {}", req.username);
    debug!("   Email: {}", req.email);

    if let Err(e) = validate_username(&req.username) {
        warn!("[SIGNUP] Invalid username");
        return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e })));
    }

    if let Err(e) = validate_email(&req.email) {
        warn!("[SIGNUP] Invalid email format");
        return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e })));
    }

    if let Err(e) = validate_min_length(&req.password, 8, "Password") {
        warn!("[SIGNUP] Password too short");
        return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e })));
    }

    match UserRepository::find_by_email(&pool, &req.email).await {
        Ok(Some(_)) => {
            warn!("[SIGNUP] Email already registered: {}", req.email);
            return Err((
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: "Email already registered".to_string(),
                }),
            ));
        }
        Ok(None) => {}
        Err(e) => {
            error!("[SIGNUP] Database error checking email: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Database error".to_string(),
                }),
            ));
        }
    }

    match UserRepository::find_by_username(&pool, &req.username).await {
        Ok(Some(_)) => {
            warn!("[SIGNUP] Username already taken: {}", req.username);
            return Err((
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: "Username already taken".to_string(),
                }),
            ));
        }
        Ok(None) => {}
        Err(e) => {
            error!("[SIGNUP] Database error checking username: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Database error".to_string(),
                }),
            ));
        }
    }

    debug!("[SIGNUP] Hashing password...");
    let password_hash = match hash_pwd(&req.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("[SIGNUP] Password hashing failed: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Authentication error".to_string(),
                }),
            ));
        }
    };

    debug!("[SIGNUP] Creating user in database...");
    let user = match UserRepository::create(&pool, &req.username, &req.email, &password_hash).await
    {
        Ok(user) => user,
        Err(e) => {
            error!("[SIGNUP] Failed to create user: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create user".to_string(),
                }),
            ));
        }
    };

    debug!("[SIGNUP] Signing session token...");
    let token = match sign_token(
        user.id,
        &user.username,
        &config.session_secret,
        config.token_ttl_secs,
    ) {
        Ok(token) => token,
        Err(e) => {
            error!("[SIGNUP] Token signing failed: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create session".to_string(),
                }),
            ));
        }
    };

    info!("[SIGNUP] User created and session installed");
    info!("   User ID: {}", user.id);
    info!("   Username: {}", user.username);

    Ok((
        StatusCode::CREATED,
        session_cookie_headers(&token, &config),
        Json(AuthResponse {
            user: user_info(
                user.id,
                user.username.clone(),
                user.email,
                user.created_at.to_string(),
            ),
            message: "Signup successful".to_string(),
        }),
    ))
}

/// Login handler - authenticates an existing user.
///
/// # Returns
///
/// * `Ok((StatusCode::OK, Set-Cookie, AuthResponse))` - Session installed
/// * `Err((StatusCode, ErrorResponse))` - Invalid credentials, inactive account, or server error
///
/// # Authentication
///
/// - Accepts either email (contains '@') or username
/// - Validates the password against the stored credential record
/// - Unknown user and wrong password return the same 401 response
/// - Refreshes the credential record when it lags current hashing defaults
/// - Updates the last_login timestamp
pub async fn login(
    State(pool): State<DbPool>,
    State(config): State<Config>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, SessionHeaders, Json<AuthResponse>), (StatusCode, Json<ErrorResponse>)> {
    info!("[LOGIN] Login attempt");
    debug!("   Identifier: {}", req.email_or_username);

    let user = if req.email_or_username.contains('@') {
        debug!("[LOGIN] Looking up by email...");
        UserRepository::find_by_email(&pool, &req.email_or_username).await
    } else {
        debug!("[LOGIN] Looking up by username...");
        UserRepository::find_by_username(&pool, &req.email_or_username).await
    };

    let user = match user {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!("[LOGIN] User not found: {}", req.email_or_username);
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Invalid credentials".to_string(),
                }),
            ));
        }
        Err(e) => {
            error!("[LOGIN] Database error: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Database error".to_string(),
                }),
            ));
        }
    };

    if !user.is_active {
        warn!("[LOGIN] Account deactivated: {}", user.username);
        return Err((
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                error: "Account is deactivated".to_string(),
            }),
        ));
    }

    debug!("[LOGIN] Validating password...");
    if !validate_pwd(&req.password, &user.password_hash) {
        warn!("[LOGIN] Invalid password for user: {}", user.username);
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Invalid credentials".to_string(),
            }),
        ));
    }

    // The stored record may predate current hashing defaults. Refresh it
    // now while the cleartext password is available; failure here never
    // blocks the login.
    if pwd_needs_rehash(&user.password_hash) {
        debug!("[LOGIN] Refreshing stored credential record...");
        match hash_pwd(&req.password) {
            Ok(new_hash) => {
                if let Err(e) =
                    UserRepository::update_password_hash(&pool, user.id, &new_hash).await
                {
                    warn!("[LOGIN] Failed to store refreshed credential record: {}", e);
                }
            }
            Err(e) => {
                warn!("[LOGIN] Credential record refresh failed: {}", e);
            }
        }
    }

    debug!("[LOGIN] Updating last login timestamp...");
    let _ = UserRepository::update_last_login(&pool, user.id).await;

    debug!("[LOGIN] Signing session token...");
    let token = match sign_token(
        user.id,
        &user.username,
        &config.session_secret,
        config.token_ttl_secs,
    ) {
        Ok(token) => token,
        Err(e) => {
            error!("[LOGIN] Token signing failed: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create session".to_string(),
                }),
            ));
        }
    };

    info!("[LOGIN] User authenticated");
    info!("   User ID: {}", user.id);
    info!("   Username: {}", user.username);

    Ok((
        StatusCode::OK,
        session_cookie_headers(&token, &config),
        Json(AuthResponse {
            user: user_info(
                user.id,
                user.username.clone(),
                user.email,
                user.created_at.to_string(),
            ),
            message: "Login successful".to_string(),
        }),
    ))
}

/// Logout handler - clears the session cookie.
///
/// Stateless tokens cannot be revoked server-side; an unexpired token
/// remains valid until its expiry even after the cookie is cleared.
pub async fn logout(
    State(config): State<Config>,
) -> (StatusCode, SessionHeaders, Json<MessageResponse>) {
    info!("[LOGOUT] Clearing session cookie");

    (
        StatusCode::OK,
        AppendHeaders([(SET_COOKIE, clear_cookie(config.cookie_secure()))]),
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}

/// Current-visitor handler.
///
/// Always returns 200: `{user: {...}}` for an identified visitor,
/// `{user: null}` for anyone else, including sessions whose user row
/// has since been removed or deactivated.
pub async fn me(
    State(pool): State<DbPool>,
    MaybeUser(claims): MaybeUser,
) -> Result<(StatusCode, Json<MeResponse>), (StatusCode, Json<ErrorResponse>)> {
    let claims = match claims {
        Some(claims) => claims,
        None => {
            debug!("[ME] Anonymous visitor");
            return Ok((StatusCode::OK, Json(MeResponse { user: None })));
        }
    };

    let user = match UserRepository::find_by_id(&pool, claims.sub).await {
        Ok(user) => user,
        Err(e) => {
            error!("[ME] Database error: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Database error".to_string(),
                }),
            ));
        }
    };

    let user = match user {
        Some(user) if user.is_active => user,
        _ => {
            debug!("[ME] Valid session but no active user (id: {})", claims.sub);
            return Ok((StatusCode::OK, Json(MeResponse { user: None })));
        }
    };

    debug!("[ME] Identified user: {} (id: {})", user.username, user.id);

    Ok((
        StatusCode::OK,
        Json(MeResponse {
            user: Some(user_info(
                user.id,
                user.username.clone(),
                user.email,
                user.created_at.to_string(),
            )),
        }),
    ))
}

#[cfg(test)]
mod tests;
