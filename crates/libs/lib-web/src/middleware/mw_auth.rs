//! # Authentication Middleware
//!
//! Axum middleware and extractors for session token validation.
//!
//! Identification reads the session cookie, validates the signed token,
//! and makes the claims available to handlers. Every failure mode
//! (missing cookie, bad signature, expired token, malformed token)
//! collapses to "not identified"; callers cannot distinguish them.
//!
//! ## Usage
//!
//! Protected routes layer `require_auth` and read `Extension<TokenClaims>`,
//! or take the `CurrentUser` extractor directly. Routes that serve both
//! identified and anonymous visitors take `MaybeUser`.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header::COOKIE, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use lib_auth::{validate_token, TokenClaims};
use lib_core::{AppError, Config};
use tracing::{debug, warn};

use crate::cookie::extract_token;

/// Identify the requester from the `Cookie` header.
///
/// Returns `None` when no session cookie is present or the token does
/// not validate against the secret.
pub fn identify(headers: &HeaderMap, secret: &str) -> Option<TokenClaims> {
    let cookie_header = headers.get(COOKIE)?.to_str().ok()?;
    let token = extract_token(cookie_header)?;
    validate_token(&token, secret)
}

/// Authentication middleware that requires a valid session.
///
/// Validates the session cookie and injects `TokenClaims` into request
/// extensions for use by handlers.
///
/// # Behavior
///
/// - **Valid session**: continues to next middleware/handler with claims in extensions
/// - **No valid session**: returns `401 Unauthorized`
pub async fn require_auth(
    State(config): State<Config>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = identify(req.headers(), &config.session_secret).ok_or_else(|| {
        warn!("[AUTH] Request to protected route without valid session");
        AppError::Unauthorized("Authentication required".to_string())
    })?;

    debug!("[AUTH] Authenticated user: {} (id: {})", claims.username, claims.sub);

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Extractor for routes that require an authenticated user.
///
/// Rejects with `401 Unauthorized` when the request carries no valid
/// session cookie.
pub struct CurrentUser(pub TokenClaims);

impl<S> FromRequestParts<S> for CurrentUser
where
    Config: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Config::from_ref(state);
        identify(&parts.headers, &config.session_secret)
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

/// Extractor for routes that serve both identified and anonymous visitors.
///
/// Never rejects. `MaybeUser(None)` covers every non-identified case.
pub struct MaybeUser(pub Option<TokenClaims>);

impl<S> FromRequestParts<S> for MaybeUser
where
    Config: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Config::from_ref(state);
        Ok(MaybeUser(identify(&parts.headers, &config.session_secret)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use lib_auth::sign_token;

    const SECRET: &str = "test-secret-key-must-be-at-least-32-characters!";

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_identify_valid_session() {
        let token = sign_token(42, "alice", SECRET, 3600).unwrap();
        let headers = headers_with_cookie(&format!("auth={}", token));

        let claims = identify(&headers, SECRET).expect("Session should identify");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn test_identify_no_cookie_header() {
        let headers = HeaderMap::new();
        assert!(identify(&headers, SECRET).is_none());
    }

    #[test]
    fn test_identify_other_cookies_only() {
        let headers = headers_with_cookie("theme=dark; lang=en");
        assert!(identify(&headers, SECRET).is_none());
    }

    #[test]
    fn test_identify_wrong_secret() {
        let token = sign_token(42, "alice", SECRET, 3600).unwrap();
        let headers = headers_with_cookie(&format!("auth={}", token));

        assert!(identify(&headers, "another-secret-also-32-characters-long!!").is_none());
    }

    #[test]
    fn test_identify_garbage_token() {
        let headers = headers_with_cookie("auth=not-a-real-token");
        assert!(identify(&headers, SECRET).is_none());
    }
}
