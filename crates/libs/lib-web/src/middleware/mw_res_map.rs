//! # Response Mapping Middleware
//!
//! Stamps every response with the site's security headers and logs
//! server-error responses.
//!
//! Headers applied to every response, including errors and the
//! fallback 404:
//!
//! - `X-Content-Type-Options: nosniff`
//! - `X-Frame-Options: DENY`
//! - `Referrer-Policy: strict-origin-when-cross-origin`

use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::error;

const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
];

/// Response mapping middleware.
///
/// Applies the security header set to every outgoing response.
pub async fn map_res(req: Request, next: Next) -> Response {
    let mut res = next.run(req).await;

    for (name, value) in SECURITY_HEADERS {
        res.headers_mut().insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    if res.status().is_server_error() {
        error!("[RESPONSE] Server error: {}", res.status());
    }

    res
}
