//! # Session Tokens
//!
//! Stateless, signed, expiring session tokens.
//!
//! A token is three base64url segments joined by dots:
//!
//! ```text
//! b64u(json(header)) . b64u(json(claims)) . b64u(hmac_sha256(secret, first_two))
//! ```
//!
//! The signer always stamps `iat` and `exp` itself; callers choose only the
//! lifetime. Validation collapses every failure (bad signature, expiry,
//! malformed input) into `None`, so callers cannot distinguish why a token
//! was rejected.

use hmac::{Hmac, Mac};
use lib_utils::b64::{b64u_decode, b64u_encode};
use lib_utils::time::now_utc_secs;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Verified claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (numeric user id)
    pub sub: i64,
    /// Username at issuance time
    pub username: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

#[derive(Serialize)]
struct TokenHeader {
    alg: &'static str,
    typ: &'static str,
}

/// Errors raised while signing a token.
///
/// Validation never returns these; a token that cannot be validated is
/// simply absent.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to serialize token segments")]
    Serialize,
    #[error("invalid signing key")]
    InvalidKey,
}

/// Sign a new session token for a user.
///
/// `iat` is stamped with the current time and `exp` with `now + ttl_secs`.
pub fn sign_token(
    user_id: i64,
    username: &str,
    secret: &str,
    ttl_secs: i64,
) -> Result<String, TokenError> {
    sign_token_at(user_id, username, secret, ttl_secs, now_utc_secs())
}

/// Validate a session token, returning its claims when trustworthy.
///
/// Returns `None` for anything else: wrong segment count, undecodable
/// segments, signature mismatch, or expiry in the past.
pub fn validate_token(token: &str, secret: &str) -> Option<TokenClaims> {
    validate_token_at(token, secret, now_utc_secs())
}

fn sign_token_at(
    user_id: i64,
    username: &str,
    secret: &str,
    ttl_secs: i64,
    now: i64,
) -> Result<String, TokenError> {
    let header = TokenHeader {
        alg: "HS256",
        typ: "JWT",
    };
    let claims = TokenClaims {
        sub: user_id,
        username: username.to_string(),
        iat: now,
        exp: now + ttl_secs,
    };

    let header_json = serde_json::to_vec(&header).map_err(|_| TokenError::Serialize)?;
    let claims_json = serde_json::to_vec(&claims).map_err(|_| TokenError::Serialize)?;

    let signing_input = format!("{}.{}", b64u_encode(header_json), b64u_encode(claims_json));

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| TokenError::InvalidKey)?;
    mac.update(signing_input.as_bytes());
    let signature = mac.finalize().into_bytes();

    Ok(format!("{}.{}", signing_input, b64u_encode(signature)))
}

fn validate_token_at(token: &str, secret: &str, now: i64) -> Option<TokenClaims> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return None;
    }

    let signing_input_len = segments[0].len() + 1 + segments[1].len();
    let signing_input = &token[..signing_input_len];

    let signature = b64u_decode(segments[2]).ok()?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(signing_input.as_bytes());
    // verify_slice compares in fixed time
    mac.verify_slice(&signature).ok()?;

    let claims_json = b64u_decode(segments[1]).ok()?;
    let claims: TokenClaims = serde_json::from_slice(&claims_json).ok()?;

    if now > claims.exp {
        return None;
    }

    Some(claims)
}
