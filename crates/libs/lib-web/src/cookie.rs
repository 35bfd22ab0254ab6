//! # Session Cookie
//!
//! Builders and parsing for the session cookie that carries the signed
//! token between browser and server.
//!
//! The cookie is `HttpOnly` (page scripts cannot read it) and
//! `SameSite=Lax` (top-level navigations still send it). Clearing the
//! cookie removes it from the browser but does not invalidate an
//! unexpired token.

use std::borrow::Cow;

/// Name of the session cookie.
pub const COOKIE_NAME: &str = "auth";

/// Build a `Set-Cookie` value that stores the session token.
///
/// `secure` appends the `Secure` attribute so the cookie is only sent
/// over https.
pub fn set_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        COOKIE_NAME, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build a `Set-Cookie` value that removes the session cookie.
pub fn clear_cookie(secure: bool) -> String {
    set_cookie("", 0, secure)
}

/// Extract the session token from a `Cookie` request header value.
///
/// The named cookie may appear anywhere in the semicolon-separated
/// list. Values are URL-decoded. Returns `None` when the cookie is
/// absent, empty, or not decodable.
pub fn extract_token(cookie_header: &str) -> Option<String> {
    cookie_header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            if name == COOKIE_NAME {
                Some(value)
            } else {
                None
            }
        })
        .find_map(|value| match urlencoding::decode(value) {
            Ok(Cow::Borrowed("")) => None,
            Ok(decoded) => Some(decoded.into_owned()),
            Err(_) => None,
        })
}
