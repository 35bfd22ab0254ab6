//! # Authentication Library
//!
//! Credential hashing and session token primitives.
//!
//! This crate is storage-free and transport-free: it turns passwords into
//! self-describing hash records and user identities into signed, expiring
//! tokens. Where those strings live (database rows, cookies) is decided by
//! the callers.

pub mod pwd;
pub mod token;

// Re-export commonly used items
pub use pwd::{hash_pwd, validate_pwd, pwd_needs_rehash, PwdError};
pub use token::{sign_token, validate_token, TokenClaims, TokenError};
