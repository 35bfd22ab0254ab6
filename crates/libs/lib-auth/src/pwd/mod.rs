//! # Password Hashing
//!
//! Password credential hashing and verification using PBKDF2-HMAC-SHA256.
//!
//! Each credential is one opaque record string:
//!
//! ```text
//! pbkdf2$<iterations>$<b64u salt>$<b64u derived key>
//! ```
//!
//! The record is self-describing, so verification depends only on the record
//! itself plus a minimum-iteration floor. Verification never errors: any
//! malformed, unknown, or below-floor record verifies as `false`.

use lib_utils::b64::{b64u_decode, b64u_encode};
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Iteration count applied to newly hashed passwords.
const DEFAULT_ITERATIONS: u32 = 120_000;

/// Records below this cost verify as `false` regardless of content.
const MIN_ITERATIONS: u32 = 100_000;

const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// Errors raised while producing a new credential record.
///
/// Verification never returns these; a record that cannot be verified is
/// simply not valid.
#[derive(Debug, Error)]
pub enum PwdError {
    #[error("failed to gather salt entropy")]
    SaltGeneration,
}

// region:    --- Scheme

/// Hashing scheme identified by the record's leading tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheme {
    Pbkdf2,
}

const DEFAULT_SCHEME: Scheme = Scheme::Pbkdf2;

impl Scheme {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "pbkdf2" => Some(Scheme::Pbkdf2),
            _ => None,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            Scheme::Pbkdf2 => "pbkdf2",
        }
    }
}

// endregion: --- Scheme

/// Hash a password into a new credential record.
///
/// A fresh 16-byte salt is drawn from the OS RNG for every call, so hashing
/// the same password twice yields different records.
pub fn hash_pwd(password: &str) -> Result<String, PwdError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|_| PwdError::SaltGeneration)?;

    let key = derive_key(password, &salt, DEFAULT_ITERATIONS);

    Ok(format!(
        "{}${}${}${}",
        DEFAULT_SCHEME.tag(),
        DEFAULT_ITERATIONS,
        b64u_encode(salt),
        b64u_encode(key)
    ))
}

/// Verify a password against a stored credential record.
///
/// Returns `false` for wrong passwords and for every malformed record:
/// unknown scheme tag, wrong field count, undecodable fields, or an
/// iteration count below the floor. The comparison of derived keys runs in
/// fixed time.
pub fn validate_pwd(password: &str, record: &str) -> bool {
    let Some(parsed) = parse_record(record) else {
        return false;
    };

    if parsed.iterations < MIN_ITERATIONS {
        return false;
    }

    let candidate = match parsed.scheme {
        Scheme::Pbkdf2 => derive_key(password, &parsed.salt, parsed.iterations),
    };

    if candidate.len() != parsed.key.len() {
        return false;
    }

    candidate.as_slice().ct_eq(&parsed.key).into()
}

/// Report whether a credential record lags the current hashing defaults.
///
/// True when the scheme or iteration count differs from what [`hash_pwd`]
/// produces today. Callers re-hash after a successful verification so cost
/// bumps roll out on the next login.
pub fn pwd_needs_rehash(record: &str) -> bool {
    match parse_record(record) {
        Some(parsed) => parsed.scheme != DEFAULT_SCHEME || parsed.iterations != DEFAULT_ITERATIONS,
        None => true,
    }
}

// region:    --- Record parsing

struct PwdRecord {
    scheme: Scheme,
    iterations: u32,
    salt: Vec<u8>,
    key: Vec<u8>,
}

fn parse_record(record: &str) -> Option<PwdRecord> {
    let fields: Vec<&str> = record.split('$').collect();
    if fields.len() != 4 {
        return None;
    }

    let scheme = Scheme::from_tag(fields[0])?;
    let iterations: u32 = fields[1].parse().ok()?;
    let salt = b64u_decode(fields[2]).ok()?;
    let key = b64u_decode(fields[3]).ok()?;

    Some(PwdRecord {
        scheme,
        iterations,
        salt,
        key,
    })
}

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
    key
}

// endregion: --- Record parsing

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_iterations(password: &str, iterations: u32) -> String {
        let salt = [7u8; SALT_LEN];
        let key = derive_key(password, &salt, iterations);
        format!(
            "pbkdf2${}${}${}",
            iterations,
            b64u_encode(salt),
            b64u_encode(key)
        )
    }

    #[test]
    fn test_hash_and_validate() {
        let password = "TestPassword123!";
        let record = hash_pwd(password).expect("hashing should succeed");

        assert!(validate_pwd(password, &record));
        assert!(!validate_pwd("WrongPassword", &record));
    }

    #[test]
    fn test_record_format() {
        let record = hash_pwd("TestPassword123!").expect("hashing should succeed");
        let fields: Vec<&str> = record.split('$').collect();

        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], "pbkdf2");
        assert_eq!(fields[1], DEFAULT_ITERATIONS.to_string());
        assert_eq!(b64u_decode(fields[2]).unwrap().len(), SALT_LEN);
        assert_eq!(b64u_decode(fields[3]).unwrap().len(), KEY_LEN);
    }

    #[test]
    fn test_same_password_different_records() {
        let password = "TestPassword123!";
        let a = hash_pwd(password).expect("hashing should succeed");
        let b = hash_pwd(password).expect("hashing should succeed");

        assert_ne!(a, b);
        assert!(validate_pwd(password, &a));
        assert!(validate_pwd(password, &b));
    }

    #[test]
    fn test_malformed_records_verify_false() {
        let cases = [
            "",
            "pbkdf2",
            "pbkdf2$120000$onlythreefields",
            "pbkdf2$120000$a$b$extra",
            "bcrypt$120000$c2FsdA$a2V5",
            "pbkdf2$notanumber$c2FsdA$a2V5",
            "pbkdf2$120000$!!!$a2V5",
            "pbkdf2$120000$c2FsdA$!!!",
        ];

        for record in cases {
            assert!(
                !validate_pwd("TestPassword123!", record),
                "record {record:?} should not verify"
            );
        }
    }

    #[test]
    fn test_iteration_floor_rejects_weak_records() {
        let password = "TestPassword123!";
        let weak = record_with_iterations(password, 50_000);

        // Internally consistent but below the floor
        assert!(!validate_pwd(password, &weak));

        let at_floor = record_with_iterations(password, MIN_ITERATIONS);
        assert!(validate_pwd(password, &at_floor));
    }

    #[test]
    fn test_needs_rehash() {
        let password = "TestPassword123!";
        let fresh = hash_pwd(password).expect("hashing should succeed");
        assert!(!pwd_needs_rehash(&fresh));

        let stale = record_with_iterations(password, MIN_ITERATIONS);
        assert!(pwd_needs_rehash(&stale));

        assert!(pwd_needs_rehash("garbage"));
    }
}
