//! # Middleware
//!
//! Axum middleware for authentication, request stamping, logging, and
//! response mapping.
//!
//! ## Modules
//!
//! - **[`mw_auth`]**: session authentication middleware and extractors
//! - **[`mw_req_stamp`]**: request ID and timestamp stamping
//! - **[`mw_logging`]**: request/response logging with credential redaction
//! - **[`mw_res_map`]**: security headers on every response

// region: --- Modules
pub mod mw_auth;
pub mod mw_req_stamp;
pub mod mw_res_map;
pub mod mw_logging;
// endregion: --- Modules

// region: --- Re-exports
pub use mw_auth::{identify, require_auth, CurrentUser, MaybeUser};
pub use mw_req_stamp::{stamp_req, RequestStamp};
pub use mw_res_map::map_res;
pub use mw_logging::log_requests;
// endregion: --- Re-exports
