//! # Web Library
//!
//! HTTP handlers, middleware, session cookie plumbing, and server setup.

pub mod cookie;
pub mod handlers;
pub mod middleware;
pub mod server;

pub use server::{start_server, AppState, ServerConfig};
