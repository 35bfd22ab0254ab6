//! # HTTP Request Handlers
//!
//! Axum HTTP request handlers organized by feature domain.
//!
//! ## Handler Modules
//!
//! - **[`auth`]**: session authentication endpoints
//!   - `POST /api/auth/signup` - Create new user account
//!   - `POST /api/auth/login` - Authenticate with email or username
//!   - `POST /api/auth/logout` - Clear the session cookie
//!   - `GET /api/auth/me` - Identify the current visitor
//!
//! ## Handler Architecture
//!
//! All handlers follow Axum's extractor pattern:
//!
//! ```rust,ignore
//! async fn handler(
//!     State(db): State<DbPool>,          // Shared state
//!     Json(payload): Json<RequestBody>,  // Request body
//! ) -> Result<Json<Response>, (StatusCode, Json<ErrorResponse>)> {
//!     // Handler logic...
//!     Ok(Json(response))
//! }
//! ```
//!
//! Routes that identify the visitor use the [`crate::middleware::CurrentUser`]
//! and [`crate::middleware::MaybeUser`] extractors.

pub mod auth;
