//! Request extractors with consistent error responses.
//!
//! Every extractor here rejects with [`handler::Error`], so a failed
//! extraction produces the same `ErrorResponse` body as a failed handler.
//!
//! - [`AuthHeader`], [`AuthClaims`]: bearer token parsing and issuance.
//! - [`AuthState`]: the authenticated, active user behind a token.
//! - [`Json`], [`ValidateJson`], [`Form`], [`Path`]: axum extractors with
//!   readable rejections.
//! - [`PgPool`]: a pooled database connection.
//!
//! [`handler::Error`]: crate::handler::Error

pub mod auth;
pub mod reject;

mod pg_connection;

pub use crate::extract::auth::{AuthClaims, AuthHeader, AuthState};
pub use crate::extract::pg_connection::PgPool;
pub use crate::extract::reject::{Form, Json, Path, ValidateJson};
