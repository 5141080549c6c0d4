//! Router layers applied around every handler.
//!
//! - [`RouterSecurityExt`]: CORS, security headers, body limits, compression.
//! - [`RouterObservabilityExt`]: request ids, tracing spans, request timing.
//! - [`RouterRecoveryExt`]: timeouts and panics turned into error responses.
//! - [`RouterOpenApiExt`]: the generated OpenAPI document and Scalar UI.
//!
//! ```rust,no_run
//! use innkeep_server::handler::routes;
//! use innkeep_server::middleware::*;
//!
//! # fn build(state: innkeep_server::service::ServiceState) -> axum::Router {
//! routes()
//!     .with_open_api(&OpenApiConfig::default())
//!     .with_state(state)
//!     .with_default_security()
//!     .with_observability()
//!     .with_default_recovery()
//! # }
//! ```

mod observability;
mod recovery;
mod security;
mod specification;

pub use crate::middleware::observability::RouterObservabilityExt;
pub use crate::middleware::recovery::{RecoveryConfig, RouterRecoveryExt};
pub use crate::middleware::security::{
    CorsConfig, FrameOptions, ReferrerPolicy, RouterSecurityExt, SecurityHeadersConfig,
};
pub use crate::middleware::specification::{OpenApiConfig, RouterOpenApiExt};

/// Default maximum size of a request body, in bytes.
pub const DEFAULT_MAX_BODY_SIZE: usize = 4 * 1024 * 1024;
