//! Bearer token authentication.
//!
//! - [`AuthHeader`]: validates the `Authorization: Bearer` JWT of a request.
//! - [`AuthClaims`]: the claims carried by an access token.
//! - [`AuthState`]: the active user a valid token resolves to.

mod auth_state;
mod jwt_header;

pub use self::auth_state::AuthState;
pub use self::jwt_header::{AuthClaims, AuthHeader};
