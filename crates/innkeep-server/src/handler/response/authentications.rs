//! Authentication response types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Access token issued by `/token` and `/login`.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Token {
    /// Signed access token.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
}

impl Token {
    /// Wraps a signed access token.
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_owned(),
        }
    }
}
