//! Authentication request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for signup.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
pub struct Signup {
    /// Email address of the new user.
    #[validate(email)]
    #[validate(length(min = 3, max = 100))]
    pub email: String,

    /// Login password of the new user.
    #[validate(length(min = 1, max = 1000))]
    pub password: String,
}

impl Signup {
    /// Returns the email in its stored form: trimmed and lowercase.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

/// Request payload for JSON login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
pub struct Login {
    /// Email address of the user.
    #[validate(email)]
    #[validate(length(min = 3, max = 100))]
    pub email: String,

    /// Login password of the user.
    #[validate(length(min = 1, max = 1000))]
    pub password: String,
}

/// OAuth2 password grant form, as sent to `/token`.
///
/// The `username` field carries the user's email address.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TokenForm {
    /// Email address of the user.
    pub username: String,

    /// Login password of the user.
    pub password: String,

    /// OAuth2 grant type. Only `password` is accepted when present.
    #[serde(default)]
    pub grant_type: Option<String>,

    /// Requested scopes. Ignored.
    #[serde(default)]
    pub scope: Option<String>,
}

impl From<TokenForm> for Login {
    fn from(form: TokenForm) -> Self {
        Self {
            email: form.username,
            password: form.password,
        }
    }
}
