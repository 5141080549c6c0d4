//! User response types.

use innkeep_postgres::model;
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public view of a user. Never includes the password hash.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique handle derived from the email at signup.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Optional full name.
    pub full_name: Option<String>,
    /// Whether the user may authenticate.
    pub is_active: bool,
    /// When the user signed up.
    pub created_at: Timestamp,
}

impl User {
    /// Creates a response from a database model.
    pub fn from_model(user: model::User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
            created_at: user.created_at.into(),
        }
    }
}
