//! Plain message responses.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single human-readable message.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Message {
    /// The message text.
    pub message: String,
}

impl Message {
    /// Creates a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
