//! Supported platform listing.

use innkeep_postgres::types::PlatformType;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// A supported booking platform.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Platform {
    /// Display value, as used in request and response bodies.
    pub value: String,
    /// Uppercase identifier.
    pub name: String,
}

impl Platform {
    /// Describes a single platform.
    pub fn from_type(platform: PlatformType) -> Self {
        Self {
            value: platform.value().to_owned(),
            name: platform.name().to_owned(),
        }
    }

    /// Lists every supported platform in declaration order.
    pub fn all() -> Vec<Self> {
        PlatformType::iter().map(Self::from_type).collect()
    }
}
