//! Path parameter types for HTTP handlers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Path parameters for a single hotel platform record.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct HotelPlatformPathParams {
    /// Unique identifier of the record.
    pub platform_id: Uuid,
}

/// Path parameters for a platform lookup by name.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PlatformNamePathParams {
    /// Platform display value (`네이버`) or identifier (`NAVER`).
    pub platform_name: String,
}
