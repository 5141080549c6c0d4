//! Hotel platforms table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Hotel platforms table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum HotelPlatformConstraints {
    /// One credential record per user and platform.
    #[strum(serialize = "unique_user_platform")]
    UniqueUserPlatform,

    #[strum(serialize = "hotel_platforms_user_id_fkey")]
    UserForeignKey,

    #[strum(serialize = "hotel_platforms_updated_after_created")]
    UpdatedAfterCreated,
}

impl HotelPlatformConstraints {
    /// Creates a new [`HotelPlatformConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            HotelPlatformConstraints::UniqueUserPlatform => ConstraintCategory::Uniqueness,
            HotelPlatformConstraints::UserForeignKey => ConstraintCategory::BusinessLogic,
            HotelPlatformConstraints::UpdatedAfterCreated => ConstraintCategory::Chronological,
        }
    }
}

impl From<HotelPlatformConstraints> for String {
    #[inline]
    fn from(val: HotelPlatformConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for HotelPlatformConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
