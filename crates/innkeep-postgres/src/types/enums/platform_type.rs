//! Hotel booking platform enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

/// Booking platform a stored credential belongs to.
///
/// Corresponds to the `PLATFORM_TYPE` PostgreSQL enum. Each variant has three
/// spellings: the lowercase database label, the uppercase [`name`], and the
/// localized display [`value`] used on the wire.
///
/// [`name`]: PlatformType::name
/// [`value`]: PlatformType::value
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, EnumIter)]
#[ExistingTypePath = "crate::schema::sql_types::PlatformType"]
pub enum PlatformType {
    /// Yanolja partner center.
    #[db_rename = "yanolja"]
    #[serde(rename = "야놀자")]
    Yanolja,

    /// Yeogieottae, owner portal.
    #[db_rename = "yeogi_boss"]
    #[serde(rename = "여기어때_사장님")]
    YeogiBoss,

    /// Yeogieottae, partner portal.
    #[db_rename = "yeogi_partner"]
    #[serde(rename = "여기어때_파트너")]
    YeogiPartner,

    /// Naver booking.
    #[db_rename = "naver"]
    #[serde(rename = "네이버")]
    Naver,

    /// Airbnb.
    #[db_rename = "airbnb"]
    #[serde(rename = "에어비앤비")]
    Airbnb,

    /// Agoda.
    #[db_rename = "agoda"]
    #[serde(rename = "아고다")]
    Agoda,

    /// Booking.com.
    #[db_rename = "booking"]
    #[serde(rename = "부킹닷컴")]
    Booking,

    /// Expedia.
    #[db_rename = "expedia"]
    #[serde(rename = "익스피디아")]
    Expedia,
}

impl PlatformType {
    /// Returns the localized display value, as serialized in JSON.
    pub const fn value(self) -> &'static str {
        match self {
            Self::Yanolja => "야놀자",
            Self::YeogiBoss => "여기어때_사장님",
            Self::YeogiPartner => "여기어때_파트너",
            Self::Naver => "네이버",
            Self::Airbnb => "에어비앤비",
            Self::Agoda => "아고다",
            Self::Booking => "부킹닷컴",
            Self::Expedia => "익스피디아",
        }
    }

    /// Returns the uppercase identifier, e.g. `YEOGI_BOSS`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Yanolja => "YANOLJA",
            Self::YeogiBoss => "YEOGI_BOSS",
            Self::YeogiPartner => "YEOGI_PARTNER",
            Self::Naver => "NAVER",
            Self::Airbnb => "AIRBNB",
            Self::Agoda => "AGODA",
            Self::Booking => "BOOKING",
            Self::Expedia => "EXPEDIA",
        }
    }

    /// Looks a platform up by its display value or its identifier.
    ///
    /// Matching is exact: `"네이버"` and `"NAVER"` resolve, `"naver"` does not.
    pub fn from_name_or_value(input: &str) -> Option<Self> {
        Self::iter().find(|platform| platform.value() == input || platform.name() == input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_value_and_name() {
        assert_eq!(
            PlatformType::from_name_or_value("야놀자"),
            Some(PlatformType::Yanolja)
        );
        assert_eq!(
            PlatformType::from_name_or_value("YEOGI_PARTNER"),
            Some(PlatformType::YeogiPartner)
        );
        assert_eq!(PlatformType::from_name_or_value("expedia"), None);
        assert_eq!(PlatformType::from_name_or_value("unknown"), None);
    }

    #[test]
    fn every_platform_roundtrips_through_both_spellings() {
        for platform in PlatformType::iter() {
            assert_eq!(
                PlatformType::from_name_or_value(platform.value()),
                Some(platform)
            );
            assert_eq!(
                PlatformType::from_name_or_value(platform.name()),
                Some(platform)
            );
        }
        assert_eq!(PlatformType::iter().count(), 8);
    }

    #[test]
    fn serializes_as_display_value() -> Result<(), serde_json::Error> {
        let json = serde_json::to_string(&PlatformType::Booking)?;
        assert_eq!(json, "\"부킹닷컴\"");

        let parsed: PlatformType = serde_json::from_str("\"여기어때_사장님\"")?;
        assert_eq!(parsed, PlatformType::YeogiBoss);
        Ok(())
    }
}
