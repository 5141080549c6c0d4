//! Database constraint violations organized by table.

mod hotel_platforms;
mod users;

use serde::{Deserialize, Serialize};

pub use self::hotel_platforms::HotelPlatformConstraints;
pub use self::users::UserConstraints;

/// Any known constraint of the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConstraintViolation {
    User(UserConstraints),
    HotelPlatform(HotelPlatformConstraints),
}

/// Categories of database constraint violations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Data validation constraints (format, length, range checks).
    Validation,
    /// Chronological integrity constraints (timestamp relationships).
    Chronological,
    /// Business logic constraints (foreign keys, domain rules).
    BusinessLogic,
    /// Uniqueness constraints (primary keys, unique indexes).
    Uniqueness,
}

impl ConstraintViolation {
    /// Creates a new [`ConstraintViolation`] from the constraint name.
    ///
    /// Returns `None` if the name does not belong to this schema.
    ///
    /// ```
    /// use innkeep_postgres::types::ConstraintViolation;
    ///
    /// assert!(ConstraintViolation::new("unique_user_platform").is_some());
    /// assert!(ConstraintViolation::new("users_email_unique").is_some());
    /// assert!(ConstraintViolation::new("unknown_constraint").is_none());
    /// ```
    pub fn new(constraint: &str) -> Option<Self> {
        UserConstraints::new(constraint)
            .map(Self::User)
            .or_else(|| HotelPlatformConstraints::new(constraint).map(Self::HotelPlatform))
    }

    /// Returns the table name associated with this constraint.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConstraintViolation::User(_) => "users",
            ConstraintViolation::HotelPlatform(_) => "hotel_platforms",
        }
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            ConstraintViolation::User(c) => c.categorize(),
            ConstraintViolation::HotelPlatform(c) => c.categorize(),
        }
    }

    /// Returns the original constraint name.
    pub fn constraint_name(&self) -> String {
        match self {
            ConstraintViolation::User(c) => c.to_string(),
            ConstraintViolation::HotelPlatform(c) => c.to_string(),
        }
    }
}

impl From<ConstraintViolation> for String {
    #[inline]
    fn from(val: ConstraintViolation) -> Self {
        val.constraint_name()
    }
}

impl TryFrom<String> for ConstraintViolation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ConstraintViolation::new(&value).ok_or_else(|| format!("unknown constraint: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_constraint_name_parses_back() {
        for constraint in UserConstraints::iter() {
            let parsed = ConstraintViolation::new(&constraint.to_string());
            assert_eq!(parsed, Some(ConstraintViolation::User(constraint)));
        }

        for constraint in HotelPlatformConstraints::iter() {
            let parsed = ConstraintViolation::new(&constraint.to_string());
            assert_eq!(parsed, Some(ConstraintViolation::HotelPlatform(constraint)));
        }
    }

    #[test]
    fn categorizes_uniqueness() {
        let violation = ConstraintViolation::new("unique_user_platform");
        assert_eq!(
            violation.map(|v| v.categorize()),
            Some(ConstraintCategory::Uniqueness)
        );
        assert_eq!(violation.map(|v| v.table_name()), Some("hotel_platforms"));
    }
}
