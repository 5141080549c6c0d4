//! Hotel platform credential model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::hotel_platforms;
use crate::types::PlatformType;

/// Login credentials a user keeps for one booking platform.
///
/// `login_password` and `mfa_password` hold encrypted tokens (or an empty
/// string), never plaintext.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = hotel_platforms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HotelPlatform {
    /// Unique record identifier.
    pub id: Uuid,
    /// Owner of the credentials.
    pub user_id: Uuid,
    /// Booking platform.
    pub platform: PlatformType,
    /// Login identifier on the platform.
    pub login_id: String,
    /// Encrypted login password token.
    pub login_password: String,
    /// Name of the hotel managed through this account.
    pub hotel_name: String,
    /// Second-factor account identifier.
    pub mfa_id: Option<String>,
    /// Encrypted second-factor password token.
    pub mfa_password: Option<String>,
    /// Where the second factor lives (e.g. an email provider).
    pub mfa_platform: Option<String>,
    /// Timestamp when the record was created.
    pub created_at: Timestamp,
    /// Timestamp when the record was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new hotel platform record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = hotel_platforms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewHotelPlatform {
    /// Owner (required).
    pub user_id: Uuid,
    /// Booking platform (required).
    pub platform: PlatformType,
    /// Login identifier.
    pub login_id: String,
    /// Encrypted login password token.
    pub login_password: String,
    /// Hotel name.
    pub hotel_name: String,
    /// Second-factor account identifier.
    pub mfa_id: Option<String>,
    /// Encrypted second-factor password token.
    pub mfa_password: Option<String>,
    /// Second-factor platform.
    pub mfa_platform: Option<String>,
}

/// Data for updating a hotel platform record.
///
/// `None` leaves a column untouched; `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = hotel_platforms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateHotelPlatform {
    /// Login identifier.
    pub login_id: Option<String>,
    /// Encrypted login password token.
    pub login_password: Option<String>,
    /// Hotel name.
    pub hotel_name: Option<String>,
    /// Second-factor account identifier.
    pub mfa_id: Option<Option<String>>,
    /// Encrypted second-factor password token.
    pub mfa_password: Option<Option<String>>,
    /// Second-factor platform.
    pub mfa_platform: Option<Option<String>>,
}

impl UpdateHotelPlatform {
    /// Returns true if the update would not change any column.
    pub fn is_empty(&self) -> bool {
        self.login_id.is_none()
            && self.login_password.is_none()
            && self.hotel_name.is_none()
            && self.mfa_id.is_none()
            && self.mfa_password.is_none()
            && self.mfa_platform.is_none()
    }
}
