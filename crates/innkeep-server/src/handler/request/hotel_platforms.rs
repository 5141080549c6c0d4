//! Hotel platform credential request types.

use innkeep_postgres::model::{NewHotelPlatform, UpdateHotelPlatform as UpdateHotelPlatformModel};
use innkeep_postgres::types::PlatformType;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::service::MasterKey;

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Request payload for registering platform credentials.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate, JsonSchema)]
pub struct CreateHotelPlatform {
    /// Booking platform the credentials belong to.
    pub platform: PlatformType,

    /// Login identifier on the platform.
    #[validate(length(min = 1, max = 255))]
    pub login_id: String,

    /// Login password on the platform. Stored encrypted.
    #[validate(length(max = 1000))]
    pub login_password: String,

    /// Name of the hotel as listed on the platform.
    #[validate(length(min = 1, max = 255))]
    pub hotel_name: String,

    /// Second-factor account identifier.
    #[validate(length(max = 255))]
    #[serde(default)]
    pub mfa_id: Option<String>,

    /// Second-factor password. Stored encrypted.
    #[validate(length(max = 1000))]
    #[serde(default)]
    pub mfa_password: Option<String>,

    /// Where the second factor is delivered, e.g. an email provider.
    #[validate(length(max = 100))]
    #[serde(default)]
    pub mfa_platform: Option<String>,
}

impl CreateHotelPlatform {
    /// Encrypts the secrets and builds the insertable record.
    ///
    /// An empty `mfa_password` is stored as `NULL`.
    pub fn into_model(self, user_id: Uuid, master_key: &MasterKey) -> NewHotelPlatform {
        let mfa_password = self
            .mfa_password
            .filter(|password| !password.is_empty())
            .map(|password| master_key.encrypt(&password));

        NewHotelPlatform {
            user_id,
            platform: self.platform,
            login_id: self.login_id,
            login_password: master_key.encrypt(&self.login_password),
            hotel_name: self.hotel_name,
            mfa_id: self.mfa_id,
            mfa_password,
            mfa_platform: self.mfa_platform,
        }
    }
}

/// Request payload for a partial update of platform credentials.
///
/// Absent fields are left untouched. For the optional `mfa_*` fields an
/// explicit `null` clears the stored value.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, JsonSchema)]
pub struct UpdateHotelPlatform {
    /// New login identifier.
    #[validate(length(min = 1, max = 255))]
    #[serde(default)]
    pub login_id: Option<String>,

    /// New login password. Re-encrypted unless empty.
    #[validate(length(max = 1000))]
    #[serde(default)]
    pub login_password: Option<String>,

    /// New hotel name.
    #[validate(length(min = 1, max = 255))]
    #[serde(default)]
    pub hotel_name: Option<String>,

    /// New second-factor account identifier.
    #[validate(length(max = 255))]
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schemars(with = "Option<String>")]
    pub mfa_id: Option<Option<String>>,

    /// New second-factor password. Re-encrypted unless empty or `null`.
    #[validate(length(max = 1000))]
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schemars(with = "Option<String>")]
    pub mfa_password: Option<Option<String>>,

    /// New second-factor delivery platform.
    #[validate(length(max = 100))]
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schemars(with = "Option<String>")]
    pub mfa_platform: Option<Option<String>>,
}

impl UpdateHotelPlatform {
    /// Re-encrypts supplied secrets and builds the changeset.
    ///
    /// - `login_password`: `""` is stored as is, anything else is encrypted.
    /// - `mfa_password`: `""` or `null` clears the column.
    pub fn into_model(self, master_key: &MasterKey) -> UpdateHotelPlatformModel {
        let login_password = self
            .login_password
            .map(|password| master_key.encrypt(&password));

        let mfa_password = self.mfa_password.map(|password| {
            password
                .filter(|password| !password.is_empty())
                .map(|password| master_key.encrypt(&password))
        });

        UpdateHotelPlatformModel {
            login_id: self.login_id,
            login_password,
            hotel_name: self.hotel_name,
            mfa_id: self.mfa_id,
            mfa_password,
            mfa_platform: self.mfa_platform,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_encrypts_secrets() {
        let master_key = MasterKey::ephemeral();
        let request = CreateHotelPlatform {
            platform: PlatformType::Naver,
            login_id: "front-desk".to_owned(),
            login_password: "hunter2".to_owned(),
            hotel_name: "Seaside Inn".to_owned(),
            mfa_id: Some("desk@example.com".to_owned()),
            mfa_password: Some("otp-secret".to_owned()),
            mfa_platform: None,
        };

        let user_id = Uuid::new_v4();
        let model = request.into_model(user_id, &master_key);

        assert_eq!(model.user_id, user_id);
        assert_ne!(model.login_password, "hunter2");
        assert_eq!(master_key.decrypt(&model.login_password), "hunter2");

        let mfa_password = model.mfa_password.unwrap_or_default();
        assert_eq!(master_key.decrypt(&mfa_password), "otp-secret");
    }

    #[test]
    fn create_stores_empty_mfa_password_as_null() {
        let master_key = MasterKey::ephemeral();
        let request = CreateHotelPlatform {
            platform: PlatformType::Agoda,
            login_id: "owner".to_owned(),
            login_password: String::new(),
            hotel_name: "Harbor Hotel".to_owned(),
            mfa_id: None,
            mfa_password: Some(String::new()),
            mfa_platform: None,
        };

        let model = request.into_model(Uuid::new_v4(), &master_key);
        assert_eq!(model.login_password, "");
        assert!(model.mfa_password.is_none());
    }

    #[test]
    fn update_distinguishes_absent_and_null() -> anyhow::Result<()> {
        let request: UpdateHotelPlatform =
            serde_json::from_str(r#"{ "hotel_name": "Renamed", "mfa_id": null }"#)?;

        assert_eq!(request.hotel_name.as_deref(), Some("Renamed"));
        assert_eq!(request.mfa_id, Some(None));
        assert_eq!(request.mfa_platform, None);
        assert_eq!(request.login_password, None);
        Ok(())
    }

    #[test]
    fn update_reencrypts_supplied_secrets_only() -> anyhow::Result<()> {
        let master_key = MasterKey::ephemeral();
        let request: UpdateHotelPlatform =
            serde_json::from_str(r#"{ "login_password": "new-pass", "mfa_password": "" }"#)?;

        let model = request.into_model(&master_key);
        let login_password = model.login_password.unwrap_or_default();

        assert_eq!(master_key.decrypt(&login_password), "new-pass");
        assert_eq!(model.mfa_password, Some(None));
        assert!(model.hotel_name.is_none());
        Ok(())
    }

    #[test]
    fn update_keeps_empty_login_password() {
        let master_key = MasterKey::ephemeral();
        let request = UpdateHotelPlatform {
            login_password: Some(String::new()),
            ..Default::default()
        };

        let model = request.into_model(&master_key);
        assert_eq!(model.login_password.as_deref(), Some(""));
    }

    #[test]
    fn validation_rejects_long_fields() {
        let request = UpdateHotelPlatform {
            hotel_name: Some("x".repeat(300)),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn validation_rejects_long_mfa_fields() {
        let request = UpdateHotelPlatform {
            mfa_id: Some(Some("x".repeat(300))),
            ..Default::default()
        };
        assert!(request.validate().is_err());

        let request = UpdateHotelPlatform {
            mfa_platform: Some(Some("x".repeat(101))),
            ..Default::default()
        };
        assert!(request.validate().is_err());

        let request = UpdateHotelPlatform {
            mfa_id: Some(None),
            mfa_platform: Some(Some("sms".to_owned())),
            ..Default::default()
        };
        assert!(request.validate().is_ok());
    }
}
