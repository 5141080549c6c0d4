//! Hotel platform credential response types.

use innkeep_postgres::model;
use innkeep_postgres::types::PlatformType;
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service::MasterKey;

/// Tracing target for credential decryption on the read path.
const TRACING_TARGET: &str = "innkeep_server::handler::hotel_platforms";

/// Stored platform credentials without their secrets.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HotelPlatform {
    /// Unique record identifier.
    pub id: Uuid,
    /// Owner of the record.
    pub user_id: Uuid,
    /// Booking platform.
    pub platform: PlatformType,
    /// Login identifier on the platform.
    pub login_id: String,
    /// Hotel name as listed on the platform.
    pub hotel_name: String,
    /// Second-factor account identifier.
    pub mfa_id: Option<String>,
    /// Where the second factor is delivered.
    pub mfa_platform: Option<String>,
    /// When the record was created.
    pub created_at: Timestamp,
    /// When the record was last modified.
    pub updated_at: Timestamp,
}

impl HotelPlatform {
    /// Creates a response from a database model, dropping the secrets.
    pub fn from_model(record: model::HotelPlatform) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            platform: record.platform,
            login_id: record.login_id,
            hotel_name: record.hotel_name,
            mfa_id: record.mfa_id,
            mfa_platform: record.mfa_platform,
            created_at: record.created_at.into(),
            updated_at: record.updated_at.into(),
        }
    }
}

/// Stored platform credentials with decrypted secrets.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HotelPlatformDetail {
    /// Non-secret fields, flattened into the same object.
    #[serde(flatten)]
    pub record: HotelPlatform,
    /// Decrypted login password. Empty if it could not be decrypted.
    pub login_password: String,
    /// Decrypted second-factor password, if one is stored.
    pub mfa_password: Option<String>,
}

impl HotelPlatformDetail {
    /// Creates a response from a database model, decrypting the secrets.
    ///
    /// A secret that fails to decrypt (for example after the master key
    /// changed) is returned as an empty string and logged with the record id.
    pub fn from_model(record: model::HotelPlatform, master_key: &MasterKey) -> Self {
        let login_password = decrypt_secret(
            master_key,
            record.id,
            "login_password",
            &record.login_password,
        );
        let mfa_password = record
            .mfa_password
            .as_deref()
            .map(|token| decrypt_secret(master_key, record.id, "mfa_password", token));

        Self {
            record: HotelPlatform::from_model(record),
            login_password,
            mfa_password,
        }
    }
}

fn decrypt_secret(master_key: &MasterKey, record_id: Uuid, field: &str, token: &str) -> String {
    match master_key.try_decrypt(token) {
        Ok(plaintext) => plaintext,
        Err(e) => {
            tracing::warn!(
                target: TRACING_TARGET,
                record_id = %record_id,
                field,
                reason = e.as_str(),
                "Stored credential could not be decrypted",
            );
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use innkeep_core::crypto::EncryptionKey;

    use super::*;

    fn record(master_key: &MasterKey) -> model::HotelPlatform {
        let now = jiff::Timestamp::now();
        model::HotelPlatform {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            platform: PlatformType::Yanolja,
            login_id: "front-desk".to_owned(),
            login_password: master_key.encrypt("hunter2"),
            hotel_name: "Seaside Inn".to_owned(),
            mfa_id: None,
            mfa_password: Some(master_key.encrypt("otp-secret")),
            mfa_platform: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn summary_omits_secrets() -> anyhow::Result<()> {
        let master_key = MasterKey::ephemeral();
        let json = serde_json::to_value(HotelPlatform::from_model(record(&master_key)))?;

        assert!(json.get("login_password").is_none());
        assert!(json.get("mfa_password").is_none());
        assert_eq!(json["platform"], "야놀자");
        Ok(())
    }

    #[test]
    fn detail_decrypts_secrets() -> anyhow::Result<()> {
        let master_key = MasterKey::ephemeral();
        let detail = HotelPlatformDetail::from_model(record(&master_key), &master_key);

        assert_eq!(detail.login_password, "hunter2");
        assert_eq!(detail.mfa_password.as_deref(), Some("otp-secret"));

        let json = serde_json::to_value(&detail)?;
        assert_eq!(json["login_password"], "hunter2");
        assert_eq!(json["hotel_name"], "Seaside Inn");
        Ok(())
    }

    #[test]
    fn detail_collapses_undecryptable_secrets() -> anyhow::Result<()> {
        let writer = MasterKey::ephemeral();
        let reader = MasterKey::from_base64(&EncryptionKey::generate().to_base64())?;
        let detail = HotelPlatformDetail::from_model(record(&writer), &reader);

        assert_eq!(detail.login_password, "");
        assert_eq!(detail.mfa_password.as_deref(), Some(""));
        Ok(())
    }
}
