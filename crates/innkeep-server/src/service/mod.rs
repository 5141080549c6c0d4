//! Application state and dependency injection.

mod config;
mod security;

use innkeep_postgres::PgClient;

pub use crate::service::config::{ServiceConfig, ServiceConfigBuilder};
pub use crate::service::security::{
    MasterKey, MasterKeyConfig, MasterKeySource, PasswordHasher, SessionKeys, SessionKeysConfig,
};
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection). Every field is
/// cheap to clone.
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    // External services:
    pub postgres: PgClient,

    // Internal services:
    pub master_key: MasterKey,
    pub password_hasher: PasswordHasher,
    pub session_keys: SessionKeys,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Resolves key material first so a bad key fails fast, then connects to
    /// Postgres and applies pending migrations.
    pub async fn from_config(service_config: &ServiceConfig) -> Result<Self> {
        service_config.validate()?;

        let master_key = service_config.load_master_key().await?;
        let session_keys = service_config.load_session_keys()?;

        let service_state = Self {
            postgres: service_config.connect_postgres().await?,

            master_key,
            password_hasher: PasswordHasher::new(),
            session_keys,
        };

        Ok(service_state)
    }

    /// Assembles state from already constructed services.
    pub fn new(postgres: PgClient, master_key: MasterKey, session_keys: SessionKeys) -> Self {
        Self {
            postgres,
            master_key,
            password_hasher: PasswordHasher::new(),
            session_keys,
        }
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// External services:
impl_di!(postgres: PgClient);

// Internal services:
impl_di!(master_key: MasterKey);
impl_di!(password_hasher: PasswordHasher);
impl_di!(session_keys: SessionKeys);
