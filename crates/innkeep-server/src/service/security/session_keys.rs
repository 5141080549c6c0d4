//! Signing keys for HS256 access tokens.

use std::fmt;
use std::sync::Arc;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use jiff::SignedDuration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Tracing target for session key operations.
const TRACING_TARGET: &str = "innkeep_server::session_keys";

/// Secrets shorter than this are accepted but logged as weak.
const RECOMMENDED_SECRET_LEN: usize = 32;

/// Access token signing configuration.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct SessionKeysConfig {
    /// Shared secret used to sign and verify access tokens.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long = "secret-key", env = "SECRET_KEY", hide_env_values = true)
    )]
    pub secret_key: String,

    /// Lifetime of issued access tokens, in minutes.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(
            long = "access-token-expire-minutes",
            env = "ACCESS_TOKEN_EXPIRE_MINUTES",
            default_value_t = 15
        )
    )]
    #[serde(default = "SessionKeysConfig::default_expire_minutes")]
    pub access_token_expire_minutes: u64,
}

impl SessionKeysConfig {
    fn default_expire_minutes() -> u64 {
        15
    }

    /// Creates a configuration with the default token lifetime.
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            access_token_expire_minutes: Self::default_expire_minutes(),
        }
    }

    /// Sets the access token lifetime.
    pub fn with_access_token_expire_minutes(mut self, minutes: u64) -> Self {
        self.access_token_expire_minutes = minutes;
        self
    }

    /// Returns the access token lifetime.
    #[inline]
    pub fn access_token_lifetime(&self) -> SignedDuration {
        let minutes = i64::try_from(self.access_token_expire_minutes).unwrap_or(i64::MAX / 60);
        SignedDuration::from_mins(minutes)
    }

    /// Validates the secret and the token lifetime.
    pub fn validate(&self) -> Result<()> {
        if self.secret_key.trim().is_empty() {
            return Err(Error::config("SECRET_KEY must not be empty"));
        }

        if self.access_token_expire_minutes == 0 {
            return Err(Error::config(
                "ACCESS_TOKEN_EXPIRE_MINUTES must be at least 1",
            ));
        }

        // One year.
        if self.access_token_expire_minutes > 525_600 {
            return Err(Error::config(
                "ACCESS_TOKEN_EXPIRE_MINUTES must not exceed one year",
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for SessionKeysConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeysConfig")
            .field("secret_key", &"[REDACTED]")
            .field(
                "access_token_expire_minutes",
                &self.access_token_expire_minutes,
            )
            .finish()
    }
}

/// Keys used to sign and verify access tokens.
///
/// Cheap to clone; all clones share the same key material.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

struct SessionKeysInner {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    config: SessionKeysConfig,
}

impl SessionKeys {
    /// Signing algorithm of every access token.
    pub const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Derives the signing keys from the configured secret.
    pub fn from_config(config: &SessionKeysConfig) -> Result<Self> {
        config.validate()?;

        if config.secret_key.len() < RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                target: TRACING_TARGET,
                min_len = RECOMMENDED_SECRET_LEN,
                "SECRET_KEY is shorter than recommended",
            );
        }

        let secret = config.secret_key.as_bytes();
        let inner = Arc::new(SessionKeysInner {
            decoding_key: DecodingKey::from_secret(secret),
            encoding_key: EncodingKey::from_secret(secret),
            config: config.clone(),
        });

        tracing::info!(
            target: TRACING_TARGET,
            expire_minutes = config.access_token_expire_minutes,
            "Session keys initialized",
        );

        Ok(Self { inner })
    }

    /// Returns the key used to verify tokens.
    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    /// Returns the key used to sign tokens.
    #[inline]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.inner.encoding_key
    }

    /// Returns the configuration the keys were derived from.
    #[inline]
    pub fn config(&self) -> &SessionKeysConfig {
        &self.inner.config
    }

    /// Returns the lifetime of newly issued tokens.
    #[inline]
    pub fn access_token_lifetime(&self) -> SignedDuration {
        self.inner.config.access_token_lifetime()
    }

    /// Signs and verifies a throwaway token to check the keys work.
    pub fn validate_keys(&self) -> Result<()> {
        use jsonwebtoken::{Header, Validation, decode, encode};

        #[derive(Debug, Clone, Serialize, Deserialize)]
        struct ProbeClaims {
            sub: String,
            exp: i64,
        }

        let claims = ProbeClaims {
            sub: "probe".to_owned(),
            exp: jiff::Timestamp::now().as_second() + 300,
        };

        let token = encode(&Header::new(Self::ALGORITHM), &claims, self.encoding_key())
            .map_err(|e| Error::auth("key validation encoding failed").with_source(e))?;

        let validation = Validation::new(Self::ALGORITHM);
        decode::<ProbeClaims>(&token, self.decoding_key(), &validation)
            .map_err(|e| Error::auth("key validation decoding failed").with_source(e))?;

        tracing::debug!(target: TRACING_TARGET, "Session key validation successful");
        Ok(())
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
