//! Master key for platform credential encryption.
//!
//! The key is resolved once at startup, in order of precedence:
//!
//! 1. `ENCRYPTION_KEY`: base64 text of exactly 32 bytes.
//! 2. `ENCRYPTION_KEY_FILEPATH`: a file holding the raw 32 bytes or their base64 text.
//! 3. A freshly generated ephemeral key, unless `REQUIRE_ENCRYPTION_KEY` is set.
//!
//! A configured but malformed key is always fatal and never silently replaced.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use innkeep_core::crypto::{CredentialCipher, CryptoError, CryptoResult, EncryptionKey, KEY_SIZE};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Tracing target for master key operations.
const TRACING_TARGET: &str = "innkeep_server::master_key";

/// Where the master key comes from.
#[derive(Clone, Default, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct MasterKeyConfig {
    /// Base64 encoded 32-byte master encryption key.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long = "encryption-key", env = "ENCRYPTION_KEY", hide_env_values = true)
    )]
    #[serde(default)]
    pub encryption_key: Option<String>,

    /// File holding the 32-byte master key, raw or base64 encoded.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long = "encryption-key-filepath", env = "ENCRYPTION_KEY_FILEPATH")
    )]
    #[serde(default)]
    pub encryption_key_filepath: Option<PathBuf>,

    /// Refuse to start with an ephemeral key when no key is configured.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long = "require-encryption-key", env = "REQUIRE_ENCRYPTION_KEY")
    )]
    #[serde(default)]
    pub require_encryption_key: bool,
}

impl MasterKeyConfig {
    /// Creates a configuration with an inline base64 key.
    pub fn with_encryption_key(mut self, encryption_key: impl Into<String>) -> Self {
        self.encryption_key = Some(encryption_key.into());
        self
    }

    /// Creates a configuration reading the key from a file.
    pub fn with_encryption_key_filepath(mut self, path: impl Into<PathBuf>) -> Self {
        self.encryption_key_filepath = Some(path.into());
        self
    }

    /// Makes a missing key fatal.
    pub fn with_require_encryption_key(mut self, required: bool) -> Self {
        self.require_encryption_key = required;
        self
    }

    /// Returns an error if a missing key would be fatal.
    pub fn validate(&self) -> Result<()> {
        if let Some(encryption_key) = &self.encryption_key
            && encryption_key.trim().is_empty()
        {
            return Err(Error::config("ENCRYPTION_KEY is set but empty"));
        }

        let missing = self.encryption_key.is_none() && self.encryption_key_filepath.is_none();
        if missing && self.require_encryption_key {
            return Err(Error::config(
                "an encryption key is required: set ENCRYPTION_KEY or ENCRYPTION_KEY_FILEPATH",
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for MasterKeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterKeyConfig")
            .field(
                "encryption_key",
                &self.encryption_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("encryption_key_filepath", &self.encryption_key_filepath)
            .field("require_encryption_key", &self.require_encryption_key)
            .finish()
    }
}

/// Which configuration source produced the master key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterKeySource {
    /// Inline `ENCRYPTION_KEY` value.
    Environment,
    /// Key file at `ENCRYPTION_KEY_FILEPATH`.
    File,
    /// Generated at startup; lost on restart.
    Ephemeral,
}

/// Process-wide key for encrypting stored platform credentials.
///
/// Cloning is cheap and every clone shares the same key. The key itself is
/// never logged or printed.
#[derive(Clone)]
pub struct MasterKey {
    inner: Arc<MasterKeyInner>,
}

struct MasterKeyInner {
    cipher: CredentialCipher,
    source: MasterKeySource,
}

impl MasterKey {
    /// Resolves the master key from configuration.
    ///
    /// # Errors
    ///
    /// - a malformed inline key or key file
    /// - an unreadable key file
    /// - no key configured while `require_encryption_key` is set
    pub async fn from_config(config: &MasterKeyConfig) -> Result<Self> {
        config.validate()?;

        if let Some(encoded) = &config.encryption_key {
            return Self::from_base64(encoded);
        }

        if let Some(path) = &config.encryption_key_filepath {
            return Self::new(path).await;
        }

        tracing::warn!(
            target: TRACING_TARGET,
            "No ENCRYPTION_KEY configured: generated an ephemeral master key. Platform \
             credentials stored during this run become unreadable after a restart. Set \
             ENCRYPTION_KEY (or ENCRYPTION_KEY_FILEPATH) to a persistent 32-byte key",
        );
        Ok(Self::ephemeral())
    }

    /// Parses the master key from its base64 text form.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let key = EncryptionKey::from_base64(encoded).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                reason = e.as_str(),
                "Invalid ENCRYPTION_KEY",
            );
            Error::config("Invalid ENCRYPTION_KEY: expected base64 of exactly 32 bytes")
                .with_source(e)
        })?;

        tracing::info!(
            target: TRACING_TARGET,
            "Master encryption key loaded from environment",
        );

        Ok(Self::with_source(key, MasterKeySource::Environment))
    }

    /// Loads the master key from a file.
    pub async fn new(key_path: impl AsRef<Path>) -> Result<Self> {
        let path = key_path.as_ref();
        Self::validate_path(path)?;
        Self::load(path).await
    }

    /// Generates a random key that lives only as long as the process.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self::with_source(EncryptionKey::generate(), MasterKeySource::Ephemeral)
    }

    fn with_source(key: EncryptionKey, source: MasterKeySource) -> Self {
        let inner = MasterKeyInner {
            cipher: CredentialCipher::new(key),
            source,
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Returns where the key came from.
    #[inline]
    pub fn source(&self) -> MasterKeySource {
        self.inner.source
    }

    /// Returns true if the key was generated at startup.
    #[inline]
    pub fn is_ephemeral(&self) -> bool {
        self.inner.source == MasterKeySource::Ephemeral
    }

    /// Encrypts a credential for storage. Empty input stays empty.
    #[inline]
    pub fn encrypt(&self, plaintext: &str) -> String {
        self.inner.cipher.encrypt(plaintext)
    }

    /// Decrypts a stored credential, returning `""` on any failure.
    #[inline]
    pub fn decrypt(&self, token: &str) -> String {
        self.inner.cipher.decrypt(token)
    }

    /// Decrypts a stored credential, keeping the failure reason.
    #[inline]
    pub fn try_decrypt(&self, token: &str) -> CryptoResult<String> {
        self.inner.cipher.try_decrypt(token)
    }

    /// Validates that the key file exists and is a regular file.
    fn validate_path(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(Error::config("Encryption key file does not exist"));
        }

        if !path.is_file() {
            return Err(Error::config("Encryption key path is not a file"));
        }

        Ok(())
    }

    /// Reads the key file: exactly 32 raw bytes, or the base64 text form.
    async fn load(path: &Path) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET,
            path = %path.display(),
            "Loading master encryption key",
        );

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                path = %path.display(),
                error = %e,
                "Failed to read encryption key file",
            );
            Error::file_system("Failed to read encryption key file").with_source(e)
        })?;

        let key = if bytes.len() == KEY_SIZE {
            EncryptionKey::from_bytes(&bytes)
        } else {
            std::str::from_utf8(&bytes)
                .map_err(|_| CryptoError::InvalidEncoding)
                .and_then(EncryptionKey::from_base64)
        };

        let key = key.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                path = %path.display(),
                reason = e.as_str(),
                "Invalid encryption key file",
            );
            Error::config("Invalid encryption key file: expected 32 raw bytes or their base64")
                .with_source(e)
        })?;

        tracing::info!(
            target: TRACING_TARGET,
            path = %path.display(),
            "Master encryption key loaded from file",
        );

        Ok(Self::with_source(key, MasterKeySource::File))
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterKey")
            .field("key", &"[REDACTED]")
            .field("source", &self.inner.source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn load_raw_key_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let key_path = temp_dir.path().join("encryption.key");
        fs::write(&key_path, [0xABu8; 32])?;

        let master_key = MasterKey::new(&key_path).await?;
        assert_eq!(master_key.source(), MasterKeySource::File);

        let token = master_key.encrypt("hunter2");
        let expected = CredentialCipher::new(EncryptionKey::from_bytes(&[0xAB; 32])?);
        assert_eq!(expected.decrypt(&token), "hunter2");
        Ok(())
    }

    #[tokio::test]
    async fn load_base64_key_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let key_path = temp_dir.path().join("encryption.key");
        let key = EncryptionKey::generate();
        fs::write(&key_path, format!("{}\n", key.to_base64()))?;

        let master_key = MasterKey::new(&key_path).await?;
        let token = CredentialCipher::new(key).encrypt("samePassword");
        assert_eq!(master_key.decrypt(&token), "samePassword");
        Ok(())
    }

    #[tokio::test]
    async fn reject_invalid_key_length() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let key_path = temp_dir.path().join("encryption.key");
        fs::write(&key_path, [0u8; 16])?;

        assert!(MasterKey::new(&key_path).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn reject_missing_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let key_path = temp_dir.path().join("nonexistent.key");

        assert!(MasterKey::new(&key_path).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn inline_key_takes_precedence() -> anyhow::Result<()> {
        let key = EncryptionKey::generate();
        let config = MasterKeyConfig::default()
            .with_encryption_key(key.to_base64())
            .with_encryption_key_filepath("/nonexistent/encryption.key");

        let master_key = MasterKey::from_config(&config).await?;
        assert_eq!(master_key.source(), MasterKeySource::Environment);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_inline_key_is_fatal() {
        let config = MasterKeyConfig::default().with_encryption_key("not-a-key!!");
        let error = MasterKey::from_config(&config).await.err();
        assert_eq!(error.map(|e| e.kind()), Some(crate::ErrorKind::Config));
    }

    #[tokio::test]
    async fn missing_key_falls_back_to_ephemeral() -> anyhow::Result<()> {
        let master_key = MasterKey::from_config(&MasterKeyConfig::default()).await?;
        assert!(master_key.is_ephemeral());

        let token = master_key.encrypt("hunter2");
        assert_eq!(master_key.decrypt(&token), "hunter2");
        Ok(())
    }

    #[tokio::test]
    async fn missing_key_is_fatal_when_required() {
        let config = MasterKeyConfig::default().with_require_encryption_key(true);
        assert!(MasterKey::from_config(&config).await.is_err());
    }

    #[test]
    fn debug_output_is_redacted() {
        let key = EncryptionKey::generate();
        let encoded = key.to_base64();
        let config = MasterKeyConfig::default().with_encryption_key(encoded.clone());

        assert!(!format!("{config:?}").contains(&encoded));
        assert!(format!("{:?}", MasterKey::ephemeral()).contains("[REDACTED]"));
    }
}
