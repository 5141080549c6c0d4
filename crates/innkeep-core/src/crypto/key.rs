//! Encryption key management.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};
use chacha20poly1305::XChaCha20Poly1305;
use chacha20poly1305::aead::{KeyInit, OsRng};

use super::error::{CryptoError, CryptoResult};

/// The size of an XChaCha20-Poly1305 key in bytes.
pub const KEY_SIZE: usize = 32;

/// A 256-bit encryption key for XChaCha20-Poly1305.
///
/// The key lives in memory for the lifetime of the process and is never
/// printed: the [`Debug`] implementation redacts it.
#[derive(Clone)]
pub struct EncryptionKey {
    bytes: [u8; KEY_SIZE],
}

impl EncryptionKey {
    /// Creates a new encryption key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] if the slice is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength)?;
        Ok(Self { bytes })
    }

    /// Parses a key from its printable form.
    ///
    /// Accepts URL-safe base64 with or without padding, and the standard
    /// alphabet, as long as it decodes to exactly 32 bytes. Surrounding
    /// whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidEncoding`] if the text is not base64, and
    /// [`CryptoError::InvalidKeyLength`] if it decodes to the wrong size.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let encoded = encoded.trim();
        let bytes = URL_SAFE
            .decode(encoded)
            .or_else(|_| URL_SAFE_NO_PAD.decode(encoded))
            .or_else(|_| STANDARD.decode(encoded))
            .map_err(|_| CryptoError::InvalidEncoding)?;

        Self::from_bytes(&bytes)
    }

    /// Generates a new random encryption key using the operating system RNG.
    #[must_use]
    pub fn generate() -> Self {
        let key = XChaCha20Poly1305::generate_key(&mut OsRng);
        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(&key);
        Self { bytes }
    }

    /// Returns the raw key bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    /// Returns the key in its printable form (padded URL-safe base64).
    #[must_use]
    pub fn to_base64(&self) -> String {
        URL_SAFE.encode(self.bytes)
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

impl TryFrom<&[u8]> for EncryptionKey {
    type Error = CryptoError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl TryFrom<Vec<u8>> for EncryptionKey {
    type Error = CryptoError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_key() {
        let key1 = EncryptionKey::generate();
        let key2 = EncryptionKey::generate();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_from_bytes_valid() -> anyhow::Result<()> {
        let bytes = [7u8; KEY_SIZE];
        let key = EncryptionKey::from_bytes(&bytes)?;
        assert_eq!(key.as_bytes(), &bytes);
        Ok(())
    }

    #[test]
    fn test_from_bytes_invalid_length() {
        let short = [0u8; 16];
        assert_eq!(
            EncryptionKey::from_bytes(&short).unwrap_err(),
            CryptoError::InvalidKeyLength
        );

        let long = [0u8; 64];
        assert_eq!(
            EncryptionKey::from_bytes(&long).unwrap_err(),
            CryptoError::InvalidKeyLength
        );
    }

    #[test]
    fn test_base64_roundtrip() -> anyhow::Result<()> {
        let key = EncryptionKey::generate();
        let parsed = EncryptionKey::from_base64(&key.to_base64())?;
        assert_eq!(key.as_bytes(), parsed.as_bytes());
        Ok(())
    }

    #[test]
    fn test_from_base64_accepts_unpadded_and_whitespace() -> anyhow::Result<()> {
        let bytes = [0xfbu8; KEY_SIZE];
        let unpadded = URL_SAFE_NO_PAD.encode(bytes);

        let key = EncryptionKey::from_base64(&format!("  {unpadded}\n"))?;
        assert_eq!(key.as_bytes(), &bytes);
        Ok(())
    }

    #[test]
    fn test_from_base64_rejects_garbage() {
        assert_eq!(
            EncryptionKey::from_base64("definitely not a key!").unwrap_err(),
            CryptoError::InvalidEncoding
        );
    }

    #[test]
    fn test_from_base64_rejects_short_key() {
        let short = URL_SAFE.encode([1u8; 16]);
        assert_eq!(
            EncryptionKey::from_base64(&short).unwrap_err(),
            CryptoError::InvalidKeyLength
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = EncryptionKey::generate();
        let debug = format!("{:?}", key);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(&key.to_base64()));
    }
}
