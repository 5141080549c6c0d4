//! Cryptographic error types.

use thiserror::Error;

/// Result type for cryptographic operations.
pub type CryptoResult<T, E = CryptoError> = std::result::Result<T, E>;

/// Errors that can occur during cryptographic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The token is not valid base64.
    #[error("token is not valid url-safe base64")]
    InvalidEncoding,
    /// The ciphertext is too short to contain a valid nonce and tag.
    #[error("ciphertext too short to contain nonce and authentication tag")]
    CiphertextTooShort,
    /// Decryption failed - wrong key, corrupted data or tampering.
    #[error("decryption failed: data may be corrupted or tampered with")]
    DecryptionFailed,
    /// The decrypted bytes are not valid UTF-8.
    #[error("decrypted plaintext is not valid utf-8")]
    InvalidUtf8,
    /// The provided key has an invalid length.
    #[error("invalid key length: expected 32 bytes")]
    InvalidKeyLength,
    /// The cipher refused to encrypt the plaintext.
    #[error("encryption failed")]
    EncryptionFailed,
}

impl CryptoError {
    /// Returns a short, stable identifier for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidEncoding => "invalid_encoding",
            Self::CiphertextTooShort => "ciphertext_too_short",
            Self::DecryptionFailed => "decryption_failed",
            Self::InvalidUtf8 => "invalid_utf8",
            Self::InvalidKeyLength => "invalid_key_length",
            Self::EncryptionFailed => "encryption_failed",
        }
    }
}
