//! Printable-token encryption for stored platform credentials.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;

use super::cipher::{decrypt, encrypt};
use super::error::{CryptoError, CryptoResult};
use super::key::EncryptionKey;
use crate::TRACING_TARGET_CRYPTO;

/// Encrypts credential strings into printable tokens and back.
///
/// A token is the URL-safe base64 form of `nonce || ciphertext || tag`, so it
/// fits a plain text column and travels through JSON and URLs unescaped. The
/// empty string is reserved for "no secret stored" and bypasses the cipher in
/// both directions.
///
/// The cipher holds nothing but its key, so clones are cheap and it can be
/// shared freely across tasks.
#[derive(Debug, Clone)]
pub struct CredentialCipher {
    key: EncryptionKey,
}

impl CredentialCipher {
    /// Creates a cipher bound to the given key.
    pub fn new(key: EncryptionKey) -> Self {
        Self { key }
    }

    /// Encrypts `plaintext` into a printable token.
    ///
    /// Returns `""` for empty input. Otherwise every call uses a fresh nonce,
    /// so the same plaintext never yields the same token twice.
    pub fn encrypt(&self, plaintext: &str) -> String {
        match self.try_encrypt(plaintext) {
            Ok(token) => token,
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_CRYPTO,
                    reason = error.as_str(),
                    "failed to encrypt credential"
                );
                String::new()
            }
        }
    }

    /// Encrypts `plaintext`, surfacing cipher failures instead of hiding them.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::EncryptionFailed`] if the cipher rejects the input.
    pub fn try_encrypt(&self, plaintext: &str) -> CryptoResult<String> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }

        let ciphertext = encrypt(&self.key, plaintext.as_bytes())?;
        Ok(URL_SAFE.encode(ciphertext))
    }

    /// Decrypts a token produced by [`encrypt`](Self::encrypt).
    ///
    /// Returns `""` for empty input, and also whenever the token cannot be
    /// decoded or authenticated. Use [`try_decrypt`](Self::try_decrypt) to
    /// tell a missing secret apart from a corrupted one.
    pub fn decrypt(&self, token: &str) -> String {
        match self.try_decrypt(token) {
            Ok(plaintext) => plaintext,
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_CRYPTO,
                    reason = error.as_str(),
                    "failed to decrypt credential token"
                );
                String::new()
            }
        }
    }

    /// Decrypts a token, keeping the reason when it fails.
    ///
    /// Returns `Ok("")` for empty input.
    ///
    /// # Errors
    ///
    /// - [`CryptoError::InvalidEncoding`] if the token is not URL-safe base64
    /// - [`CryptoError::CiphertextTooShort`] if the token is truncated
    /// - [`CryptoError::DecryptionFailed`] on a wrong key or tampered token
    /// - [`CryptoError::InvalidUtf8`] if the plaintext is not UTF-8
    pub fn try_decrypt(&self, token: &str) -> CryptoResult<String> {
        if token.is_empty() {
            return Ok(String::new());
        }

        let ciphertext = URL_SAFE
            .decode(token)
            .map_err(|_| CryptoError::InvalidEncoding)?;
        let plaintext = decrypt(&self.key, &ciphertext)?;

        String::from_utf8(plaintext).map_err(|_| CryptoError::InvalidUtf8)
    }
}

impl From<EncryptionKey> for CredentialCipher {
    fn from(key: EncryptionKey) -> Self {
        Self::new(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{NONCE_SIZE, TAG_SIZE};

    fn cipher() -> CredentialCipher {
        CredentialCipher::new(EncryptionKey::generate())
    }

    #[test]
    fn test_roundtrip() {
        let cipher = cipher();
        let long = "long".repeat(512);

        for plaintext in ["hunter2", "p@ss w0rd!", "비밀번호123", "x", long.as_str()] {
            let token = cipher.encrypt(plaintext);
            assert_eq!(cipher.decrypt(&token), plaintext);
        }
    }

    #[test]
    fn test_empty_short_circuit() {
        let cipher = cipher();

        assert_eq!(cipher.encrypt(""), "");
        assert_eq!(cipher.decrypt(""), "");
        assert_eq!(cipher.try_decrypt(""), Ok(String::new()));
    }

    #[test]
    fn test_hunter2_token_is_printable_and_longer() {
        let cipher = cipher();
        let token = cipher.encrypt("hunter2");

        assert!(token.len() > "hunter2".len());
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '='))
        );
        assert_eq!(cipher.decrypt(&token), "hunter2");
    }

    #[test]
    fn test_token_length_matches_wire_format() -> anyhow::Result<()> {
        let cipher = cipher();
        let token = cipher.encrypt("hunter2");

        let raw = URL_SAFE.decode(&token)?;
        assert_eq!(raw.len(), NONCE_SIZE + "hunter2".len() + TAG_SIZE);
        Ok(())
    }

    #[test]
    fn test_non_deterministic() {
        let cipher = cipher();

        let token1 = cipher.encrypt("samePassword");
        let token2 = cipher.encrypt("samePassword");

        assert_ne!(token1, token2);
        assert_eq!(cipher.decrypt(&token1), "samePassword");
        assert_eq!(cipher.decrypt(&token2), "samePassword");
    }

    #[test]
    fn test_key_sensitivity() {
        let token = cipher().encrypt("hunter2");
        let other = cipher();

        assert_eq!(other.decrypt(&token), "");
        assert_eq!(
            other.try_decrypt(&token),
            Err(CryptoError::DecryptionFailed)
        );
    }

    #[test]
    fn test_tamper_resistance() -> anyhow::Result<()> {
        let cipher = cipher();
        let raw = URL_SAFE.decode(cipher.encrypt("hunter2"))?;

        for index in 0..raw.len() {
            let mut tampered = raw.clone();
            tampered[index] ^= 0x80;
            let token = URL_SAFE.encode(&tampered);

            assert_eq!(cipher.decrypt(&token), "");
            assert_eq!(
                cipher.try_decrypt(&token),
                Err(CryptoError::DecryptionFailed)
            );
        }

        Ok(())
    }

    #[test]
    fn test_invalid_token_collapses_to_empty() {
        let cipher = cipher();

        assert_eq!(cipher.decrypt("not-a-valid-token!!"), "");
        assert_eq!(
            cipher.try_decrypt("not-a-valid-token!!"),
            Err(CryptoError::InvalidEncoding)
        );
    }

    #[test]
    fn test_truncated_token() {
        let cipher = cipher();
        let token = URL_SAFE.encode([0u8; 8]);

        assert_eq!(cipher.decrypt(&token), "");
        assert_eq!(
            cipher.try_decrypt(&token),
            Err(CryptoError::CiphertextTooShort)
        );
    }

    #[test]
    fn test_invalid_utf8_plaintext() -> anyhow::Result<()> {
        let key = EncryptionKey::generate();
        let raw = encrypt(&key, &[0xff, 0xfe, 0xfd])?;
        let cipher = CredentialCipher::new(key);

        assert_eq!(
            cipher.try_decrypt(&URL_SAFE.encode(raw)),
            Err(CryptoError::InvalidUtf8)
        );
        Ok(())
    }

    #[test]
    fn test_shared_across_threads() {
        let cipher = cipher();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cipher = cipher.clone();
                std::thread::spawn(move || {
                    let plaintext = format!("secret-{i}");
                    cipher.decrypt(&cipher.encrypt(&plaintext)) == plaintext
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
