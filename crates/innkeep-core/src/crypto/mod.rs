//! Reversible encryption for stored platform credentials.
//!
//! Third-party passwords must be readable again later, so unlike user
//! passwords they are encrypted rather than hashed. Everything here runs under
//! a single process-wide [`EncryptionKey`] using XChaCha20-Poly1305.
//!
//! # Example
//!
//! ```rust,ignore
//! use innkeep_core::crypto::{CredentialCipher, EncryptionKey};
//!
//! let cipher = CredentialCipher::new(EncryptionKey::generate());
//! let token = cipher.encrypt("hunter2");
//! assert_eq!(cipher.decrypt(&token), "hunter2");
//! ```

mod cipher;
mod credential;
mod error;
mod key;

pub use cipher::{MIN_CIPHERTEXT_SIZE, NONCE_SIZE, TAG_SIZE, decrypt, encrypt};
pub use credential::CredentialCipher;
pub use error::{CryptoError, CryptoResult};
pub use key::{EncryptionKey, KEY_SIZE};
