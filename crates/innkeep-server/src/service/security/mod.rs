//! Key material and password handling.
//!
//! - [`MasterKey`]: the process-wide key that encrypts stored platform credentials.
//! - [`PasswordHasher`]: Argon2id hashing of user login passwords.
//! - [`SessionKeys`]: HS256 signing keys for access tokens.

mod master_key;
mod password_hasher;
mod session_keys;

pub use master_key::{MasterKey, MasterKeyConfig, MasterKeySource};
pub use password_hasher::PasswordHasher;
pub use session_keys::{SessionKeys, SessionKeysConfig};
