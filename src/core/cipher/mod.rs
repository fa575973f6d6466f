//! Secret store access.
//!
//! Encrypted documents are opened and sealed through a [`SecretStore`]. The
//! engine never looks inside ciphertext itself, so another backend only has
//! to implement the trait.
//!
//! ## Backends
//!
//! - **age passphrase**: Default. scrypt-protected age files with ASCII armor.

use std::fmt;

use zeroize::Zeroizing;

use crate::error::Result;

mod age;

pub use self::age::AgePassphrase;

/// A vault password.
///
/// The buffer is wiped on drop and never printed.
#[derive(Clone)]
pub struct Credential(Zeroizing<String>);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Zeroizing::new(secret.into()))
    }

    /// The raw password, for handing to a backend.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Encrypts and decrypts whole secret documents.
///
/// `context` names the vault a document belongs to (its parent directory).
/// Backends may bind it into the ciphertext or only use it for diagnostics.
pub trait SecretStore {
    /// Backend name for display.
    fn name(&self) -> &'static str;

    /// Decrypt a stored blob.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::Credential` if the credential is rejected and
    /// `CipherError::InvalidBlob` if `blob` is not in this backend's format.
    fn decrypt(&self, blob: &[u8], credential: &Credential, context: &str)
        -> Result<Zeroizing<String>>;

    /// Encrypt plaintext into a storable blob.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::EncryptionFailed` if encryption fails.
    fn encrypt(&self, plaintext: &str, credential: &Credential, context: &str) -> Result<Vec<u8>>;
}
