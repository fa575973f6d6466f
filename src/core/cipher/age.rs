//! Age passphrase backend implementation.
//!
//! Provides encryption/decryption using the age format with an scrypt
//! passphrase recipient and ASCII armor encoding.

use std::io::{Read, Write};

use ::age::secrecy::SecretString;
use ::age::DecryptError;
use tracing::trace;
use zeroize::Zeroizing;

use super::{Credential, SecretStore};
use crate::error::{CipherError, Result};

/// Passphrase-based age backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct AgePassphrase;

impl SecretStore for AgePassphrase {
    fn name(&self) -> &'static str {
        "age-passphrase"
    }

    fn decrypt(
        &self,
        blob: &[u8],
        credential: &Credential,
        context: &str,
    ) -> Result<Zeroizing<String>> {
        trace!(ciphertext_len = blob.len(), context, "decrypting");

        let reader = ::age::armor::ArmoredReader::new(blob);
        let decryptor = ::age::Decryptor::new(reader).map_err(|e| classify(e, context))?;

        let identity = ::age::scrypt::Identity::new(passphrase(credential));
        let mut reader = decryptor
            .decrypt(std::iter::once(&identity as &dyn ::age::Identity))
            .map_err(|e| classify(e, context))?;

        let mut decrypted = Zeroizing::new(Vec::new());
        reader.read_to_end(&mut *decrypted)?;

        trace!(plaintext_len = decrypted.len(), "decrypted");

        let text = std::str::from_utf8(decrypted.as_slice())
            .map_err(|e| CipherError::DecryptionFailed(format!("UTF-8 error: {}", e)))?;
        Ok(Zeroizing::new(text.to_string()))
    }

    fn encrypt(&self, plaintext: &str, credential: &Credential, context: &str) -> Result<Vec<u8>> {
        trace!(plaintext_len = plaintext.len(), context, "encrypting");

        let encryptor = ::age::Encryptor::with_user_passphrase(passphrase(credential));

        let mut encrypted = Vec::new();
        let mut writer = encryptor
            .wrap_output(::age::armor::ArmoredWriter::wrap_output(
                &mut encrypted,
                ::age::armor::Format::AsciiArmor,
            )?)
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        writer.write_all(plaintext.as_bytes())?;
        let armored = writer
            .finish()
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;
        armored
            .finish()
            .map_err(|e| CipherError::ArmorFailed(format!("{}", e)))?;

        trace!(ciphertext_len = encrypted.len(), "encrypted");

        Ok(encrypted)
    }
}

fn passphrase(credential: &Credential) -> SecretString {
    SecretString::from(credential.expose().to_string())
}

fn classify(err: DecryptError, context: &str) -> crate::error::Error {
    match err {
        DecryptError::DecryptionFailed
        | DecryptError::KeyDecryptionFailed
        | DecryptError::NoMatchingKeys
        | DecryptError::InvalidMac => CipherError::Credential {
            context: context.to_string(),
        }
        .into(),
        DecryptError::InvalidHeader | DecryptError::UnknownFormat => {
            CipherError::InvalidBlob(err.to_string()).into()
        }
        other => CipherError::DecryptionFailed(other.to_string()).into(),
    }
}
