//! Error types.
//!
//! Each domain gets its own enum so callers can match on the failure they
//! care about; [`Error`] wraps them all for `?` propagation.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("no password given and no terminal to prompt on")]
    MissingPassword,

    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),
}

/// Secret store errors.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("password rejected for vault '{context}'")]
    Credential { context: String },

    #[error("not an encrypted file: {0}")]
    InvalidBlob(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("armor encoding failed: {0}")]
    ArmorFailed(String),
}

/// Errors decoding or shaping a secret document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("malformed YAML: {0}")]
    MalformedMarkup(#[from] serde_yaml::Error),

    #[error("unhandled tag '{0}' (add it to `tags` in .vaultmap.toml)")]
    UnhandledTag(String),

    #[error("invalid document shape: {0}")]
    InvalidDocumentShape(String),

    #[error("unsupported document root: expected a mapping, found a {0}")]
    UnsupportedRootShape(&'static str),
}

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Keys were renamed in memory but the store file could not be updated.
    #[error(
        "{path}: keys were renamed but the encrypted file could not be updated ({source}); \
         the original is unchanged"
    )]
    StoreInconsistent {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} file(s) failed")]
    Failures(usize),
}

/// Coarse classification of a per-file failure, used in logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    Credential,
    InvalidShape,
    MalformedMarkup,
    Io,
    Cipher,
    StoreInconsistent,
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Credential => "credential",
            Self::InvalidShape => "invalid-shape",
            Self::MalformedMarkup => "malformed-markup",
            Self::Io => "io",
            Self::Cipher => "cipher",
            Self::StoreInconsistent => "store-inconsistent",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

impl Error {
    /// Classify this error for per-file reporting.
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Cipher(CipherError::Credential { .. }) => FailureKind::Credential,
            Error::Cipher(_) => FailureKind::Cipher,
            Error::Document(
                DocumentError::MalformedMarkup(_) | DocumentError::UnhandledTag(_),
            ) => FailureKind::MalformedMarkup,
            Error::Document(
                DocumentError::InvalidDocumentShape(_) | DocumentError::UnsupportedRootShape(_),
            ) => FailureKind::InvalidShape,
            Error::Io(_) => FailureKind::Io,
            Error::StoreInconsistent { .. } => FailureKind::StoreInconsistent,
            Error::Config(_) | Error::Prompt(_) | Error::Json(_) | Error::Failures(_) => {
                FailureKind::Other
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
