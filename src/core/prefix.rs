//! Naming convention and top-level key prefixing.
//!
//! A top-level key is *converted* when it starts with the convention's
//! prefix. The prefixer renames unconverted keys directly in the decrypted
//! text so comments, quoting and value formatting survive untouched.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::core::constants::DEFAULT_PREFIX;
use crate::error::{ConfigError, DocumentError, Result};

/// Word token at column zero: a top-level key in block-style YAML.
fn top_level_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\w+").expect("static regex is valid"))
}

/// The rule deciding whether a key is already converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    prefix: String,
}

impl NamingConvention {
    /// Create a convention for `prefix`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the prefix is empty or contains
    /// anything but word characters. A prefix like `vault-` would never match
    /// the word token it is prepended to, so rewriting would not be idempotent.
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "prefix",
                reason: "cannot be empty".to_string(),
            }
            .into());
        }
        if let Some(ch) = prefix.chars().find(|c| !(c.is_alphanumeric() || *c == '_')) {
            return Err(ConfigError::InvalidValue {
                field: "prefix",
                reason: format!("invalid character '{}': only word characters are allowed", ch),
            }
            .into());
        }
        Ok(Self { prefix })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether `key` already follows the convention.
    pub fn is_converted(&self, key: &str) -> bool {
        key.starts_with(&self.prefix)
    }

    /// Name stored in the secret document.
    pub fn physical<'a>(&self, key: &'a str) -> Cow<'a, str> {
        if self.is_converted(key) {
            Cow::Borrowed(key)
        } else {
            Cow::Owned(format!("{}{}", self.prefix, key))
        }
    }

    /// Name used by consumers of the mapping file.
    pub fn logical<'a>(&self, key: &'a str) -> &'a str {
        key.strip_prefix(self.prefix.as_str()).unwrap_or(key)
    }

    /// Reject key sets where two keys share a logical name.
    ///
    /// `db` and `vault_db` would render the same placeholder line twice and
    /// prefixing would turn them into one duplicated key, losing a value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDocumentShape` naming the first colliding pair.
    pub fn check_collisions(&self, keys: &[&str]) -> Result<()> {
        let mut seen: HashMap<&str, &str> = HashMap::with_capacity(keys.len());
        for &key in keys {
            let logical = self.logical(key);
            if let Some(first) = seen.insert(logical, key) {
                return Err(DocumentError::InvalidDocumentShape(format!(
                    "top-level keys '{}' and '{}' both map to '{}' under prefix '{}'",
                    first,
                    key,
                    logical,
                    self.prefix()
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Prefix every unconverted top-level key in `text`.
    ///
    /// Only tokens starting at column zero are considered, so nested keys and
    /// the bodies of block scalars are left alone. Returns the input borrowed
    /// when nothing needed renaming.
    pub fn rewrite<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut renamed = 0usize;
        let out = top_level_token().replace_all(text, |caps: &Captures<'_>| {
            let token = &caps[0];
            if self.is_converted(token) {
                token.to_string()
            } else {
                renamed += 1;
                format!("{}{}", self.prefix, token)
            }
        });

        if renamed == 0 {
            return Cow::Borrowed(text);
        }
        debug!(renamed, prefix = %self.prefix, "prefixed top-level keys");
        Cow::Owned(out.into_owned())
    }
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}
