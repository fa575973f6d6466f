//! Configuration file management.
//!
//! Handles reading and validating the optional `.vaultmap.toml` file. Every
//! field has a default, so a missing file is the same as an empty one.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants;
use crate::core::discover::Layout;
use crate::core::document::TagPolicy;
use crate::core::prefix::NamingConvention;
use crate::error::{ConfigError, Result};

/// Settings read from `.vaultmap.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Prefix marking converted top-level keys
    pub prefix: String,
    /// Extensions of secret documents, without the dot
    pub extensions: Vec<String>,
    /// Marker appended to a document's stem for its mapping file
    pub map_suffix: String,
    /// Custom YAML tags decoded as opaque values
    pub tags: Vec<String>,
    /// Leave the encrypted originals untouched
    pub keep_originals: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: constants::DEFAULT_PREFIX.to_string(),
            extensions: constants::DEFAULT_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            map_suffix: constants::DEFAULT_MAP_SUFFIX.to_string(),
            tags: constants::DEFAULT_TAGS.iter().map(|t| t.to_string()).collect(),
            keep_originals: false,
        }
    }
}

impl Config {
    /// Default config file location inside `dir`.
    pub fn config_path(dir: &Path) -> PathBuf {
        dir.join(constants::CONFIG_FILE)
    }

    /// Load configuration.
    ///
    /// Reads `explicit` if given, otherwise `.vaultmap.toml` in `dir` when it
    /// exists, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` if an explicit file can't be read,
    /// `ConfigError::Parse` for malformed TOML, or `ConfigError::InvalidValue`
    /// if validation fails.
    pub fn load(dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let p = Self::config_path(dir);
                if !p.exists() {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
                p
            }
        };

        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
        Self::parse(&contents)
    }

    /// Parse and validate TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` or `ConfigError::InvalidValue`.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.extensions = config
            .extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_string())
            .collect();
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` on the first invalid field.
    pub fn validate(&self) -> Result<()> {
        NamingConvention::new(self.prefix.as_str())?;

        if self.map_suffix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "map_suffix",
                reason: "cannot be empty".to_string(),
            }
            .into());
        }

        if self.extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "extensions",
                reason: "at least one extension is required".to_string(),
            }
            .into());
        }
        for ext in &self.extensions {
            if ext.is_empty() || ext.contains(['/', '\\']) {
                return Err(ConfigError::InvalidValue {
                    field: "extensions",
                    reason: format!("invalid extension '{}'", ext),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Naming convention for key prefixing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an invalid prefix.
    pub fn convention(&self) -> Result<NamingConvention> {
        NamingConvention::new(self.prefix.as_str())
    }

    /// Accepted custom tags.
    pub fn tag_policy(&self) -> TagPolicy {
        TagPolicy::new(&self.tags)
    }

    /// File naming layout.
    pub fn layout(&self) -> Layout {
        Layout {
            extensions: self.extensions.clone(),
            map_suffix: self.map_suffix.clone(),
        }
    }
}
