//! Constants used throughout vaultmap.
//!
//! Centralizes magic strings and default configuration values.

/// Configuration file name (.vaultmap.toml).
pub const CONFIG_FILE: &str = ".vaultmap.toml";

/// Prefix marking a top-level key as already converted.
pub const DEFAULT_PREFIX: &str = "vault_";

/// Marker appended to a document's stem to name its mapping file.
pub const DEFAULT_MAP_SUFFIX: &str = "__map";

/// File extensions treated as secret documents.
pub const DEFAULT_EXTENSIONS: &[&str] = &["yml"];

/// Custom YAML tags decoded as opaque scalars.
///
/// `!unsafe` marks values Ansible must not template; `!vault` marks
/// inline-encrypted values.
pub const DEFAULT_TAGS: &[&str] = &["!unsafe", "!vault"];

/// Text standing in for every secret value in the rendered shape.
pub const SENTINEL: &str = "secret";

/// Environment variable holding the vault password.
pub const PASSWORD_ENV: &str = "VAULTMAP_PASSWORD";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "VAULTMAP_LOG";
