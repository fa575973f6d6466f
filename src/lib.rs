//! Vaultmap - Commit the shape of your secrets, not their values.
//!
//! Walks a directory of encrypted YAML secret files, writes a `__map`
//! reference file next to each one listing its keys with template
//! placeholders, and prefixes the original's top-level keys.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── run           # Process a directory tree
//! │   ├── completions   # Shell completions
//! │   └── output        # Terminal output helpers
//! └── core/             # Core library components
//!     ├── config        # .vaultmap.toml management
//!     ├── cipher/       # Secret store backends
//!     │   ├── mod       # SecretStore trait, Credential
//!     │   └── age       # age passphrase implementation
//!     ├── discover      # Candidate file discovery
//!     ├── document      # YAML decoding into a closed node tree
//!     ├── shape         # Structure extraction
//!     ├── render        # Mapping file rendering
//!     ├── prefix        # Naming convention and key prefixing
//!     └── pipeline      # Per-file orchestration and reports
//! ```

pub mod cli;
pub mod core;
pub mod error;
