//! Candidate file discovery.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::constants::{DEFAULT_EXTENSIONS, DEFAULT_MAP_SUFFIX};
use crate::core::render::mapping_file_name;
use crate::error::{ConfigError, Result};

/// How secret documents and their mapping files are named on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Extensions without the leading dot.
    pub extensions: Vec<String>,
    /// Marker appended to a document's stem for its mapping file.
    pub map_suffix: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            map_suffix: DEFAULT_MAP_SUFFIX.to_string(),
        }
    }
}

impl Layout {
    /// Whether a file name denotes a secret document.
    ///
    /// Generated mapping files share the extension but are never candidates.
    pub fn is_candidate(&self, file_name: &str) -> bool {
        self.extensions.iter().any(|ext| {
            let ext = format!(".{}", ext);
            file_name.ends_with(&ext)
                && !file_name.ends_with(&format!("{}{}", self.map_suffix, ext))
        })
    }

    /// Mapping file path for a secret document.
    pub fn mapping_path(&self, document: &Path) -> PathBuf {
        mapping_file_name(document, &self.map_suffix)
    }
}

/// Find every secret document below `root`, sorted by path.
///
/// # Errors
///
/// Returns `ConfigError::DirectoryNotFound` if `root` is not a directory.
pub fn discover(root: &Path, layout: &Layout) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ConfigError::DirectoryNotFound(root.to_path_buf()).into());
    }
    debug!(root = %root.display(), "discovering secret documents");

    let mut found = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        // Follows symlinked files; symlinked directories are not descended.
        if !entry.path().is_file() {
            continue;
        }
        if layout.is_candidate(&entry.file_name().to_string_lossy()) {
            found.push(entry.into_path());
        }
    }

    found.sort();
    debug!(count = found.len(), "discovered secret documents");
    Ok(found)
}
