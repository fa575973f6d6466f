//! Per-file processing.
//!
//! Each secret document goes through decrypt → parse → extract → render →
//! write mapping file → (optionally) prefix keys and re-encrypt. Files are
//! isolated: an error in one is recorded in the [`Report`] and the run moves
//! on to the next.

use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::core::cipher::{Credential, SecretStore};
use crate::core::config::Config;
use crate::core::discover::Layout;
use crate::core::document::{Document, TagPolicy};
use crate::core::prefix::NamingConvention;
use crate::core::render::render;
use crate::core::shape::extract;
use crate::error::{Error, FailureKind, Result};

/// What happened to one file's encrypted original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Status {
    /// Keys were prefixed and the file re-encrypted.
    Rewritten,
    /// All keys were already prefixed; the file was not touched.
    Unchanged,
    /// Prefixing was disabled.
    Kept,
    /// Processing stopped at an error.
    Failed { kind: FailureKind, message: String },
}

/// Result of processing one secret document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// Mapping file written, if processing got that far.
    pub mapping: Option<PathBuf>,
    #[serde(flatten)]
    pub status: Status,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub files: Vec<FileOutcome>,
}

impl Report {
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, Status::Failed { .. }))
    }

    pub fn mapped(&self) -> usize {
        self.files.len() - self.failed()
    }

    pub fn rewritten(&self) -> usize {
        self.count(|s| *s == Status::Rewritten)
    }

    fn count(&self, pred: impl Fn(&Status) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.status)).count()
    }
}

/// Processes secret documents against one store and one set of rules.
#[derive(Debug, Clone)]
pub struct Pipeline<S> {
    store: S,
    convention: NamingConvention,
    tags: TagPolicy,
    layout: Layout,
    keep_originals: bool,
}

impl<S: SecretStore> Pipeline<S> {
    pub fn new(
        store: S,
        convention: NamingConvention,
        tags: TagPolicy,
        layout: Layout,
        keep_originals: bool,
    ) -> Self {
        Self {
            store,
            convention,
            tags,
            layout,
            keep_originals,
        }
    }

    /// Build a pipeline from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an invalid prefix.
    pub fn from_config(store: S, config: &Config) -> Result<Self> {
        Ok(Self::new(
            store,
            config.convention()?,
            config.tag_policy(),
            config.layout(),
            config.keep_originals,
        ))
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Process every path, collecting one outcome per file.
    pub fn run(&self, paths: &[PathBuf], credential: &Credential) -> Report {
        let mut report = Report::default();

        for path in paths {
            let outcome = match self.process_file(path, credential) {
                Ok(outcome) => outcome,
                Err(e) => {
                    let kind = e.kind();
                    warn!(path = %path.display(), %kind, error = %e, "skipping file");
                    FileOutcome {
                        path: path.clone(),
                        mapping: self.mapping_if_current(path, &e),
                        status: Status::Failed {
                            kind,
                            message: e.to_string(),
                        },
                    }
                }
            };
            report.files.push(outcome);
        }

        report
    }

    /// Process one secret document.
    ///
    /// The file is decrypted once; the same plaintext feeds both the mapping
    /// file and the key prefixer.
    ///
    /// # Errors
    ///
    /// Any failure before the mapping file is written leaves the file system
    /// untouched. Failures after the keys were renamed are wrapped in
    /// [`Error::StoreInconsistent`].
    pub fn process_file(&self, path: &Path, credential: &Credential) -> Result<FileOutcome> {
        let context = vault_context(path);
        debug!(
            path = %path.display(),
            context = %context,
            store = self.store.name(),
            prefix = self.convention.prefix(),
            "processing"
        );

        let blob = std::fs::read(path)?;
        let plaintext = self.store.decrypt(&blob, credential, &context)?;

        let document = Document::parse(&plaintext, &self.tags)?;
        let shape = extract(document.root());
        debug!(depth = shape.depth(), "extracted shape");
        self.convention.check_collisions(&shape.top_level_keys()?)?;
        let rendered = render(path, &shape, &self.convention)?;

        let mapping = self.layout.mapping_path(path);
        write_atomic(&mapping, rendered.as_bytes())?;
        info!(path = %path.display(), mapping = %mapping.display(), "wrote mapping file");

        let status = if self.keep_originals {
            Status::Kept
        } else {
            match self.convention.rewrite(&plaintext) {
                Cow::Borrowed(_) => Status::Unchanged,
                Cow::Owned(rewritten) => {
                    let rewritten = Zeroizing::new(rewritten);
                    self.reseal(path, &rewritten, credential, &context)
                        .map_err(|e| Error::StoreInconsistent {
                            path: path.to_path_buf(),
                            source: Box::new(e),
                        })?;
                    info!(path = %path.display(), "prefixed top-level keys");
                    Status::Rewritten
                }
            }
        };

        Ok(FileOutcome {
            path: path.to_path_buf(),
            mapping: Some(mapping),
            status,
        })
    }

    fn reseal(
        &self,
        path: &Path,
        plaintext: &str,
        credential: &Credential,
        context: &str,
    ) -> Result<()> {
        let blob = self.store.encrypt(plaintext, credential, context)?;
        write_atomic(path, &blob)
    }

    fn mapping_if_current(&self, path: &Path, err: &Error) -> Option<PathBuf> {
        matches!(err, Error::StoreInconsistent { .. }).then(|| self.layout.mapping_path(path))
    }
}

/// Name of the vault a document belongs to: its parent directory.
pub fn vault_context(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "default".to_string())
}

/// Replace `target` with `contents`, or leave it untouched on failure.
///
/// Writes to a temporary file in the same directory and renames it over the
/// target. An existing target's permissions are carried over. A symlinked
/// target is resolved first so the link itself survives.
fn write_atomic(target: &Path, contents: &[u8]) -> Result<()> {
    let resolved;
    let target = if target.is_symlink() {
        resolved = std::fs::canonicalize(target)?;
        resolved.as_path()
    } else {
        target
    };
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    if let Ok(meta) = std::fs::metadata(target) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}
