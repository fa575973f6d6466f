//! Mapping file rendering.
//!
//! A mapping file documents a secret document's shape in a comment block and
//! maps each logical top-level key to a template placeholder referencing the
//! prefixed key actually stored in the vault:
//!
//! ```text
//! ### data structure in secrets.yml:
//! #
//! # db:
//! #   user: secret
//! # region: secret
//!
//! ### mapping to vaulted variables:
//! db: "{{ vault_db }}"
//! region: "{{ vault_region }}"
//! ```

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::core::prefix::NamingConvention;
use crate::core::shape::Shape;
use crate::error::{DocumentError, Result};

/// Render the mapping file for `file_name`.
///
/// Only the base name of `file_name` appears in the output. Placeholder
/// lines use the logical (unprefixed) key on the left and the physical
/// (prefixed) key on the right, so the result is the same whether or not the
/// vault's keys were already converted.
///
/// # Errors
///
/// Returns `UnsupportedRootShape` if `shape` is not a mapping.
pub fn render(file_name: &Path, shape: &Shape, convention: &NamingConvention) -> Result<String> {
    let keys = shape.top_level_keys()?;
    let base = file_name
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(out, "### data structure in {}:", base);
    out.push_str("#\n");
    for line in shape.to_yaml()?.lines() {
        let _ = writeln!(out, "# {}", line);
    }

    out.push_str("\n### mapping to vaulted variables:\n");
    for key in keys {
        let placeholder = format!("{{{{ {} }}}}", convention.physical(key));
        let _ = writeln!(
            out,
            "{}: {}",
            yaml_key(convention.logical(key))?,
            serde_json::to_string(&placeholder)?
        );
    }

    Ok(out)
}

/// Path of the mapping file for `path`: `dir/X.ext` becomes `dir/X<suffix>.ext`.
pub fn mapping_file_name(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };
    path.with_file_name(name)
}

/// A key as it must appear in YAML, quoted only when plain style is unsafe.
///
/// Keys that serde_yaml would emit as a block scalar are written as a
/// double-quoted scalar instead so every placeholder stays on one line. A
/// JSON string is a valid YAML double-quoted scalar.
fn yaml_key(key: &str) -> Result<String> {
    let encoded = serde_yaml::to_string(key).map_err(DocumentError::MalformedMarkup)?;
    let encoded = encoded.trim_end_matches('\n');
    if encoded.contains('\n') {
        return Ok(serde_json::to_string(key)?);
    }
    Ok(encoded.to_string())
}
