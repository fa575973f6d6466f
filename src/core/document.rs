//! Decoded secret documents.
//!
//! A [`Document`] is the decrypted content of one store file, decoded into a
//! closed [`Node`] tree. Scalar values are kept only long enough to learn the
//! document's shape and never appear in `Debug` output.

use std::fmt;

use serde_yaml::Value;
use tracing::trace;

use crate::error::{DocumentError, Result};

/// A node of a decoded secret document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Ordered mapping with unique string keys.
    Mapping(Vec<(String, Node)>),
    /// Ordered list of nodes.
    Sequence(Vec<Node>),
    /// A leaf value.
    Scalar(Scalar),
}

/// A leaf value of a secret document.
#[derive(Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(serde_yaml::Number),
    String(String),
    /// Value behind a custom tag; only the tag is retained.
    Opaque { tag: String },
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("Null"),
            Scalar::Bool(_) => f.write_str("Bool(<redacted>)"),
            Scalar::Number(_) => f.write_str("Number(<redacted>)"),
            Scalar::String(_) => f.write_str("String(<redacted>)"),
            Scalar::Opaque { tag } => write!(f, "Opaque({})", tag),
        }
    }
}

impl Node {
    /// Human-readable name of this node's variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Mapping(_) => "mapping",
            Node::Sequence(_) => "sequence",
            Node::Scalar(_) => "scalar",
        }
    }

    /// Top-level keys, if this node is a mapping.
    #[cfg(test)]
    pub fn keys(&self) -> Option<impl Iterator<Item = &str>> {
        match self {
            Node::Mapping(entries) => Some(entries.iter().map(|(k, _)| k.as_str())),
            _ => None,
        }
    }
}

/// Custom tags the decoder accepts.
///
/// YAML tags outside this set make decoding fail, since their meaning is
/// unknown. Tags inside it decode to [`Scalar::Opaque`] whatever they wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPolicy {
    tags: Vec<String>,
}

impl TagPolicy {
    /// Build a policy from tag names, with or without the leading `!`.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tags: tags.into_iter().map(|t| normalize_tag(t.as_ref())).collect(),
        }
    }

    /// Whether `tag` maps to an opaque scalar.
    pub fn accepts(&self, tag: &str) -> bool {
        let tag = normalize_tag(tag);
        self.tags.iter().any(|t| *t == tag)
    }
}

impl Default for TagPolicy {
    fn default() -> Self {
        Self::new(crate::core::constants::DEFAULT_TAGS)
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().trim_start_matches('!').to_string()
}

/// A decoded secret document whose root is a mapping or sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Node,
}

impl Document {
    /// Decode YAML text.
    ///
    /// Empty text and a null root decode to an empty mapping.
    ///
    /// # Errors
    ///
    /// - `MalformedMarkup` if the text is not a single YAML document
    /// - `UnhandledTag` if a tag outside `tags` is used
    /// - `InvalidDocumentShape` for scalar roots or non-scalar keys
    pub fn parse(text: &str, tags: &TagPolicy) -> Result<Self> {
        trace!(len = text.len(), "parsing document");

        let value: Value = serde_yaml::from_str(text).map_err(DocumentError::MalformedMarkup)?;
        let root = match value {
            Value::Null => Node::Mapping(Vec::new()),
            other => decode(other, tags)?,
        };

        if let Node::Scalar(_) = root {
            return Err(DocumentError::InvalidDocumentShape(
                "document root is a bare scalar".to_string(),
            )
            .into());
        }

        Ok(Self { root })
    }

    /// Root node (never a scalar).
    pub fn root(&self) -> &Node {
        &self.root
    }
}

fn decode(value: Value, tags: &TagPolicy) -> Result<Node> {
    let node = match value {
        Value::Null => Node::Scalar(Scalar::Null),
        Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
        Value::Number(n) => Node::Scalar(Scalar::Number(n)),
        Value::String(s) => Node::Scalar(Scalar::String(s)),
        Value::Sequence(items) => Node::Sequence(
            items
                .into_iter()
                .map(|item| decode(item, tags))
                .collect::<Result<_>>()?,
        ),
        Value::Mapping(map) => {
            let mut entries = Vec::with_capacity(map.len());
            for (key, value) in map {
                entries.push((decode_key(key)?, decode(value, tags)?));
            }
            Node::Mapping(entries)
        }
        Value::Tagged(tagged) => {
            let tag = format!("!{}", normalize_tag(&tagged.tag.to_string()));
            if !tags.accepts(&tag) {
                return Err(DocumentError::UnhandledTag(tag).into());
            }
            Node::Scalar(Scalar::Opaque { tag })
        }
    };
    Ok(node)
}

fn decode_key(key: Value) -> Result<String> {
    match key {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => {
            Err(DocumentError::InvalidDocumentShape(
                "mapping keys must be scalars".to_string(),
            )
            .into())
        }
    }
}
