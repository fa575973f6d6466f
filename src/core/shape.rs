//! Structure extraction.
//!
//! Turns a decoded [`Node`] tree into a [`Shape`]: the same mappings and
//! sequences, with every scalar replaced by [`Shape::Sentinel`].

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::core::constants::SENTINEL;
use crate::core::document::Node;
use crate::error::{DocumentError, Result};

/// Structure of a secret document without its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Mapping(Vec<(String, Shape)>),
    Sequence(Vec<Shape>),
    /// A secret value was here.
    Sentinel,
}

/// Extract the shape of `node`.
///
/// Pure and total: sequences keep their length and order, mappings keep
/// their keys and order, and every scalar becomes the sentinel.
pub fn extract(node: &Node) -> Shape {
    match node {
        Node::Mapping(entries) => Shape::Mapping(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), extract(value)))
                .collect(),
        ),
        Node::Sequence(items) => Shape::Sequence(items.iter().map(extract).collect()),
        Node::Scalar(_) => Shape::Sentinel,
    }
}

impl Shape {
    /// Human-readable name of this node's variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Mapping(_) => "mapping",
            Shape::Sequence(_) => "sequence",
            Shape::Sentinel => "scalar",
        }
    }

    /// Top-level keys in document order.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedRootShape` unless this shape is a mapping.
    pub fn top_level_keys(&self) -> Result<Vec<&str>> {
        match self {
            Shape::Mapping(entries) => Ok(entries.iter().map(|(k, _)| k.as_str()).collect()),
            other => Err(DocumentError::UnsupportedRootShape(other.kind()).into()),
        }
    }

    /// Serialize as block-style YAML.
    ///
    /// # Errors
    ///
    /// Returns `MalformedMarkup` if the YAML emitter fails.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self).map_err(DocumentError::MalformedMarkup)?)
    }

    /// Nesting depth; a bare sentinel has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Shape::Mapping(entries) => {
                1 + entries.iter().map(|(_, v)| v.depth()).max().unwrap_or(0)
            }
            Shape::Sequence(items) => 1 + items.iter().map(Shape::depth).max().unwrap_or(0),
            Shape::Sentinel => 0,
        }
    }
}

impl Serialize for Shape {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Shape::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Shape::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Shape::Sentinel => serializer.serialize_str(SENTINEL),
        }
    }
}
