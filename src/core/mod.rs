//! Core library components.
//!
//! This module contains the reusable engine: decoding secret documents,
//! extracting their shape, rendering mapping files and prefixing keys.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod discover;
pub mod document;
pub mod pipeline;
pub mod prefix;
pub mod render;
pub mod shape;
