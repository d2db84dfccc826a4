//! Core identifiers and shared lightweight types for llm-interpolate.
//!
//! These types intentionally avoid heavy dependencies so the store, the
//! interpolation core and the CLI can all share them.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod config;

/// A single embedding. Every vector in one collection shares the same length.
pub type Vector = Vec<f32>;

/// Opaque identifier of a stored item (the `id` column of an embeddings table).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// Lets `IndexMap<ItemId, _>` be queried with a plain `&str`.
impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
