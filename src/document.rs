//! Normalised content produced by the loaders.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Text extracted from a source plus descriptive metadata.
///
/// `text` is always present but may be empty, e.g. for a video without a
/// description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Body handed to the summariser
    pub text: String,
    /// Title, channel, source URL and similar
    pub metadata: BTreeMap<String, String>,
}

impl ExtractedDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
