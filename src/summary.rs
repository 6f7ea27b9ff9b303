//! Summary struct - the result handed back to the presentation layer.

use crate::classify::ContentKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// A generated summary plus what is needed to display it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// The model's reply, unmodified
    pub text: String,
    pub kind: ContentKind,
    pub url: String,
    /// Requested length; advisory only
    pub target_words: u32,
    /// Video details (title, channel, url); absent for web pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    pub generated_at: DateTime<Utc>,
}

impl Summary {
    /// Render as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Word count of the generated text
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
