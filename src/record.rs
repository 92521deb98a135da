//! Tagged chunk records, the output of the scrape-and-tag pipeline.

use bincode::{Decode, Encode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Metadata attached to every tagged chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ChunkMetadata {
    /// Where the text was scraped from.
    pub source: String,
    /// ISO date (`YYYY-MM-DD`) of the scrape.
    pub scraped_date: String,
    /// Same tags as the record itself.
    pub tags: BTreeSet<String>,
}

/// A cleaned chunk with its category tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TaggedChunk {
    pub text: String,
    pub tags: BTreeSet<String>,
    pub metadata: ChunkMetadata,
}

impl TaggedChunk {
    pub fn new(
        text: impl Into<String>,
        tags: BTreeSet<String>,
        source: impl Into<String>,
        scraped_date: NaiveDate,
    ) -> Self {
        Self {
            text: text.into(),
            metadata: ChunkMetadata {
                source: source.into(),
                scraped_date: scraped_date.format("%Y-%m-%d").to_string(),
                tags: tags.clone(),
            },
            tags,
        }
    }

    pub fn word_count(&self) -> usize {
        crate::cleaner::word_count(&self.text)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Short single-line preview for terminal output.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut preview: String = self.text.chars().take(max_chars).collect();
        if self.text.chars().count() > max_chars {
            preview.push_str("...");
        }
        preview
    }
}
