//! Query sets for evaluation runs.
//!
//! Supports:
//! - JSON: `{"name": "...", "queries": ["...", ...]}`
//! - Plain text: one query per line, blank lines skipped

use crate::error::{Result, TaggerError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A named collection of user queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySet {
    /// Query set name.
    pub name: String,
    /// Queries, in evaluation order.
    pub queries: Vec<String>,
}

impl QuerySet {
    /// Create a new empty query set.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            queries: Vec::new(),
        }
    }

    /// Add a query.
    pub fn add(&mut self, query: impl Into<String>) {
        self.queries.push(query.into());
    }

    /// Number of queries.
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Get a subset of queries (for quick testing).
    pub fn take(&self, n: usize) -> Self {
        Self {
            name: self.name.clone(),
            queries: self.queries.iter().take(n).cloned().collect(),
        }
    }

    /// Load from a file; `.json` files are parsed as JSON, anything else as
    /// one query per line.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| TaggerError::io(path, e))?;

        let set = if path.extension().and_then(|e| e.to_str()) == Some("json") {
            serde_json::from_str::<QuerySet>(&content)
                .map_err(|e| TaggerError::Serialization(format!("{}: {}", path.display(), e)))?
        } else {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("queries");
            Self::from_lines(name, &content)
        };

        if set.is_empty() {
            return Err(TaggerError::EmptyQuerySet(path.to_path_buf()));
        }
        Ok(set)
    }

    /// Build from text with one query per line.
    pub fn from_lines(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            queries: text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    /// Save to a JSON file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| TaggerError::Serialization(e.to_string()))?;
        fs::write(path, content).map_err(|e| TaggerError::io(path, e))
    }
}

/// Built-in query set for smoke runs.
pub fn create_sample_queries() -> QuerySet {
    let mut set = QuerySet::new("sample");
    set.add("What are some kid-friendly outdoor events in San Francisco this weekend?");
    set.add("Where can I hear live jazz in the evening on a budget?");
    set.add("Are there any street fairs or night markets in the Mission?");
    set.add("Suggest a relaxing morning with yoga and brunch near Golden Gate Park.");
    set
}
