//! Error types for the chunk tagger.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom error.
pub type Result<T> = std::result::Result<T, TaggerError>;

/// Errors that can occur around the cleaning and tagging core.
///
/// The core operations themselves (`clean`, `filter_short`, `tag`) never fail;
/// these variants cover the fetch, file, config and LLM glue around them.
#[derive(Error, Debug)]
pub enum TaggerError {
    /// Error reading or writing files.
    #[error("I/O error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error during serialization/deserialization.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The input document path does not exist.
    #[error("Document not found at '{0}'")]
    DocumentNotFound(PathBuf),

    /// The records file does not exist.
    #[error("Records file not found at '{0}'")]
    RecordsNotFound(PathBuf),

    /// The query set contained no queries.
    #[error("No queries found in '{0}'")]
    EmptyQuerySet(PathBuf),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// LLM API error.
    #[error("LLM API error: {0}")]
    LlmApi(String),

    /// LLM response parsing error.
    #[error("Failed to parse LLM response: {0}")]
    LlmParse(String),

    /// HTTP request error.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} fetching '{url}'")]
    HttpStatus { url: String, status: u16 },

    /// The fetched body exceeded the configured cap.
    #[error("Response too large: {size} bytes (max: {max})")]
    BodyTooLarge { size: usize, max: usize },

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TaggerError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for TaggerError {
    fn from(err: reqwest::Error) -> Self {
        TaggerError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for TaggerError {
    fn from(err: serde_json::Error) -> Self {
        TaggerError::LlmParse(err.to_string())
    }
}
