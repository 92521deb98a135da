//! Configuration for the chunk tagger.
//!
//! Supports both environment variables and YAML config file.
//! Environment variables take precedence over config file values.

use crate::cleaner::DEFAULT_MIN_WORDS;
use crate::error::{Result, TaggerError};
use crate::fetch::DEFAULT_MAX_BODY_BYTES;
use crate::splitter::SplitterConfig;
use crate::tagger::{CategoryTable, MatchMode};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// LLM configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL for the LLM API (e.g., "https://api.openai.com")
    pub api_base: String,

    /// API key for authentication
    pub api_key: String,

    /// Model name (e.g., "gpt-4o-mini")
    pub model: String,

    /// Maximum tokens for response (optional)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for generation (optional)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Per-request timeout in seconds
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.0
}

fn default_llm_timeout_secs() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

/// Scrape-and-tag pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Chunking parameters.
    pub splitter: SplitterConfig,

    /// Chunks with this many words or fewer are dropped.
    pub min_words: usize,

    /// Source written into each record's metadata. When empty, the fetched
    /// host or file name is used.
    pub source: String,

    /// Keyword matching strictness.
    pub match_mode: MatchMode,

    /// Fetch timeout in seconds.
    pub timeout_secs: u64,

    /// Largest accepted response body.
    pub max_body_bytes: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            splitter: SplitterConfig::default(),
            min_words: DEFAULT_MIN_WORDS,
            source: String::new(),
            match_mode: MatchMode::default(),
            timeout_secs: 30,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ScrapeConfig {
    pub fn validate(&self) -> Result<()> {
        self.splitter.validate()?;
        if self.timeout_secs == 0 {
            return Err(TaggerError::InvalidConfig(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM settings (evaluation only)
    pub llm: LlmConfig,
    /// Pipeline settings
    pub scrape: ScrapeConfig,
    /// Keyword categories
    pub categories: CategoryTable,
}

/// Configuration file structure (YAML format).
#[derive(Debug, Deserialize)]
struct ConfigFile {
    llm: Option<LlmFileSection>,
    scrape: Option<ScrapeFileSection>,
    categories: Option<CategoryTable>,
}

#[derive(Debug, Deserialize)]
struct LlmFileSection {
    api_base: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ScrapeFileSection {
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
    separators: Option<Vec<String>>,
    min_words: Option<usize>,
    source: Option<String>,
    match_mode: Option<MatchMode>,
    timeout_secs: Option<u64>,
    max_body_bytes: Option<usize>,
}

impl Config {
    /// Load configuration from environment variables and optional config file.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (LLM_*, TAGGER_*)
    /// 2. Config file (~/.config/chunk-tagger/config.yaml)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        // Try to load from config file first
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                config = Self::load_from_file(&config_path)?;
            }
        }

        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from environment variables.
    fn apply_env(&mut self) -> Result<()> {
        if let Ok(api_base) = env::var("LLM_API_BASE") {
            self.llm.api_base = api_base;
        }

        if let Ok(api_key) = env::var("LLM_API_KEY") {
            self.llm.api_key = api_key;
        }

        if let Ok(model) = env::var("LLM_MODEL") {
            self.llm.model = model;
        }

        if let Ok(max_tokens) = env::var("LLM_MAX_TOKENS") {
            if let Ok(tokens) = max_tokens.parse() {
                self.llm.max_tokens = tokens;
            }
        }

        if let Ok(temperature) = env::var("LLM_TEMPERATURE") {
            if let Ok(temp) = temperature.parse() {
                self.llm.temperature = temp;
            }
        }

        if let Ok(timeout) = env::var("LLM_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.llm.timeout_secs = secs;
            }
        }

        if let Ok(source) = env::var("TAGGER_SOURCE") {
            self.scrape.source = source;
        }

        if let Ok(min_words) = env::var("TAGGER_MIN_WORDS") {
            if let Ok(n) = min_words.parse() {
                self.scrape.min_words = n;
            }
        }

        if let Ok(mode) = env::var("TAGGER_MATCH_MODE") {
            self.scrape.match_mode = mode.parse().map_err(TaggerError::Config)?;
        }

        Ok(())
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TaggerError::io(path, e))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text, filling gaps with defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let file_config: ConfigFile = serde_yaml::from_str(content)
            .map_err(|e| TaggerError::Config(format!("Failed to parse config file: {}", e)))?;

        let mut config = Config::default();

        if let Some(llm) = file_config.llm {
            if let Some(api_base) = llm.api_base {
                config.llm.api_base = api_base;
            }
            if let Some(api_key) = llm.api_key {
                config.llm.api_key = api_key;
            }
            if let Some(model) = llm.model {
                config.llm.model = model;
            }
            if let Some(max_tokens) = llm.max_tokens {
                config.llm.max_tokens = max_tokens;
            }
            if let Some(temperature) = llm.temperature {
                config.llm.temperature = temperature;
            }
            if let Some(timeout_secs) = llm.timeout_secs {
                config.llm.timeout_secs = timeout_secs;
            }
        }

        if let Some(scrape) = file_config.scrape {
            let target = &mut config.scrape;
            if let Some(chunk_size) = scrape.chunk_size {
                target.splitter.chunk_size = chunk_size;
            }
            if let Some(chunk_overlap) = scrape.chunk_overlap {
                target.splitter.chunk_overlap = chunk_overlap;
            }
            if let Some(separators) = scrape.separators {
                target.splitter.separators = separators;
            }
            if let Some(min_words) = scrape.min_words {
                target.min_words = min_words;
            }
            if let Some(source) = scrape.source {
                target.source = source;
            }
            if let Some(match_mode) = scrape.match_mode {
                target.match_mode = match_mode;
            }
            if let Some(timeout_secs) = scrape.timeout_secs {
                target.timeout_secs = timeout_secs;
            }
            if let Some(max_body_bytes) = scrape.max_body_bytes {
                target.max_body_bytes = max_body_bytes;
            }
        }

        if let Some(categories) = file_config.categories {
            config.categories = categories;
        }

        Ok(config)
    }

    /// Get the default config file path.
    pub fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "chunk-tagger")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Validate the pipeline settings and category table.
    pub fn validate_scrape(&self) -> Result<()> {
        self.scrape.validate()?;
        self.categories
            .validate()
            .map_err(TaggerError::InvalidConfig)
    }

    /// Validate that required LLM configuration is present.
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_base.is_empty() {
            return Err(TaggerError::Config(
                "LLM API base URL is required. Set LLM_API_BASE environment variable or add to config file.".to_string()
            ));
        }

        if self.llm.api_key.is_empty() {
            return Err(TaggerError::Config(
                "LLM API key is required. Set LLM_API_KEY environment variable or add to config file.".to_string()
            ));
        }

        if self.llm.model.is_empty() {
            return Err(TaggerError::Config(
                "LLM model is required. Set LLM_MODEL environment variable or add to config file."
                    .to_string(),
            ));
        }

        if self.llm.timeout_secs == 0 {
            return Err(TaggerError::Config(
                "LLM timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Create a config from explicit values (useful for testing).
    pub fn with_llm(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            llm: LlmConfig {
                api_base: api_base.into(),
                api_key: api_key.into(),
                model: model.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.llm.api_base.is_empty());
        assert!(config.llm.api_key.is_empty());
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.temperature, 0.0);
        assert_eq!(config.scrape.splitter.chunk_size, 1000);
        assert_eq!(config.scrape.splitter.chunk_overlap, 100);
        assert_eq!(config.scrape.min_words, 20);
        assert_eq!(config.scrape.match_mode, MatchMode::Substring);
        assert_eq!(config.categories.len(), 7);
    }

    #[test]
    fn test_validate_fails_without_required_fields() {
        let config = Config::default();
        assert!(config.validate().is_err());
        assert!(config.validate_scrape().is_ok());
    }

    #[test]
    fn test_with_llm() {
        let config = Config::with_llm("https://api.example.com", "test-key", "gpt-4");
        assert_eq!(config.llm.api_base, "https://api.example.com");
        assert_eq!(config.llm.api_key, "test-key");
        assert_eq!(config.llm.model, "gpt-4");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
scrape:
  chunk_size: 500
  chunk_overlap: 50
  min_words: 10
  source: sfchronicle.com
  match_mode: word_boundary
categories:
  music: [jazz, gig]
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.scrape.splitter.chunk_size, 500);
        assert_eq!(config.scrape.splitter.chunk_overlap, 50);
        assert_eq!(config.scrape.min_words, 10);
        assert_eq!(config.scrape.source, "sfchronicle.com");
        assert_eq!(config.scrape.match_mode, MatchMode::WordBoundary);
        assert_eq!(config.categories.len(), 1);
        // untouched sections keep defaults
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.timeout_secs, 60);
        assert_eq!(config.scrape.timeout_secs, 30);
    }

    #[test]
    fn test_yaml_llm_timeout() {
        let config = Config::from_yaml("llm:\n  timeout_secs: 5\n").unwrap();
        assert_eq!(config.llm.timeout_secs, 5);

        let mut config = Config::with_llm("https://api.example.com", "k", "gpt-4");
        config.llm.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_invalid() {
        assert!(matches!(
            Config::from_yaml("scrape: [not, a, map]"),
            Err(TaggerError::Config(_))
        ));
    }

    #[test]
    fn test_validate_scrape_rejects_bad_overlap() {
        let mut config = Config::default();
        config.scrape.splitter.chunk_overlap = 2000;
        assert!(config.validate_scrape().is_err());
    }
}
