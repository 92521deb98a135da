//! Feedback scoring of chatbot responses.
//!
//! Scoring is delegated: [`ResponseScorer`] is the seam, [`LlmScorer`] asks an
//! OpenAI-compatible model to grade relevance, correctness and helpfulness.

use crate::config::LlmConfig;
use crate::error::{Result, TaggerError};
use crate::llm::{LlmClient, Prompts};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// The three feedback scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub relevance: f64,
    pub correctness: f64,
    pub helpfulness: f64,
}

impl Scores {
    /// Build scores, clamping each into `[0, 1]`. NaN becomes 0.
    pub fn new(relevance: f64, correctness: f64, helpfulness: f64) -> Self {
        Self {
            relevance: unit(relevance),
            correctness: unit(correctness),
            helpfulness: unit(helpfulness),
        }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

fn unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Anything that can score a (query, response) pair.
pub trait ResponseScorer {
    fn score(&self, query: &str, response: &str) -> impl Future<Output = Result<Scores>> + Send;
}

/// LLM-as-judge scorer.
#[derive(Clone)]
pub struct LlmScorer {
    client: LlmClient,
}

impl LlmScorer {
    /// Create a new scorer with the given LLM client.
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    /// Create from LLM config.
    pub fn from_config(config: LlmConfig) -> Result<Self> {
        Ok(Self::new(LlmClient::new(config)?))
    }

    /// Parse the judge reply.
    fn parse_scores(response: &str) -> Result<Scores> {
        let json_str = extract_json(response);

        #[derive(Deserialize)]
        struct RawScores {
            relevance: f64,
            correctness: f64,
            helpfulness: f64,
        }

        let raw: RawScores = serde_json::from_str(&json_str).map_err(|e| {
            TaggerError::LlmParse(format!(
                "Failed to parse scorer response: {}. Response: {}",
                e, response
            ))
        })?;

        Ok(Scores::new(raw.relevance, raw.correctness, raw.helpfulness))
    }
}

impl ResponseScorer for LlmScorer {
    async fn score(&self, query: &str, response: &str) -> Result<Scores> {
        if response.trim().is_empty() {
            return Ok(Scores::zero());
        }

        let prompt = Prompts::fill(
            Prompts::feedback_scorer(),
            &[("query", query), ("response", response)],
        );
        let reply = self.client.complete(None, &prompt).await?;
        Self::parse_scores(&reply)
    }
}

/// Extract a JSON object from a reply that may be fenced or wrapped in prose.
pub(crate) fn extract_json(response: &str) -> String {
    let response = response.trim();

    if response.starts_with("```json") {
        if let Some(end) = response.rfind("```") {
            let start = "```json".len();
            if end > start {
                return response[start..end].trim().to_string();
            }
        }
    }

    if response.starts_with("```") {
        if let Some(end) = response.rfind("```") {
            let start = response.find('\n').map(|n| n + 1).unwrap_or(3);
            if end > start {
                return response[start..end].trim().to_string();
            }
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end > start {
                return response[start..=end].to_string();
            }
        }
    }

    response.to_string()
}
