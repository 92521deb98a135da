//! LLM prompts for response generation and scoring.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"));

/// Collection of prompts used by the evaluator.
pub struct Prompts;

impl Prompts {
    /// System prompt for the travel assistant whose answers are evaluated.
    pub fn travel_assistant() -> &'static str {
        r#"You are a helpful travel assistant for San Francisco. Recommend concrete local events, places and activities that fit the question. Mention neighborhoods, times of day and budget when they matter. Keep the answer under 200 words."#
    }

    /// Template used when no model is asked to answer. `{query}` is replaced.
    pub fn placeholder_response() -> &'static str {
        "Here are some great recommendations for San Francisco based on your query: {query}"
    }

    /// Prompt scoring one (query, response) pair on three feedback dimensions.
    pub fn feedback_scorer() -> &'static str {
        r#"You are an expert evaluator of chatbot answers about local events and travel.

Question: {query}

Answer:
{response}

Score the answer on three dimensions, each a number between 0 and 1:
1. relevance: does the answer address what was asked?
2. correctness: is the information plausible and free of contradictions?
3. helpfulness: could the user act on the answer?

Respond in JSON format:
{
    "relevance": <0-1>,
    "correctness": <0-1>,
    "helpfulness": <0-1>,
    "explanation": "<one sentence>"
}

Respond with only the JSON, no other text."#
    }

    /// Fill `{name}` placeholders in a template in one pass. Substituted
    /// values are never rescanned; unknown names are left untouched.
    pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures| {
                let name = &caps[1];
                vars.iter()
                    .find(|(var, _)| *var == name)
                    .map_or_else(|| caps[0].to_string(), |(_, value)| value.to_string())
            })
            .into_owned()
    }
}
