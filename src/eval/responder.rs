//! Producing the chatbot responses that get scored.

use crate::error::Result;
use crate::llm::{LlmClient, Prompts};
use std::future::Future;

/// Anything that answers a user query.
pub trait Responder {
    fn respond(&self, query: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Fills a fixed template with the query. A stand-in for a real chatbot.
#[derive(Debug, Clone)]
pub struct TemplateResponder {
    template: String,
}

impl TemplateResponder {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl Default for TemplateResponder {
    fn default() -> Self {
        Self::new(Prompts::placeholder_response())
    }
}

impl Responder for TemplateResponder {
    async fn respond(&self, query: &str) -> Result<String> {
        Ok(Prompts::fill(&self.template, &[("query", query)]))
    }
}

/// Asks the configured model, primed as a San Francisco travel assistant.
#[derive(Clone)]
pub struct LlmResponder {
    client: LlmClient,
}

impl LlmResponder {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

impl Responder for LlmResponder {
    async fn respond(&self, query: &str) -> Result<String> {
        let answer = self
            .client
            .complete(Some(Prompts::travel_assistant()), query)
            .await?;
        Ok(answer.trim().to_string())
    }
}

/// Either kind of responder, picked at runtime by the CLI.
#[derive(Clone)]
pub enum AnyResponder {
    Template(TemplateResponder),
    Llm(LlmResponder),
}

impl Responder for AnyResponder {
    async fn respond(&self, query: &str) -> Result<String> {
        match self {
            AnyResponder::Template(r) => r.respond(query).await,
            AnyResponder::Llm(r) => r.respond(query).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_template_responder() {
        let responder = TemplateResponder::default();
        let answer = responder.respond("kid friendly museums").await.unwrap();
        assert_eq!(
            answer,
            "Here are some great recommendations for San Francisco based on your query: kid friendly museums"
        );
    }

    #[tokio::test]
    async fn test_custom_template() {
        let responder = AnyResponder::Template(TemplateResponder::new("Echo: {query}"));
        assert_eq!(responder.respond("hi").await.unwrap(), "Echo: hi");
    }

    #[tokio::test]
    async fn test_llm_responder_sends_system_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("travel assistant"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "  Visit Dolores Park.  "}}]
            })))
            .mount(&server)
            .await;

        let client = LlmClient::new(LlmConfig {
            api_base: server.uri(),
            api_key: "k".to_string(),
            ..Default::default()
        })
        .unwrap();
        let answer = LlmResponder::new(client).respond("Sunny picnic spot?").await.unwrap();
        assert_eq!(answer, "Visit Dolores Park.");
    }
}
