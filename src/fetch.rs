//! Fetching raw pages over HTTP.

use crate::document::RawDocument;
use crate::error::{Result, TaggerError};
use reqwest::Client;
use std::time::Duration;

/// Default cap on response bodies (5 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Single-shot page fetcher. No retries: a failed fetch is reported as is.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    max_body_bytes: usize,
}

impl Fetcher {
    pub fn new(timeout: Duration, max_body_bytes: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("chunk-tagger/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            max_body_bytes,
        })
    }

    /// Fetch a URL and wrap the body as a raw document.
    ///
    /// The document source is the URL host when there is one, otherwise the
    /// full URL.
    pub async fn fetch(&self, url: &str) -> Result<RawDocument> {
        tracing::debug!(url, "fetching page");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(TaggerError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let source = response
            .url()
            .host_str()
            .map(|h| h.trim_start_matches("www.").to_string())
            .unwrap_or_else(|| url.to_string());

        let bytes = response.bytes().await?;
        if bytes.len() > self.max_body_bytes {
            return Err(TaggerError::BodyTooLarge {
                size: bytes.len(),
                max: self.max_body_bytes,
            });
        }

        let content = String::from_utf8_lossy(&bytes).into_owned();
        tracing::info!(url, bytes = bytes.len(), "page fetched");

        Ok(RawDocument::new(source, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher(max: usize) -> Fetcher {
        Fetcher::new(Duration::from_secs(5), max).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("P: Live jazz"))
            .mount(&server)
            .await;

        let doc = fetcher(DEFAULT_MAX_BODY_BYTES)
            .fetch(&format!("{}/events.txt", server.uri()))
            .await
            .unwrap();

        assert_eq!(doc.content, "P: Live jazz");
        assert_eq!(doc.source, "127.0.0.1");
    }

    #[tokio::test]
    async fn test_fetch_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = fetcher(DEFAULT_MAX_BODY_BYTES)
            .fetch(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, TaggerError::HttpStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_body_too_large() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(64)))
            .mount(&server)
            .await;

        let err = fetcher(16).fetch(&server.uri()).await.unwrap_err();
        assert!(matches!(err, TaggerError::BodyTooLarge { size: 64, max: 16 }));
    }
}
