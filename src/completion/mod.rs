//! Abstractions for text completion via local providers.
//!
//! The completion client is the pipeline's only true I/O dependency. The
//! Ollama-backed adapter issues HTTP requests directly to the runtime's
//! `/api/generate` endpoint. The client applies a per-request timeout so a
//! hung completion cannot stall the pipeline's join barrier forever; the
//! pipeline itself performs no retries, so a single failed call fails the
//! enclosing invocation.

use crate::config::{CompletionProvider, Config};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Errors surfaced by completion providers.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Provider was unreachable or the request timed out.
    #[error("Completion provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate completion: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by text completion providers.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Issue one blocking completion call and return the generated text.
    async fn complete(
        &self,
        system_instruction: Option<&str>,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, CompletionError>;
}

/// Build a completion client for the configured provider.
pub fn get_completion_client(config: &Config) -> Box<dyn CompletionClient + Send + Sync> {
    match config.completion_provider {
        CompletionProvider::Ollama => {
            let base_url = config
                .ollama_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
            Box::new(OllamaCompletionClient::new(
                base_url,
                config.completion_model.clone(),
                Duration::from_secs(config.request_timeout_secs),
            ))
        }
    }
}

struct OllamaCompletionClient {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaCompletionClient {
    fn new(base_url: String, model: String, timeout: Duration) -> Self {
        let http = Client::builder()
            .user_agent("docsum/completion")
            .timeout(timeout)
            .build()
            .expect("Failed to construct reqwest::Client for completion");
        Self {
            http,
            base_url,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

#[async_trait]
impl CompletionClient for OllamaCompletionClient {
    async fn complete(
        &self,
        system_instruction: Option<&str>,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, CompletionError> {
        let mut payload = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": temperature,
            }
        });
        if let Some(system) = system_instruction {
            payload["system"] = json!(system);
        }

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                CompletionError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CompletionError::ProviderUnavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            CompletionError::InvalidResponse(format!("failed to decode Ollama response: {error}"))
        })?;

        if !body.done {
            return Err(CompletionError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        Ok(body.response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    fn test_client(base_url: String) -> OllamaCompletionClient {
        OllamaCompletionClient::new(base_url, "llama".into(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn ollama_client_handles_successful_response() {
        let server = MockServer::start_async().await;
        let client = test_client(server.base_url());

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/generate")
                    .json_body_partial(r#"{"model": "llama", "prompt": "Summarize"}"#);
                then.status(200).json_body(json!({
                    "response": "  Summary text ",
                    "done": true
                }));
            })
            .await;

        let text = client
            .complete(Some("You summarize."), "Summarize", 0.2)
            .await
            .expect("completion");

        mock.assert();
        assert_eq!(text, "Summary text");
    }

    #[tokio::test]
    async fn ollama_client_handles_error_status() {
        let server = MockServer::start_async().await;
        let client = test_client(server.base_url());

        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(500).body("boom");
            })
            .await;

        let error = client
            .complete(None, "Summarize", 0.2)
            .await
            .expect_err("error response");

        assert!(matches!(error, CompletionError::GenerationFailed(message) if message.contains("500")));
    }

    #[tokio::test]
    async fn ollama_client_rejects_incomplete_response() {
        let server = MockServer::start_async().await;
        let client = test_client(server.base_url());

        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200).json_body(json!({
                    "response": "partial",
                    "done": false
                }));
            })
            .await;

        let error = client
            .complete(None, "Summarize", 0.2)
            .await
            .expect_err("incomplete response");

        assert!(matches!(error, CompletionError::InvalidResponse(_)));
    }
}
