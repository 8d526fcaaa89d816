//! Gemini text service client
//!
//! Talks to the Google `generateContent` REST endpoint. Generation and
//! summarization may use different models (replies usually want a larger
//! model than fact extraction does).

use crate::error::{LlmError, LlmResult};
use crate::params::GenerationParams;
use crate::service::TextService;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-pro";
const DEFAULT_SUMMARY_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Gemini-backed [`TextService`]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    summary_model: String,
    base_url: String,
    request_timeout: Duration,
}

impl GeminiClient {
    /// Create a client with default models and endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            summary_model: DEFAULT_SUMMARY_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Create a client from the `GOOGLE_API_KEY` environment variable
    pub fn from_env() -> LlmResult<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .map_err(|_| LlmError::MissingCredentials("GOOGLE_API_KEY"))?;
        Ok(Self::new(api_key))
    }

    /// Set the model used for generation
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the model used for summarization
    pub fn with_summary_model(mut self, model: impl Into<String>) -> Self {
        self.summary_model = model.into();
        self
    }

    /// Set a custom base URL (API-compatible proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    async fn invoke(
        &self,
        model: &str,
        prompt: &str,
        params: Option<&GenerationParams>,
    ) -> LlmResult<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: params.map(GenerationConfig::from),
        };

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .timeout(self.request_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let data: GenerateContentResponse = response.json().await?;
        let text = data.into_text().ok_or(LlmError::EmptyResponse)?;

        debug!(model, chars = text.len(), "gemini call completed");
        Ok(text)
    }
}

#[async_trait]
impl TextService for GeminiClient {
    async fn summarize(&self, text: &str) -> LlmResult<String> {
        self.invoke(&self.summary_model, text, None).await
    }

    async fn generate(&self, prompt: &str, params: &GenerationParams) -> LlmResult<String> {
        self.invoke(&self.model, prompt, Some(params)).await
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "topK", skip_serializing_if = "Option::is_none")]
    top_k: Option<i32>,
    #[serde(rename = "topP", skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<i32>,
}

impl From<&GenerationParams> for GenerationConfig {
    fn from(params: &GenerationParams) -> Self {
        Self {
            temperature: params.temperature,
            top_k: params.top_k,
            top_p: params.top_p,
            max_output_tokens: params.max_output_tokens,
        }
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let joined: String = content.parts.into_iter().map(|p| p.text).collect();
        if joined.trim().is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn candidate_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [
                { "content": { "parts": [ { "text": text } ] } }
            ]
        })
    }

    #[tokio::test]
    async fn generate_returns_candidate_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-pro:generateContent"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("「你好。」")))
            .mount(&server)
            .await;

        let client = GeminiClient::new("test-key").with_base_url(server.uri());
        let reply = client
            .generate("Say hello.", &GenerationParams::hard_defaults())
            .await
            .unwrap();

        assert_eq!(reply, "「你好。」");
    }

    #[tokio::test]
    async fn summarize_uses_summary_model() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("Likes tea")))
            .mount(&server)
            .await;

        let client = GeminiClient::new("test-key").with_base_url(server.uri());
        let summary = client.summarize("Alice said: I love tea").await.unwrap();

        assert_eq!(summary, "Likes tea");
    }

    #[tokio::test]
    async fn non_success_status_maps_to_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = GeminiClient::new("test-key").with_base_url(server.uri());
        let err = client.summarize("anything").await.unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "overloaded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_candidates_map_to_empty_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
            )
            .mount(&server)
            .await;

        let client = GeminiClient::new("test-key").with_base_url(server.uri());
        let err = client.summarize("anything").await.unwrap_err();

        assert!(matches!(err, LlmError::EmptyResponse));
    }
}
