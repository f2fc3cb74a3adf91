use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::time::Duration;

use crate::{
    error::LlmError,
    llama_cpp::types::{LlamaCppCompletionRequest, LlamaCppCompletionResponse},
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// llama.cpp local LLM client (OpenAI-compatible server)
pub struct LlamaCppClient {
    base_url: String,
    model: String,
    http_client: reqwest::Client,
}

impl LlamaCppClient {
    /// Create a new llama.cpp client with default base URL
    pub fn new() -> Result<Self, LlmError> {
        Ok(Self {
            base_url: "http://localhost:8080".to_string(),
            model: "llama_cpp".to_string(),
            http_client: build_http_client(DEFAULT_TIMEOUT)?,
        })
    }

    /// Set a custom base URL for the API
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model name reported to the server and used when a request leaves it empty
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Replace the HTTP timeout applied to every request
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.http_client = build_http_client(timeout)?;
        Ok(self)
    }

    /// Create a raw completion using the OpenAI-compatible endpoint
    pub async fn create_completion(
        &self,
        request: LlamaCppCompletionRequest,
    ) -> Result<LlamaCppCompletionResponse, LlmError> {
        let url = format!("{}/v1/completions", self.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if std::env::var("SQLPILOT_LLM_LOG_PAYLOADS").is_ok() {
            if let Ok(json_str) = serde_json::to_string_pretty(&request) {
                tracing::debug!(payload = %json_str, "llama.cpp request");
            }
        }

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network { source: e })?;

        let status = response.status();

        if status.is_success() {
            let llama_response: LlamaCppCompletionResponse = response
                .json()
                .await
                .map_err(|e| LlmError::internal(format!("Failed to parse response: {}", e)))?;
            Ok(llama_response)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            Err(LlmError::from_status(status, error_text))
        }
    }
}

fn build_http_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Network { source: e })
}

#[async_trait]
impl crate::client::LlmClient for LlamaCppClient {
    async fn complete(
        &self,
        request: crate::types::CompletionRequest,
    ) -> Result<crate::types::CompletionResponse, LlmError> {
        // Context window, threads and batch size are fixed when llama-server starts
        if let Some(options) = &request.options {
            tracing::debug!(
                context_window = ?options.context_window,
                threads = ?options.threads,
                batch_size = ?options.batch_size,
                "llama.cpp ignores per-request model options"
            );
        }

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model
        };

        let llama_request = LlamaCppCompletionRequest {
            model,
            prompt: request.prompt,
            max_tokens: Some(request.max_tokens),
            temperature: request.temperature,
            stream: Some(false),
        };

        let llama_response = self.create_completion(llama_request).await?;

        let choice = llama_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::internal("No choices returned"))?;

        let usage = llama_response
            .usage
            .map(|u| crate::types::Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(crate::types::CompletionResponse {
            text: choice.text,
            usage,
            stop_reason: choice.finish_reason,
        })
    }

    fn provider_name(&self) -> &str {
        crate::providers::LLAMA_CPP
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LlmClient;
    use crate::types::CompletionRequest;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_complete_posts_raw_prompt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/completions")
            .match_body(Matcher::PartialJson(json!({
                "model": "mistral-7b-instruct",
                "prompt": "[INST] list users [/INST]",
                "max_tokens": 256,
                "stream": false
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": "cmpl-1",
                    "object": "text_completion",
                    "created": 1,
                    "model": "mistral-7b-instruct",
                    "choices": [{"index": 0, "text": " SELECT * FROM users;", "finish_reason": "stop"}],
                    "usage": {"prompt_tokens": 12, "completion_tokens": 6, "total_tokens": 18}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = LlamaCppClient::new()
            .unwrap()
            .with_base_url(server.url())
            .with_model("mistral-7b-instruct");

        let response = client
            .complete(
                CompletionRequest::new("", "[INST] list users [/INST]", 256)
                    .with_temperature(0.2),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.text, " SELECT * FROM users;");
        assert_eq!(response.usage.input_tokens, 12);
        assert_eq!(response.stop_reason.as_deref(), Some("stop"));
    }

    #[tokio::test]
    async fn test_server_error_is_mapped() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/completions")
            .with_status(503)
            .with_body("Loading model")
            .create_async()
            .await;

        let client = LlamaCppClient::new().unwrap().with_base_url(server.url());
        let err = client
            .complete(CompletionRequest::new("m", "prompt", 16))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"choices": []}).to_string())
            .create_async()
            .await;

        let client = LlamaCppClient::new().unwrap().with_base_url(server.url());
        let err = client
            .complete(CompletionRequest::new("m", "prompt", 16))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Internal { .. }));
    }
}
