use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::time::Duration;

use crate::{
    error::LlmError,
    ollama::types::{OllamaGenerateRequest, OllamaGenerateResponse, OllamaOptions},
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Ollama local LLM client
pub struct OllamaClient {
    base_url: String,
    model: String,
    http_client: reqwest::Client,
}

impl OllamaClient {
    /// Create a new Ollama client with default base URL
    pub fn new() -> Result<Self, LlmError> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| LlmError::Network { source: e })?;

        Ok(Self {
            base_url: "http://localhost:11434".to_string(),
            model: "ollama".to_string(),
            http_client,
        })
    }

    /// Set a custom base URL for the API
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model tag used when a request leaves it empty
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Replace the HTTP timeout applied to every request
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Network { source: e })?;
        Ok(self)
    }

    /// Generate a completion using the Ollama /api/generate endpoint
    pub async fn create_generate(
        &self,
        request: OllamaGenerateRequest,
    ) -> Result<OllamaGenerateResponse, LlmError> {
        let url = format!("{}/api/generate", self.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if std::env::var("SQLPILOT_LLM_LOG_PAYLOADS").is_ok() {
            if let Ok(json_str) = serde_json::to_string_pretty(&request) {
                tracing::debug!(payload = %json_str, "Ollama request");
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
            let ollama_response: OllamaGenerateResponse = response
                .json()
                .await
                .map_err(|e| LlmError::internal(format!("Failed to parse response: {}", e)))?;

            if std::env::var("SQLPILOT_LLM_LOG_PAYLOADS").is_ok() {
                if let Ok(json_str) = serde_json::to_string_pretty(&ollama_response) {
                    tracing::debug!(payload = %json_str, "Ollama response");
                }
            }

            Ok(ollama_response)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            Err(LlmError::from_status(status, error_text))
        }
    }
}

#[async_trait]
impl crate::client::LlmClient for OllamaClient {
    async fn complete(
        &self,
        request: crate::types::CompletionRequest,
    ) -> Result<crate::types::CompletionResponse, LlmError> {
        let model_options = request.options.unwrap_or_default();

        let options = OllamaOptions {
            temperature: request.temperature,
            num_ctx: model_options.context_window,
            num_predict: (request.max_tokens > 0).then_some(request.max_tokens),
            num_thread: model_options.threads,
            num_batch: model_options.batch_size,
        };

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model
        };

        let ollama_request = OllamaGenerateRequest {
            model,
            prompt: request.prompt,
            raw: Some(true),
            options: Some(options),
            stream: Some(false), // Explicitly disable streaming to get a single JSON response
        };

        let ollama_response = self.create_generate(ollama_request).await?;

        let usage = crate::types::Usage {
            input_tokens: ollama_response.prompt_eval_count.unwrap_or(0),
            output_tokens: ollama_response.eval_count.unwrap_or(0),
        };

        Ok(crate::types::CompletionResponse {
            text: ollama_response.response,
            usage,
            stop_reason: ollama_response.done_reason,
        })
    }

    fn provider_name(&self) -> &str {
        crate::providers::OLLAMA
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
