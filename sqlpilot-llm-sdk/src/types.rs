use serde::{Deserialize, Serialize};

/// Runtime options for the model, honored where the backend accepts them per request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOptions {
    /// Context window size in tokens
    pub context_window: Option<u32>,
    /// Number of CPU threads used for inference
    pub threads: Option<u32>,
    /// Prompt processing batch size
    pub batch_size: Option<u32>,
}

impl ModelOptions {
    pub fn is_empty(&self) -> bool {
        self.context_window.is_none() && self.threads.is_none() && self.batch_size.is_none()
    }
}

/// Token usage information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Number of tokens in the input prompt
    pub input_tokens: u32,
    /// Number of tokens in the output completion
    pub output_tokens: u32,
}

/// Generic raw-prompt completion request (provider-agnostic)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model to use (provider-specific)
    pub model: String,
    /// Fully rendered prompt, including any instruction markers
    pub prompt: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Temperature for randomness
    pub temperature: Option<f32>,
    /// Context window, threads and batch size
    pub options: Option<ModelOptions>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            max_tokens,
            temperature: None,
            options: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_options(mut self, options: ModelOptions) -> Self {
        self.options = if options.is_empty() {
            None
        } else {
            Some(options)
        };
        self
    }
}

/// Generic completion response (provider-agnostic)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text, exactly as the model produced it
    pub text: String,
    /// Token usage information
    pub usage: Usage,
    /// Stop reason
    pub stop_reason: Option<String>,
}
