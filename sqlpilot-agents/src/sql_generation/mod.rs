pub mod extract;
pub mod prompt;

use crate::Agent;
use async_trait::async_trait;
use sqlpilot_llm_sdk::client::LlmClient;
use sqlpilot_llm_sdk::error::LlmError;
use sqlpilot_llm_sdk::types::{CompletionRequest, ModelOptions, Usage};
use sqlpilot_tools::SchemaDescription;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub use extract::extract_sql;
pub use prompt::{build_prompt, PromptTemplate, TemplateError};

const OBJECTIVE: &str = "Translate a natural-language request into one MySQL statement";

/// Sampling and runtime parameters for each completion
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    /// Model name sent to the server; empty means the client's default
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub options: ModelOptions,
    /// Upper bound on one completion call, enforced on top of the HTTP timeout
    pub timeout: Duration,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: String::new(),
            max_tokens: 1024,
            temperature: 0.2,
            options: ModelOptions {
                context_window: Some(4096),
                threads: Some(4),
                batch_size: Some(64),
            },
            timeout: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Prompt is empty")]
    EmptyPrompt,
    #[error("Completion failed: {0}")]
    Completion(#[from] LlmError),
    #[error("Completion timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// A candidate statement, never executed by the agent itself
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedStatement {
    pub sql: String,
    /// Model output before extraction
    pub raw: String,
    pub usage: Usage,
    pub elapsed: Duration,
}

/// Turns user requests into candidate MySQL statements grounded on a fixed schema.
///
/// Completions are serialized: a local model server handles one prompt at a time, so
/// concurrent requests wait on the client lock.
pub struct SqlGenerationAgent {
    client: Mutex<Arc<dyn LlmClient>>,
    provider: String,
    model: String,
    schema: Arc<SchemaDescription>,
    template: PromptTemplate,
    settings: GenerationSettings,
}

impl SqlGenerationAgent {
    pub fn new(
        client: Arc<dyn LlmClient>,
        schema: Arc<SchemaDescription>,
        template: PromptTemplate,
        settings: GenerationSettings,
    ) -> Self {
        let provider = client.provider_name().to_string();
        let model = if settings.model.is_empty() {
            client.model_name().to_string()
        } else {
            settings.model.clone()
        };

        Self {
            client: Mutex::new(client),
            provider,
            model,
            schema,
            template,
            settings,
        }
    }

    pub fn provider_name(&self) -> &str {
        &self.provider
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    pub fn schema(&self) -> &SchemaDescription {
        &self.schema
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    pub async fn generate(&self, request: &str) -> Result<GeneratedStatement, GenerationError> {
        if request.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }

        let prompt = build_prompt(&self.template, &self.schema, request);
        tracing::debug!(template = %self.template.name(), prompt = %prompt, "Built generation prompt");

        let completion = CompletionRequest::new(
            self.settings.model.clone(),
            prompt,
            self.settings.max_tokens,
        )
        .with_temperature(self.settings.temperature)
        .with_options(self.settings.options.clone());

        let client = self.client.lock().await;
        let start = Instant::now();

        let response = tokio::time::timeout(self.settings.timeout, client.complete(completion))
            .await
            .map_err(|_| {
                tracing::warn!(
                    timeout_secs = self.settings.timeout.as_secs(),
                    "Completion timed out"
                );
                GenerationError::Timeout(self.settings.timeout)
            })?
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(self.settings.timeout)
                } else {
                    GenerationError::Completion(e)
                }
            })?;
        drop(client);

        let elapsed = start.elapsed();
        let sql = extract_sql(&response.text);

        tracing::info!(
            provider = %self.provider,
            model = %self.model,
            elapsed_ms = elapsed.as_millis() as u64,
            output_tokens = response.usage.output_tokens,
            sql = %sql,
            "Generated candidate statement"
        );

        Ok(GeneratedStatement {
            sql,
            raw: response.text,
            usage: response.usage,
            elapsed,
        })
    }
}

#[async_trait]
impl Agent for SqlGenerationAgent {
    fn objective(&self) -> &str {
        OBJECTIVE
    }

    fn system_prompt(&self) -> &str {
        self.template.body()
    }

    async fn execute(&self, user_prompt: &str) -> anyhow::Result<String> {
        Ok(self.generate(user_prompt).await?.sql)
    }
}
