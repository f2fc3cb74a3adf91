use crate::sql_generation::{GenerationSettings, PromptTemplate, SqlGenerationAgent};
use sqlpilot_llm_sdk::client::LlmClient;
use sqlpilot_llm_sdk::llama_cpp::LlamaCppClient;
use sqlpilot_llm_sdk::ollama::OllamaClient;
use sqlpilot_llm_sdk::providers;
use sqlpilot_tools::SchemaDescription;
use std::sync::Arc;
use std::time::Duration;

/// Where and how to reach the local model server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// One of [`providers::ALL`]
    pub provider: String,
    pub model: String,
    /// Server root; `None` keeps the provider's default port on localhost
    pub base_url: Option<String>,
    pub timeout: Duration,
}

/// Create the completion client for the configured provider
///
/// # Example
///
/// ```no_run
/// use sqlpilot_agents::factory::{create_llm_client, ClientSettings};
/// use std::time::Duration;
///
/// # fn example() -> anyhow::Result<()> {
/// let client = create_llm_client(&ClientSettings {
///     provider: "ollama".to_string(),
///     model: "mistral:7b-instruct".to_string(),
///     base_url: None,
///     timeout: Duration::from_secs(300),
/// })?;
/// println!("Using {} / {}", client.provider_name(), client.model_name());
/// # Ok(())
/// # }
/// ```
pub fn create_llm_client(settings: &ClientSettings) -> anyhow::Result<Arc<dyn LlmClient>> {
    let client: Arc<dyn LlmClient> = match settings.provider.as_str() {
        providers::LLAMA_CPP => {
            let mut client = LlamaCppClient::new()?.with_timeout(settings.timeout)?;
            if !settings.model.is_empty() {
                client = client.with_model(&settings.model);
            }
            if let Some(url) = &settings.base_url {
                client = client.with_base_url(url);
            }
            Arc::new(client)
        }
        providers::OLLAMA => {
            let mut client = OllamaClient::new()?.with_timeout(settings.timeout)?;
            if !settings.model.is_empty() {
                client = client.with_model(&settings.model);
            }
            if let Some(url) = &settings.base_url {
                client = client.with_base_url(url);
            }
            Arc::new(client)
        }
        other => anyhow::bail!(
            "Unknown LLM provider '{}'. Expected one of: {}",
            other,
            providers::ALL.join(", ")
        ),
    };

    tracing::info!(
        provider = %client.provider_name(),
        model = %client.model_name(),
        base_url = ?settings.base_url,
        "Created LLM client"
    );

    Ok(client)
}

/// Create a SqlGenerationAgent with a freshly built client
pub fn create_sql_generation_agent(
    client_settings: &ClientSettings,
    schema: Arc<SchemaDescription>,
    template: PromptTemplate,
    settings: GenerationSettings,
) -> anyhow::Result<SqlGenerationAgent> {
    let client = create_llm_client(client_settings)?;
    Ok(SqlGenerationAgent::new(client, schema, template, settings))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(provider: &str) -> ClientSettings {
        ClientSettings {
            provider: provider.to_string(),
            model: "mistral-7b-instruct".to_string(),
            base_url: Some("http://127.0.0.1:9999/".to_string()),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_create_known_providers() {
        for provider in providers::ALL {
            let client = create_llm_client(&settings(provider)).unwrap();
            assert_eq!(client.provider_name(), *provider);
            assert_eq!(client.model_name(), "mistral-7b-instruct");
        }
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let err = create_llm_client(&settings("openai")).err().unwrap();
        assert!(err.to_string().contains("Unknown LLM provider 'openai'"));
    }
}
