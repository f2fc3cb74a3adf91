pub mod factory;
pub mod sql_generation;

use async_trait::async_trait;

pub use sql_generation::{
    GeneratedStatement, GenerationError, GenerationSettings, PromptTemplate, SqlGenerationAgent,
};

/// Trait defining the structure and behavior of an AI agent
#[async_trait]
pub trait Agent: Send + Sync {
    /// Returns the agent's clear objective
    fn objective(&self) -> &str;

    /// Returns the prompt the agent wraps around each request
    fn system_prompt(&self) -> &str;

    /// Returns optional pre-conditions that must be met before the agent can start
    fn pre_conditions(&self) -> Option<Vec<String>> {
        None
    }

    /// Execute the agent with the given user prompt
    async fn execute(&self, user_prompt: &str) -> anyhow::Result<String>;
}
