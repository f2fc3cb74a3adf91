//! # sqlpilot LLM SDK
//!
//! Raw-prompt completion clients for locally hosted models.
//!
//! ## llama.cpp Example
//!
//! ```rust,no_run
//! use sqlpilot_llm_sdk::client::LlmClient;
//! use sqlpilot_llm_sdk::llama_cpp::LlamaCppClient;
//! use sqlpilot_llm_sdk::types::CompletionRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LlamaCppClient::new()?
//!         .with_base_url("http://localhost:8080")
//!         .with_model("mistral-7b-instruct-v0.2.Q4_K_M.gguf");
//!     let response = client
//!         .complete(CompletionRequest::new("", "[INST] Say hi [/INST]", 64).with_temperature(0.2))
//!         .await?;
//!
//!     println!("Response: {}", response.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Ollama Example
//!
//! ```rust,no_run
//! use sqlpilot_llm_sdk::client::LlmClient;
//! use sqlpilot_llm_sdk::ollama::OllamaClient;
//! use sqlpilot_llm_sdk::types::{CompletionRequest, ModelOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OllamaClient::new()?.with_model("sqlcoder:7b");
//!     let request = CompletionRequest::new("", "### Task\nGenerate a SQL query", 256)
//!         .with_options(ModelOptions {
//!             context_window: Some(4096),
//!             ..Default::default()
//!         });
//!     let response = client.complete(request).await?;
//!
//!     println!("Response: {}", response.text);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod llama_cpp;
pub mod ollama;
pub mod providers;
pub mod types;
