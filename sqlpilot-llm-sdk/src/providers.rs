//! Provider name constants
//!
//! Canonical names for the local completion backends, as accepted in configuration

/// Ollama local provider
pub const OLLAMA: &str = "ollama";

/// llama.cpp local provider
pub const LLAMA_CPP: &str = "llama_cpp";

/// All providers this SDK can construct
pub const ALL: &[&str] = &[LLAMA_CPP, OLLAMA];
