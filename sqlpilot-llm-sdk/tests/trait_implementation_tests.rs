use sqlpilot_llm_sdk::client::LlmClient;
use sqlpilot_llm_sdk::llama_cpp::LlamaCppClient;
use sqlpilot_llm_sdk::ollama::OllamaClient;

#[test]
fn test_all_clients_implement_trait() {
    fn assert_implements_trait<T: LlmClient>() {}

    assert_implements_trait::<LlamaCppClient>();
    assert_implements_trait::<OllamaClient>();
}

#[test]
fn test_trait_object_usage() {
    // Test that we can create trait objects
    let _client: Box<dyn LlmClient> = Box::new(LlamaCppClient::new().unwrap());
}

#[test]
fn test_provider_and_model_names() {
    let llama_client = LlamaCppClient::new()
        .unwrap()
        .with_model("mistral-7b-instruct-v0.2.Q4_K_M.gguf");
    assert_eq!(llama_client.provider_name(), "llama_cpp");
    assert_eq!(llama_client.model_name(), "mistral-7b-instruct-v0.2.Q4_K_M.gguf");

    let ollama_client = OllamaClient::new().unwrap().with_model("sqlcoder:7b");
    assert_eq!(ollama_client.provider_name(), "ollama");
    assert_eq!(ollama_client.model_name(), "sqlcoder:7b");
}
