pub mod gemini;
pub mod ollama;

use std::sync::Arc;

use verbatim_core::config::LlmConfig;

use crate::provider::{LlmError, LlmProvider};

/// Create the configured generation provider.
pub fn create_provider(llm_config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match llm_config.provider.as_str() {
        "gemini" | "google" => {
            let api_key = llm_config
                .gemini_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("GEMINI_API_KEY not set".into()))?;
            Ok(Arc::new(gemini::GeminiProvider::new(
                api_key.clone(),
                llm_config.gemini_model.clone(),
                llm_config.gemini_base_url.clone(),
            )))
        }
        "ollama" => Ok(Arc::new(ollama::OllamaProvider::new(
            llm_config.ollama_url.clone(),
            llm_config.ollama_model.clone(),
        ))),
        other => Err(LlmError::NotConfigured(format!(
            "unknown LLM provider: '{}'",
            other
        ))),
    }
}
