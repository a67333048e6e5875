pub mod openai_provider;
pub mod prompt;
pub mod types;

pub use types::*;

use contracts::domain::a002_llm_agent::aggregate::{LlmAgent, LlmProviderType};
use openai_provider::OpenAiProvider;

/// Провайдер для агента: OpenAI и Ollama через OpenAI-совместимый API
pub fn provider_for_agent(agent: &LlmAgent) -> Result<Box<dyn LlmProvider>, LlmError> {
    match agent.provider_type {
        LlmProviderType::OpenAI | LlmProviderType::Ollama => Ok(Box::new(
            OpenAiProvider::new_with_endpoint(
                agent.api_endpoint.clone(),
                agent.api_key.clone(),
                agent.model_name.clone(),
                agent.temperature,
                agent.max_tokens,
            )
            .with_name(agent.provider_type.as_str()),
        )),
        LlmProviderType::Anthropic => Err(LlmError::UnsupportedProvider(
            agent.provider_type.as_str().to_string(),
        )),
    }
}
