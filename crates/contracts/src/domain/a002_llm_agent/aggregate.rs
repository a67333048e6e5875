use crate::domain::common::{AggregateId, BaseAggregate, Origin};
use crate::enums::AgentPurpose;
use serde::{Deserialize, Serialize};

crate::uuid_aggregate_id!(LlmAgentId, "ID типа для агрегата LLM Agent");

/// Тип провайдера LLM
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LlmProviderType {
    OpenAI,
    Anthropic,
    Ollama,
}

impl LlmProviderType {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "OpenAI" => Ok(LlmProviderType::OpenAI),
            "Anthropic" => Ok(LlmProviderType::Anthropic),
            "Ollama" => Ok(LlmProviderType::Ollama),
            _ => Err(format!("Unknown provider type: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProviderType::OpenAI => "OpenAI",
            LlmProviderType::Anthropic => "Anthropic",
            LlmProviderType::Ollama => "Ollama",
        }
    }

    /// Провайдер говорит на OpenAI-совместимом chat completions API
    pub fn is_openai_compatible(&self) -> bool {
        matches!(self, LlmProviderType::OpenAI | LlmProviderType::Ollama)
    }
}

/// Агрегат LLM Agent: сохранённая конфигурация для генерации контента
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmAgent {
    #[serde(flatten)]
    pub base: BaseAggregate<LlmAgentId>,

    /// Тип провайдера
    pub provider_type: LlmProviderType,

    /// API Endpoint
    pub api_endpoint: String,

    /// API ключ
    pub api_key: String,

    /// Название модели
    pub model_name: String,

    /// Temperature (0.0-2.0)
    pub temperature: f64,

    /// Max tokens
    pub max_tokens: i32,

    /// Системный промпт
    pub system_prompt: Option<String>,

    /// Шаблон пользовательского промпта с плейсхолдерами {{product_name}} и т.п.
    pub prompt_template: String,

    /// Для чего используется агент
    pub purpose: AgentPurpose,

    /// Флаг основного агента (в пределах purpose)
    pub is_primary: bool,
}

impl LlmAgent {
    #[allow(clippy::too_many_arguments)]
    pub fn new_for_insert(
        code: String,
        description: String,
        provider_type: LlmProviderType,
        api_endpoint: String,
        api_key: String,
        model_name: String,
        temperature: f64,
        max_tokens: i32,
        system_prompt: Option<String>,
        prompt_template: String,
        purpose: AgentPurpose,
        is_primary: bool,
    ) -> Self {
        let base = BaseAggregate::new(LlmAgentId::new_v4(), code, description);
        Self {
            base,
            provider_type,
            api_endpoint,
            api_key,
            model_name,
            temperature,
            max_tokens,
            system_prompt,
            prompt_template,
            purpose,
            is_primary,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Описание не может быть пустым".into());
        }
        if self.base.code.trim().is_empty() {
            return Err("Код не может быть пустым".into());
        }
        if self.api_endpoint.trim().is_empty() {
            return Err("API Endpoint обязателен".into());
        }
        // Локальной Ollama ключ не нужен
        if self.provider_type != LlmProviderType::Ollama && self.api_key.trim().is_empty() {
            return Err("API ключ обязателен".into());
        }
        if self.model_name.trim().is_empty() {
            return Err("Название модели обязательно".into());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("Temperature должна быть в диапазоне 0.0-2.0".into());
        }
        if self.max_tokens < 256 || self.max_tokens > 128000 {
            return Err("Max tokens должен быть в диапазоне 256-128000".into());
        }
        if self.prompt_template.trim().is_empty() {
            return Err("Шаблон промпта не может быть пустым".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }

    /// Маскирование API ключа для отображения
    pub fn masked_api_key(&self) -> String {
        crate::domain::a001_connection::aggregate::mask_secret(&self.api_key)
    }

    /// Копия для списков и ответов API: ключ замаскирован
    pub fn redacted(mut self) -> Self {
        self.api_key = self.masked_api_key();
        self
    }
}

crate::impl_aggregate_root!(
    LlmAgent,
    LlmAgentId,
    "a002",
    "llm_agent",
    "Агент LLM",
    "Агенты LLM",
    Origin::Self_
);

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> LlmAgent {
        LlmAgent::new_for_insert(
            "AGENT-VISION".into(),
            "Vision".into(),
            LlmProviderType::OpenAI,
            "https://api.openai.com/v1".into(),
            "sk-0123456789abcdef".into(),
            "gpt-4o".into(),
            0.2,
            2048,
            None,
            "Analise as imagens de {{product_name}}".into(),
            AgentPurpose::ImageAnalysis,
            true,
        )
    }

    #[test]
    fn test_validate_ranges() {
        let mut a = agent();
        assert!(a.validate().is_ok());
        a.temperature = 2.5;
        assert!(a.validate().is_err());
        a.temperature = 1.0;
        a.max_tokens = 100;
        assert!(a.validate().is_err());
    }

    #[test]
    fn test_ollama_without_key() {
        let mut a = agent();
        a.api_key = String::new();
        assert!(a.validate().is_err());
        a.provider_type = LlmProviderType::Ollama;
        assert!(a.validate().is_ok());
    }

    #[test]
    fn test_redacted_hides_key() {
        let a = agent().redacted();
        assert_eq!(a.api_key, "sk-0...cdef");
    }
}
