use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM API error: {0}")]
    Api(String),

    #[error("LLM rejected the API key: {0}")]
    Auth(String),

    #[error("Invalid LLM request: {0}")]
    InvalidRequest(String),

    #[error("LLM rate limit exceeded")]
    RateLimited,

    #[error("LLM endpoint unreachable: {0}")]
    Network(String),

    #[error("Provider not supported: {0}")]
    UnsupportedProvider(String),
}

impl LlmError {
    /// Разобрать текст ошибки клиента: коды 401/429 и сетевые сбои
    pub fn classify(message: String) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("401") || lower.contains("authentication") || lower.contains("api key") {
            LlmError::Auth(message)
        } else if lower.contains("429") || lower.contains("rate limit") {
            LlmError::RateLimited
        } else if lower.contains("error sending request") || lower.contains("connection refused") {
            LlmError::Network(message)
        } else {
            LlmError::Api(message)
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

/// Сообщение запроса; изображения передаются только в сообщении пользователя
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
            images: Vec::new(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::user_with_images(content, Vec::new())
    }

    pub fn user_with_images(content: impl Into<String>, images: Vec<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            images,
        }
    }
}

/// Ответ модели: текст первого варианта и расход токенов
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: String,
    pub tokens_used: Option<i32>,
    /// Модель, которую вернул сервер (может отличаться от запрошенной)
    pub model: String,
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<LlmResponse, LlmError>;

    /// Короткий запрос для кнопки "Проверить" в карточке агента
    async fn test_connection(&self) -> Result<(), LlmError> {
        self.chat_completion(vec![ChatMessage::user("ping")])
            .await
            .map(|_| ())
    }

    fn provider_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_maps_status_codes() {
        assert!(matches!(
            LlmError::classify("status 401 Unauthorized".into()),
            LlmError::Auth(_)
        ));
        assert!(matches!(
            LlmError::classify("429 Too Many Requests".into()),
            LlmError::RateLimited
        ));
        assert!(matches!(
            LlmError::classify("error sending request for url".into()),
            LlmError::Network(_)
        ));
        assert!(matches!(
            LlmError::classify("model not found".into()),
            LlmError::Api(_)
        ));
    }

    #[test]
    fn plain_user_message_has_no_images() {
        let msg = ChatMessage::user("hi");
        assert_eq!(msg.role, ChatRole::User);
        assert!(msg.images.is_empty());
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json.get("images").is_none());
    }
}
