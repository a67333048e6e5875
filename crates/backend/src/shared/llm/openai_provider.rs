use super::types::{ChatMessage, ChatRole, LlmError, LlmProvider, LlmResponse};
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage,
        ChatCompletionRequestMessageContentPartImageArgs,
        ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequestArgs, ImageDetail, ImageUrlArgs,
    },
    Client,
};
use async_trait::async_trait;

/// Провайдер для OpenAI-совместимого chat completions API (OpenAI, Ollama)
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    name: String,
}

impl OpenAiProvider {
    /// Создать с кастомным endpoint (для совместимых API)
    pub fn new_with_endpoint(
        api_endpoint: String,
        api_key: String,
        model: String,
        temperature: f64,
        max_tokens: i32,
    ) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_endpoint.trim_end_matches('/'));
        let client = Client::with_config(config);

        Self {
            client,
            model,
            temperature: temperature as f32,
            max_tokens: max_tokens.max(1) as u32,
            name: "OpenAI".to_string(),
        }
    }

    /// Имя провайдера для логов и ответов test_connection
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn user_message(msg: ChatMessage) -> Result<ChatCompletionRequestMessage, LlmError> {
        if msg.images.is_empty() {
            return Ok(ChatCompletionRequestUserMessageArgs::default()
                .content(msg.content)
                .build()
                .map_err(|e| LlmError::InvalidRequest(e.to_string()))?
                .into());
        }

        let mut parts: Vec<ChatCompletionRequestUserMessageContentPart> =
            Vec::with_capacity(msg.images.len() + 1);
        parts.push(
            ChatCompletionRequestMessageContentPartTextArgs::default()
                .text(msg.content)
                .build()
                .map_err(|e| LlmError::InvalidRequest(e.to_string()))?
                .into(),
        );
        for url in msg.images {
            let image_url = ImageUrlArgs::default()
                .url(url)
                .detail(ImageDetail::Auto)
                .build()
                .map_err(|e| LlmError::InvalidRequest(e.to_string()))?;
            parts.push(
                ChatCompletionRequestMessageContentPartImageArgs::default()
                    .image_url(image_url)
                    .build()
                    .map_err(|e| LlmError::InvalidRequest(e.to_string()))?
                    .into(),
            );
        }

        Ok(ChatCompletionRequestUserMessageArgs::default()
            .content(parts)
            .build()
            .map_err(|e| LlmError::InvalidRequest(e.to_string()))?
            .into())
    }

    /// Конвертировать наши сообщения в формат OpenAI
    fn convert_messages(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<Vec<ChatCompletionRequestMessage>, LlmError> {
        let mut openai_messages = Vec::with_capacity(messages.len());

        for msg in messages {
            let openai_msg = match msg.role {
                ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
                    .content(msg.content)
                    .build()
                    .map_err(|e| LlmError::InvalidRequest(e.to_string()))?
                    .into(),
                ChatRole::User => Self::user_message(msg)?,
            };
            openai_messages.push(openai_msg);
        }

        Ok(openai_messages)
    }

    /// Проверяет, поддерживает ли модель расширенные параметры (temperature, max tokens)
    ///
    /// GPT-5 и o1/o3 модели принимают только дефолтный temperature.
    fn supports_advanced_params(model_id: &str) -> bool {
        let is_restricted = model_id.starts_with("gpt-5")
            || model_id.starts_with("o1")
            || model_id.starts_with("o3");

        !is_restricted
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<LlmResponse, LlmError> {
        let openai_messages = self.convert_messages(messages)?;

        let mut request_builder = CreateChatCompletionRequestArgs::default();
        request_builder
            .model(&self.model)
            .messages(openai_messages);

        if Self::supports_advanced_params(&self.model) {
            request_builder
                .temperature(self.temperature)
                .max_completion_tokens(self.max_tokens);
        }

        let request = request_builder
            .build()
            .map_err(|e| LlmError::InvalidRequest(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LlmError::classify(e.to_string()))?;

        let choice = response
            .choices
            .first()
            .ok_or_else(|| LlmError::Api("response has no choices".to_string()))?;

        Ok(LlmResponse {
            content: choice.message.content.clone().unwrap_or_default(),
            tokens_used: response.usage.as_ref().map(|u| u.total_tokens as i32),
            model: response.model.clone(),
        })
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restricted_models() {
        assert!(OpenAiProvider::supports_advanced_params("gpt-4o"));
        assert!(OpenAiProvider::supports_advanced_params("llava:13b"));
        assert!(!OpenAiProvider::supports_advanced_params("gpt-5-mini"));
        assert!(!OpenAiProvider::supports_advanced_params("o3-mini"));
    }

    #[test]
    fn test_vision_message_builds_parts() {
        let provider = OpenAiProvider::new_with_endpoint(
            "http://localhost:11434/v1/".into(),
            "".into(),
            "llava".into(),
            0.2,
            1024,
        );
        let messages = provider
            .convert_messages(vec![
                ChatMessage::system("sys"),
                ChatMessage::user_with_images(
                    "describe",
                    vec!["http://x/1.jpg".into(), "http://x/2.jpg".into()],
                ),
            ])
            .unwrap();
        assert_eq!(messages.len(), 2);
        let json = serde_json::to_value(&messages[1]).unwrap();
        assert_eq!(json["content"].as_array().map(|a| a.len()), Some(3));
    }
}
