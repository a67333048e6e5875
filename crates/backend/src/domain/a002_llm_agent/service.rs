use super::repository;
use crate::shared::llm::{provider_for_agent, LlmError};
use contracts::domain::a002_llm_agent::aggregate::{LlmAgent, LlmProviderType};
use contracts::enums::AgentPurpose;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmAgentDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub comment: Option<String>,
    pub provider_type: String,
    pub api_endpoint: String,
    #[serde(default)]
    pub api_key: String,
    pub model_name: String,
    pub temperature: f64,
    pub max_tokens: i32,
    pub system_prompt: Option<String>,
    pub prompt_template: String,
    pub purpose: AgentPurpose,
    #[serde(default)]
    pub is_primary: bool,
}

/// Результат теста подключения агента
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentTestResult {
    pub success: bool,
    pub message: String,
    pub provider: String,
    pub model: String,
}

/// Ключ пришёл из списка в замаскированном виде ("sk-a...9xQz" или "****")
fn is_masked_key(key: &str) -> bool {
    key.contains("...") || key == "****"
}

fn parse_provider(raw: &str) -> anyhow::Result<LlmProviderType> {
    LlmProviderType::from_str(raw).map_err(|e| anyhow::anyhow!("Invalid provider type: {}", e))
}

/// Перенести поля формы в агрегат; пустой или маскированный ключ сохранённый не трогает
fn apply_dto(agent: &mut LlmAgent, dto: LlmAgentDto) -> anyhow::Result<()> {
    if let Some(code) = dto.code.filter(|c| !c.trim().is_empty()) {
        agent.base.code = code;
    }
    agent.base.description = dto.description;
    agent.base.comment = dto.comment;
    agent.provider_type = parse_provider(&dto.provider_type)?;
    agent.api_endpoint = dto.api_endpoint;
    if !dto.api_key.is_empty() && !is_masked_key(&dto.api_key) {
        agent.api_key = dto.api_key;
    }
    agent.model_name = dto.model_name;
    agent.temperature = dto.temperature;
    agent.max_tokens = dto.max_tokens;
    agent.system_prompt = dto.system_prompt;
    agent.prompt_template = dto.prompt_template;
    agent.purpose = dto.purpose;
    agent.is_primary = dto.is_primary;
    Ok(())
}

/// Проверить и сохранить; основной агент уникален в пределах назначения
async fn store(agent: &mut LlmAgent, is_new: bool) -> anyhow::Result<()> {
    agent
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    agent.before_write();

    if agent.is_primary {
        repository::clear_primary(agent.purpose).await?;
    }
    if is_new {
        repository::insert(agent).await
    } else {
        repository::update(agent).await
    }
}

pub async fn create(dto: LlmAgentDto) -> anyhow::Result<Uuid> {
    let code = dto
        .code
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| format!("AGENT-{}", &Uuid::new_v4().simple().to_string()[..8]));

    let mut agent = LlmAgent::new_for_insert(
        code,
        dto.description.clone(),
        parse_provider(&dto.provider_type)?,
        dto.api_endpoint.clone(),
        String::new(),
        dto.model_name.clone(),
        dto.temperature,
        dto.max_tokens,
        None,
        String::new(),
        dto.purpose,
        false,
    );
    apply_dto(&mut agent, dto)?;
    store(&mut agent, true).await?;
    tracing::info!(
        "LLM agent {} created for {}",
        agent.base.code,
        agent.purpose.as_str()
    );
    Ok(agent.base.id.0)
}

pub async fn update(dto: LlmAgentDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .clone()
        .ok_or_else(|| anyhow::anyhow!("ID is required"))?;
    let mut agent = repository::find_by_id(&id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Agent not found"))?;
    apply_dto(&mut agent, dto)?;
    store(&mut agent, false).await
}

/// Мягкое удаление агента
pub async fn delete(id: &str) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

/// Получение агента по ID (с ключом, для внутреннего использования)
pub async fn get_by_id(id: &str) -> anyhow::Result<Option<LlmAgent>> {
    repository::find_by_id(id).await
}

/// Список агентов с замаскированными ключами
pub async fn list_all() -> anyhow::Result<Vec<LlmAgent>> {
    Ok(repository::list_all()
        .await?
        .into_iter()
        .map(LlmAgent::redacted)
        .collect())
}

/// Пагинированный список с замаскированными ключами
pub async fn list_paginated(
    limit: u64,
    offset: u64,
    sort_by: &str,
    sort_desc: bool,
) -> anyhow::Result<(Vec<LlmAgent>, u64)> {
    let (items, total) = repository::list_paginated(limit, offset, sort_by, sort_desc).await?;
    Ok((items.into_iter().map(LlmAgent::redacted).collect(), total))
}

/// Получение основного агента для назначения
pub async fn get_primary(purpose: AgentPurpose) -> anyhow::Result<Option<LlmAgent>> {
    repository::find_primary(purpose).await
}

/// Агент для операции: явный по ID, иначе основной для назначения
pub async fn resolve(agent_id: Option<&str>, purpose: AgentPurpose) -> anyhow::Result<LlmAgent> {
    match agent_id.map(str::trim).filter(|s| !s.is_empty()) {
        Some(id) => repository::find_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("LLM agent not found: {}", id)),
        None => repository::find_primary(purpose).await?.ok_or_else(|| {
            anyhow::anyhow!("No primary LLM agent for purpose '{}'", purpose.as_str())
        }),
    }
}

/// Пробный запрос к провайдеру агента; ошибка возвращается текстом в результате
pub async fn test_connection(agent: &LlmAgent) -> AgentTestResult {
    let provider = agent.provider_type.as_str().to_string();
    let model = agent.model_name.clone();

    let outcome = match provider_for_agent(agent) {
        Ok(p) => p.test_connection().await,
        Err(e) => Err(e),
    };
    let (success, message) = match outcome {
        Ok(()) => (true, format!("Connected to {} via {}", model, provider)),
        Err(LlmError::UnsupportedProvider(p)) => (false, format!("Provider {} not supported", p)),
        Err(e) => (false, format!("Connection failed: {}", e)),
    };
    if !success {
        tracing::warn!("LLM agent {} test failed: {}", agent.base.code, message);
    }

    AgentTestResult {
        success,
        message,
        provider,
        model,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::fixtures;

    fn dto(api_key: &str) -> LlmAgentDto {
        LlmAgentDto {
            id: None,
            code: Some("  ".into()),
            description: "Vision".into(),
            comment: None,
            provider_type: "OpenAI".into(),
            api_endpoint: "https://api.openai.com/v1".into(),
            api_key: api_key.into(),
            model_name: "gpt-4o".into(),
            temperature: 0.2,
            max_tokens: 2048,
            system_prompt: None,
            prompt_template: "{{product_name}}".into(),
            purpose: AgentPurpose::ImageAnalysis,
            is_primary: true,
        }
    }

    fn stored_agent() -> LlmAgent {
        LlmAgent::new_for_insert(
            "AGENT-1".into(),
            "Old".into(),
            LlmProviderType::OpenAI,
            "https://api.openai.com/v1".into(),
            "sk-real-secret".into(),
            "gpt-4o-mini".into(),
            0.7,
            1024,
            None,
            String::new(),
            AgentPurpose::General,
            false,
        )
    }

    #[test]
    fn masked_key_keeps_stored_secret() {
        let mut agent = stored_agent();
        apply_dto(&mut agent, dto("sk-r...cret")).unwrap();
        assert_eq!(agent.api_key, "sk-real-secret");
        assert_eq!(agent.base.code, "AGENT-1");
        assert_eq!(agent.purpose, AgentPurpose::ImageAnalysis);
        assert!(agent.is_primary);
    }

    #[test]
    fn new_key_replaces_secret() {
        let mut agent = stored_agent();
        apply_dto(&mut agent, dto("sk-new")).unwrap();
        assert_eq!(agent.api_key, "sk-new");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let mut agent = stored_agent();
        let mut bad = dto("");
        bad.provider_type = "Gemini".into();
        assert!(apply_dto(&mut agent, bad).is_err());
        assert!(is_masked_key("****"));
        assert!(!is_masked_key("sk-plain"));
    }

    async fn is_primary(id: &str) -> bool {
        get_by_id(id).await.unwrap().unwrap().is_primary
    }

    #[tokio::test]
    async fn one_primary_agent_per_purpose() {
        crate::shared::data::db::connect_test_database().await.unwrap();
        let first = fixtures::agent("VISION-1", AgentPurpose::ImageAnalysis, true).await;
        let second = fixtures::agent("VISION-2", AgentPurpose::ImageAnalysis, true).await;
        let writer = fixtures::agent("WRITER", AgentPurpose::Title, true).await;

        assert!(!is_primary(&first).await);
        assert!(is_primary(&second).await);
        assert!(is_primary(&writer).await);

        let primary = get_primary(AgentPurpose::ImageAnalysis).await.unwrap().unwrap();
        assert_eq!(primary.to_string_id(), second);

        // Повторное назначение через update снимает флаг с прежнего
        let mut promote = fixtures::agent_dto("VISION-1", AgentPurpose::ImageAnalysis, true);
        promote.id = Some(first.clone());
        update(promote).await.unwrap();

        assert!(is_primary(&first).await);
        assert!(!is_primary(&second).await);
        assert!(is_primary(&writer).await);

        let primaries = list_all()
            .await
            .unwrap()
            .into_iter()
            .filter(|a| a.purpose == AgentPurpose::ImageAnalysis && a.is_primary)
            .count();
        assert_eq!(primaries, 1);
    }

    #[tokio::test]
    async fn resolve_prefers_explicit_agent() {
        crate::shared::data::db::connect_test_database().await.unwrap();
        let primary = fixtures::agent("VISION", AgentPurpose::ImageAnalysis, true).await;
        let general = fixtures::agent("ANY", AgentPurpose::General, false).await;

        let picked = resolve(Some(&general), AgentPurpose::ImageAnalysis).await.unwrap();
        assert_eq!(picked.to_string_id(), general);
        let picked = resolve(Some("  "), AgentPurpose::ImageAnalysis).await.unwrap();
        assert_eq!(picked.to_string_id(), primary);
        assert!(resolve(None, AgentPurpose::Description).await.is_err());
    }
}
