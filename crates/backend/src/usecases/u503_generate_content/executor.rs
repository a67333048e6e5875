use crate::domain::{a002_llm_agent, a003_product, a005_image_analysis, a006_generated_content};
use crate::shared::config;
use crate::shared::llm::{self, prompt, ChatMessage};
use crate::usecases::common::{product_prompt_vars, run_sequential, BatchItemProcessor, OperationError};
use async_trait::async_trait;
use contracts::domain::a006_generated_content::aggregate::{ContentKind, GeneratedContent};
use contracts::usecases::common::{BatchReport, UseCaseMetadata};
use contracts::usecases::u503_generate_content::{GenerateBatchRequest, GenerateContent};
use once_cell::sync::Lazy;
use std::time::Duration;

/// Категория для журналов
static CATEGORY: Lazy<String> = Lazy::new(GenerateContent::full_name);

/// Сгенерировать название или описание товара и сохранить черновик
pub async fn generate_for_product(
    product_id: &str,
    kind: ContentKind,
    agent_id: Option<&str>,
    title_max_len: usize,
) -> anyhow::Result<GeneratedContent> {
    let product = a003_product::service::get_by_id(product_id)
        .await?
        .ok_or_else(|| OperationError::ProductNotFound(product_id.to_string()))?;

    let agent = a002_llm_agent::service::resolve(agent_id, kind.agent_purpose()).await?;
    let provider = llm::provider_for_agent(&agent)?;

    let image_analysis = a005_image_analysis::service::latest_for_product(product_id)
        .await?
        .map(|a| a.summary_text());

    let vars = product_prompt_vars(&product, image_analysis.as_deref());
    let user_prompt = prompt::render_template(&agent.prompt_template, &vars);

    let mut messages = Vec::with_capacity(2);
    if let Some(system_prompt) = agent.system_prompt.as_deref().filter(|s| !s.trim().is_empty()) {
        messages.push(ChatMessage::system(system_prompt));
    }
    messages.push(ChatMessage::user(user_prompt));

    let response = provider.chat_completion(messages).await?;
    let content = postprocess(kind, &response.content, title_max_len);
    if content.is_empty() {
        return Err(OperationError::Invalid(format!("LLM returned empty {}", kind.as_str())).into());
    }

    let mut record = GeneratedContent::new_draft(
        product.to_string_id(),
        product.display_name().to_string(),
        agent.to_string_id(),
        kind,
        content,
        response.model,
        response.tokens_used,
    );
    a006_generated_content::service::save_draft(&mut record).await?;

    tracing::info!(
        "Generated {} draft {} for product {}",
        kind.as_str(),
        record.base.code,
        product_id
    );
    Ok(record)
}

fn postprocess(kind: ContentKind, raw: &str, title_max_len: usize) -> String {
    match kind {
        ContentKind::Title => prompt::clean_title(raw, title_max_len),
        ContentKind::Description => prompt::clean_description(raw),
    }
}

/// Пакетная генерация: товары по очереди, как пакетный анализ изображений
pub struct GenerateBatchExecutor {
    pause: Duration,
    title_max_len: usize,
}

impl GenerateBatchExecutor {
    pub fn from_config() -> Self {
        let batch = &config::get().batch;
        Self {
            pause: Duration::from_millis(batch.pause_ms),
            title_max_len: batch.title_max_len,
        }
    }

    pub async fn execute(&self, request: &GenerateBatchRequest) -> BatchReport {
        let processor = GenerateItem {
            kind: request.kind,
            agent_id: request.agent_id.as_deref(),
            title_max_len: self.title_max_len,
        };
        run_sequential(&processor, &request.product_ids, self.pause, CATEGORY.as_str()).await
    }
}

struct GenerateItem<'a> {
    kind: ContentKind,
    agent_id: Option<&'a str>,
    title_max_len: usize,
}

#[async_trait]
impl<'a> BatchItemProcessor for GenerateItem<'a> {
    async fn display_name(&self, product_id: &str) -> Option<String> {
        a003_product::service::display_name(product_id).await
    }

    async fn process(&self, product_id: &str) -> anyhow::Result<String> {
        let record =
            generate_for_product(product_id, self.kind, self.agent_id, self.title_max_len).await?;
        Ok(format!("Draft {} created", record.base.code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postprocess_title_is_cleaned_and_truncated() {
        let title = postprocess(ContentKind::Title, "  \"Tênis Corrida Leve Azul\"\n", 10);
        assert_eq!(title.chars().count(), 10);
        assert!(!title.contains('"'));
    }

    #[test]
    fn test_postprocess_description_is_sanitized() {
        let description = postprocess(
            ContentKind::Description,
            "<p>Confortável</p><script>alert(1)</script>",
            150,
        );
        assert!(description.contains("<p>Confortável</p>"));
        assert!(!description.contains("script"));
    }
}
