use crate::domain::{a002_llm_agent, a003_product, a004_sku, a005_image_analysis};
use crate::shared::config;
use crate::shared::llm::{self, prompt, ChatMessage, LlmError, LlmProvider};
use crate::usecases::common::{product_prompt_vars, run_sequential, BatchItemProcessor, OperationError};
use async_trait::async_trait;
use contracts::domain::a002_llm_agent::aggregate::LlmAgent;
use contracts::domain::a004_sku::aggregate::collect_image_urls;
use contracts::domain::a005_image_analysis::aggregate::{ImageAnalysis, ImageAnalysisResponse};
use contracts::enums::AgentPurpose;
use contracts::usecases::common::{BatchReport, UseCaseMetadata};
use contracts::usecases::u502_analyze_images::{AnalyzeImages, AnalyzeImagesBatchRequest};
use once_cell::sync::Lazy;
use std::time::{Duration, Instant};

/// Категория для журналов
static CATEGORY: Lazy<String> = Lazy::new(AnalyzeImages::full_name);

/// Анализ изображений одного товара
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    /// Название товара для отчёта
    async fn product_name(&self, product_id: &str) -> Option<String>;

    async fn analyze(
        &self,
        product_id: &str,
        agent_id: Option<&str>,
        force_new_analysis: bool,
    ) -> anyhow::Result<ImageAnalysisResponse>;
}

/// Анализатор поверх каталога и LLM агента
pub struct CatalogImageAnalyzer {
    max_images: usize,
}

impl CatalogImageAnalyzer {
    pub fn new(max_images: usize) -> Self {
        Self { max_images }
    }

    pub fn from_config() -> Self {
        Self::new(config::get().batch.max_images)
    }
}

#[async_trait]
impl ImageAnalyzer for CatalogImageAnalyzer {
    async fn product_name(&self, product_id: &str) -> Option<String> {
        a003_product::service::display_name(product_id).await
    }

    async fn analyze(
        &self,
        product_id: &str,
        agent_id: Option<&str>,
        force_new_analysis: bool,
    ) -> anyhow::Result<ImageAnalysisResponse> {
        analyze_product_images(product_id, agent_id, force_new_analysis, self.max_images).await
    }
}

/// Проанализировать изображения товара vision-моделью агента
///
/// Без `force_new_analysis` возвращается последний сохранённый анализ без
/// обращения к LLM.
pub async fn analyze_product_images(
    product_id: &str,
    agent_id: Option<&str>,
    force_new_analysis: bool,
    max_images: usize,
) -> anyhow::Result<ImageAnalysisResponse> {
    analyze_with(
        product_id,
        agent_id,
        force_new_analysis,
        max_images,
        llm::provider_for_agent,
    )
    .await
}

/// Тело анализа; провайдер создаётся фабрикой по выбранному агенту
async fn analyze_with<F>(
    product_id: &str,
    agent_id: Option<&str>,
    force_new_analysis: bool,
    max_images: usize,
    make_provider: F,
) -> anyhow::Result<ImageAnalysisResponse>
where
    F: Fn(&LlmAgent) -> Result<Box<dyn LlmProvider>, LlmError> + Send + Sync,
{
    let product = a003_product::service::get_by_id(product_id)
        .await?
        .ok_or_else(|| OperationError::ProductNotFound(product_id.to_string()))?;

    if !force_new_analysis {
        if let Some(analysis) = a005_image_analysis::service::latest_for_product(product_id).await? {
            tracing::info!("Returning cached image analysis for product {}", product_id);
            return Ok(ImageAnalysisResponse {
                analysis,
                cached: true,
            });
        }
    }

    let skus = a004_sku::service::list_by_product(product_id).await?;
    let image_urls = collect_image_urls(&skus, max_images);
    if image_urls.is_empty() {
        return Err(OperationError::NoImages.into());
    }

    let agent = a002_llm_agent::service::resolve(agent_id, AgentPurpose::ImageAnalysis).await?;
    let provider = make_provider(&agent)?;

    let vars = product_prompt_vars(&product, None);
    let user_prompt = prompt::render_template(&agent.prompt_template, &vars);

    let mut messages = Vec::with_capacity(2);
    if let Some(system_prompt) = agent.system_prompt.as_deref().filter(|s| !s.trim().is_empty()) {
        messages.push(ChatMessage::system(system_prompt));
    }
    messages.push(ChatMessage::user_with_images(user_prompt, image_urls.clone()));

    tracing::info!(
        "Analyzing {} images of product {} with {} ({})",
        image_urls.len(),
        product_id,
        agent.model_name,
        provider.provider_name()
    );

    let started = Instant::now();
    let response = provider.chat_completion(messages).await?;
    let duration_ms = started.elapsed().as_millis() as i64;

    let parsed = prompt::extract_json(&response.content);
    if parsed.is_none() {
        tracing::warn!("Image analysis of {} has no JSON object, keeping raw text", product_id);
    }

    let mut analysis = ImageAnalysis::new_for_insert(
        product.vtex_product_id,
        product.display_name().to_string(),
        product.to_string_id(),
        agent.to_string_id(),
        response.model,
        image_urls,
        response.content,
        parsed,
        response.tokens_used,
        duration_ms,
    );
    a005_image_analysis::service::save(&mut analysis).await?;

    Ok(ImageAnalysisResponse {
        analysis,
        cached: false,
    })
}

/// Пакетный анализ: товары по очереди, пауза между ними
pub struct AnalyzeImagesExecutor<A: ImageAnalyzer> {
    analyzer: A,
    pause: Duration,
}

impl AnalyzeImagesExecutor<CatalogImageAnalyzer> {
    pub fn from_config() -> Self {
        Self::new(
            CatalogImageAnalyzer::from_config(),
            Duration::from_millis(config::get().batch.pause_ms),
        )
    }
}

impl<A: ImageAnalyzer> AnalyzeImagesExecutor<A> {
    pub fn new(analyzer: A, pause: Duration) -> Self {
        Self { analyzer, pause }
    }

    pub async fn execute(&self, request: &AnalyzeImagesBatchRequest) -> BatchReport {
        let processor = AnalysisItem {
            analyzer: &self.analyzer,
            agent_id: request.agent_id.as_deref(),
            force_new_analysis: request.force_new_analysis,
        };
        run_sequential(&processor, &request.product_ids, self.pause, CATEGORY.as_str()).await
    }
}

struct AnalysisItem<'a, A: ImageAnalyzer> {
    analyzer: &'a A,
    agent_id: Option<&'a str>,
    force_new_analysis: bool,
}

#[async_trait]
impl<'a, A: ImageAnalyzer> BatchItemProcessor for AnalysisItem<'a, A> {
    async fn display_name(&self, product_id: &str) -> Option<String> {
        self.analyzer.product_name(product_id).await
    }

    async fn process(&self, product_id: &str) -> anyhow::Result<String> {
        let response = self
            .analyzer
            .analyze(product_id, self.agent_id, self.force_new_analysis)
            .await?;
        Ok(if response.cached {
            "Analysis loaded from cache".to_string()
        } else {
            format!(
                "Analyzed {} images",
                response.analysis.image_urls.len()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_test_database;
    use crate::shared::data::fixtures;
    use crate::shared::llm::LlmResponse;
    use std::sync::{Arc, Mutex};

    struct FakeAnalyzer {
        calls: Mutex<Vec<(String, Option<String>, bool)>>,
    }

    impl FakeAnalyzer {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ImageAnalyzer for FakeAnalyzer {
        async fn product_name(&self, product_id: &str) -> Option<String> {
            (product_id != "unknown").then(|| format!("Tênis {}", product_id))
        }

        async fn analyze(
            &self,
            product_id: &str,
            agent_id: Option<&str>,
            force_new_analysis: bool,
        ) -> anyhow::Result<ImageAnalysisResponse> {
            self.calls.lock().unwrap().push((
                product_id.to_string(),
                agent_id.map(str::to_string),
                force_new_analysis,
            ));
            match product_id {
                "unknown" => Err(OperationError::ProductNotFound(product_id.into()).into()),
                "noimg" => Err(OperationError::NoImages.into()),
                _ => Ok(ImageAnalysisResponse {
                    analysis: ImageAnalysis::new_for_insert(
                        1,
                        "Tênis".into(),
                        product_id.into(),
                        "agent".into(),
                        "gpt-4o".into(),
                        vec!["https://img/1.jpg".into(), "https://img/2.jpg".into()],
                        "{}".into(),
                        None,
                        Some(10),
                        5,
                    ),
                    cached: product_id == "cached",
                }),
            }
        }
    }

    fn request(ids: &[&str]) -> AnalyzeImagesBatchRequest {
        AnalyzeImagesBatchRequest {
            product_ids: ids.iter().map(|s| s.to_string()).collect(),
            agent_id: Some("agent-1".into()),
            force_new_analysis: true,
        }
    }

    #[tokio::test]
    async fn test_batch_reports_each_product() {
        let executor = AnalyzeImagesExecutor::new(FakeAnalyzer::new(), Duration::ZERO);
        let report = executor
            .execute(&request(&["p1", "unknown", "noimg", "cached"]))
            .await;

        assert_eq!(report.total, 4);
        assert_eq!(report.success, 2);
        assert_eq!(report.errors, 2);

        assert_eq!(report.results[0].product_name, "Tênis p1");
        assert_eq!(report.results[0].message, "Analyzed 2 images");
        assert_eq!(report.results[1].product_name, "unknown");
        assert_eq!(
            report.results[1].error.as_deref(),
            Some("Product not found: unknown")
        );
        assert_eq!(report.results[2].message, "Error: Product has no images");
        assert_eq!(report.results[3].message, "Analysis loaded from cache");
    }

    #[tokio::test]
    async fn test_request_options_reach_analyzer() {
        let executor = AnalyzeImagesExecutor::new(FakeAnalyzer::new(), Duration::ZERO);
        executor.execute(&request(&["a", "a"])).await;

        let calls = executor.analyzer.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert!(calls
            .iter()
            .all(|(id, agent, force)| id == "a" && agent.as_deref() == Some("agent-1") && *force));
    }

    /// Провайдер, который запоминает запросы и отвечает заготовленным текстом
    struct RecordingProvider {
        requests: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
        answer: String,
    }

    #[async_trait]
    impl LlmProvider for RecordingProvider {
        async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<LlmResponse, LlmError> {
            self.requests.lock().unwrap().push(messages);
            Ok(LlmResponse {
                content: self.answer.clone(),
                tokens_used: Some(42),
                model: "gpt-4o-2024-08-06".into(),
            })
        }

        fn provider_name(&self) -> &str {
            "recording"
        }
    }

    type Requests = Arc<Mutex<Vec<Vec<ChatMessage>>>>;

    fn recording_factory(
        requests: &Requests,
        agents_seen: &Arc<Mutex<Vec<String>>>,
    ) -> impl Fn(&LlmAgent) -> Result<Box<dyn LlmProvider>, LlmError> + Send + Sync {
        let requests = requests.clone();
        let agents_seen = agents_seen.clone();
        move |agent: &LlmAgent| {
            agents_seen.lock().unwrap().push(agent.base.code.clone());
            Ok(Box::new(RecordingProvider {
                requests: requests.clone(),
                answer: "```json\n{\"cor\": \"azul\", \"material\": \"mesh\"}\n```".into(),
            }) as Box<dyn LlmProvider>)
        }
    }

    #[tokio::test]
    async fn test_analysis_uses_primary_vision_agent_and_is_stored() {
        connect_test_database().await.unwrap();
        let product = fixtures::product(1001, "Tênis Corrida Azul").await;
        fixtures::sku(&product, 5001, None, &["https://img/1.jpg", "https://img/2.jpg"]).await;
        fixtures::sku(&product, 5002, None, &["https://img/2.jpg", "https://img/3.jpg"]).await;
        fixtures::agent("WRITER", AgentPurpose::Title, true).await;
        fixtures::agent("VISION", AgentPurpose::ImageAnalysis, true).await;

        let requests = Requests::default();
        let agents_seen = Arc::new(Mutex::new(Vec::new()));
        let product_id = product.to_string_id();
        let response = analyze_with(
            &product_id,
            None,
            false,
            2,
            recording_factory(&requests, &agents_seen),
        )
        .await
        .unwrap();

        assert!(!response.cached);
        assert_eq!(*agents_seen.lock().unwrap(), vec!["VISION".to_string()]);
        assert_eq!(
            response.analysis.image_urls,
            vec!["https://img/1.jpg".to_string(), "https://img/2.jpg".to_string()]
        );
        assert_eq!(response.analysis.parsed.as_ref().unwrap()["cor"], "azul");
        assert_eq!(response.analysis.tokens_used, Some(42));
        assert_eq!(response.analysis.model_name, "gpt-4o-2024-08-06");

        {
            let requests = requests.lock().unwrap();
            assert_eq!(requests.len(), 1);
            let messages = &requests[0];
            assert_eq!(messages.len(), 2);
            assert_eq!(messages[1].content, "Analise Tênis Corrida Azul da marca Olympikus");
            assert_eq!(messages[1].images.len(), 2);
        }

        let stored = a005_image_analysis::service::latest_for_product(&product_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.to_string_id(), response.analysis.to_string_id());
        assert_eq!(stored.parsed, response.analysis.parsed);
    }

    #[tokio::test]
    async fn test_cached_analysis_skips_llm_unless_forced() {
        connect_test_database().await.unwrap();
        let product = fixtures::product(1002, "Mochila Escolar").await;
        fixtures::sku(&product, 5003, None, &["https://img/m.jpg"]).await;
        fixtures::agent("VISION", AgentPurpose::ImageAnalysis, true).await;

        let requests = Requests::default();
        let agents_seen = Arc::new(Mutex::new(Vec::new()));
        let product_id = product.to_string_id();

        let first = analyze_with(&product_id, None, false, 4, recording_factory(&requests, &agents_seen))
            .await
            .unwrap();
        let second = analyze_with(&product_id, None, false, 4, recording_factory(&requests, &agents_seen))
            .await
            .unwrap();
        assert!(second.cached);
        assert_eq!(second.analysis.to_string_id(), first.analysis.to_string_id());
        assert_eq!(requests.lock().unwrap().len(), 1);

        let forced = analyze_with(&product_id, None, true, 4, recording_factory(&requests, &agents_seen))
            .await
            .unwrap();
        assert!(!forced.cached);
        assert_ne!(forced.analysis.to_string_id(), first.analysis.to_string_id());
        assert_eq!(requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_product_without_images_is_rejected_before_llm() {
        connect_test_database().await.unwrap();
        let product = fixtures::product(1003, "Boné").await;
        fixtures::sku(&product, 5004, None, &["  "]).await;
        fixtures::agent("VISION", AgentPurpose::ImageAnalysis, true).await;

        let requests = Requests::default();
        let agents_seen = Arc::new(Mutex::new(Vec::new()));
        let err = analyze_with(
            &product.to_string_id(),
            None,
            true,
            4,
            recording_factory(&requests, &agents_seen),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<OperationError>(),
            Some(OperationError::NoImages)
        ));
        assert!(agents_seen.lock().unwrap().is_empty());
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product_and_missing_agent() {
        connect_test_database().await.unwrap();
        let requests = Requests::default();
        let agents_seen = Arc::new(Mutex::new(Vec::new()));

        let missing = uuid::Uuid::new_v4().to_string();
        let err = analyze_with(&missing, None, false, 4, recording_factory(&requests, &agents_seen))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OperationError>(),
            Some(OperationError::ProductNotFound(id)) if *id == missing
        ));

        // Основной агент есть только для заголовков
        let product = fixtures::product(1004, "Meia").await;
        fixtures::sku(&product, 5005, None, &["https://img/meia.jpg"]).await;
        fixtures::agent("WRITER", AgentPurpose::Title, true).await;
        let err = analyze_with(
            &product.to_string_id(),
            None,
            false,
            4,
            recording_factory(&requests, &agents_seen),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("image_analysis"));
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let executor = AnalyzeImagesExecutor::new(FakeAnalyzer::new(), Duration::from_millis(100));
        let report = executor.execute(&request(&[])).await;
        assert_eq!(report.total, 0);
        assert_eq!(report.success, 0);
        assert_eq!(report.errors, 0);
        assert!(report.results.is_empty());
    }
}
