use crate::domain::common::{AggregateId, BaseAggregate, Origin};
use serde::{Deserialize, Serialize};

crate::uuid_aggregate_id!(ImageAnalysisId, "ID результата анализа изображений");

/// Результат анализа изображений товара моделью с vision
///
/// `base.code` = "IA-<vtex product id>", `base.description` = название товара на момент анализа.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAnalysis {
    #[serde(flatten)]
    pub base: BaseAggregate<ImageAnalysisId>,

    /// Ссылка на a003_product (UUID)
    #[serde(rename = "productRef")]
    pub product_ref: String,

    /// Ссылка на a002_llm_agent (UUID)
    #[serde(rename = "agentRef")]
    pub agent_ref: String,

    #[serde(rename = "modelName")]
    pub model_name: String,

    /// Какие изображения были отправлены модели
    #[serde(rename = "imageUrls")]
    pub image_urls: Vec<String>,

    /// Ответ модели как есть
    #[serde(rename = "rawContent")]
    pub raw_content: String,

    /// JSON, извлечённый из ответа (если модель его вернула)
    pub parsed: Option<serde_json::Value>,

    #[serde(rename = "tokensUsed")]
    pub tokens_used: Option<i32>,

    #[serde(rename = "durationMs")]
    pub duration_ms: i64,
}

impl ImageAnalysis {
    #[allow(clippy::too_many_arguments)]
    pub fn new_for_insert(
        vtex_product_id: i64,
        product_name: String,
        product_ref: String,
        agent_ref: String,
        model_name: String,
        image_urls: Vec<String>,
        raw_content: String,
        parsed: Option<serde_json::Value>,
        tokens_used: Option<i32>,
        duration_ms: i64,
    ) -> Self {
        Self {
            base: BaseAggregate::new(
                ImageAnalysisId::new_v4(),
                format!("IA-{}", vtex_product_id),
                product_name,
            ),
            product_ref,
            agent_ref,
            model_name,
            image_urls,
            raw_content,
            parsed,
            tokens_used,
            duration_ms,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Текст анализа для подстановки в шаблоны генерации
    pub fn summary_text(&self) -> String {
        match &self.parsed {
            Some(value) => value.to_string(),
            None => self.raw_content.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.product_ref.trim().is_empty() {
            return Err("Ссылка на товар не может быть пустой".into());
        }
        if self.image_urls.is_empty() {
            return Err("Анализ без изображений не сохраняется".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

crate::impl_aggregate_root!(
    ImageAnalysis,
    ImageAnalysisId,
    "a005",
    "image_analysis",
    "Анализ изображений",
    "Анализы изображений",
    Origin::Llm
);

/// Ответ операции анализа: сам анализ и признак, что он взят из БД
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAnalysisResponse {
    pub analysis: ImageAnalysis,
    pub cached: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(parsed: Option<serde_json::Value>) -> ImageAnalysis {
        ImageAnalysis::new_for_insert(
            42,
            "Tênis".into(),
            "p".into(),
            "a".into(),
            "gpt-4o".into(),
            vec!["http://x/1.jpg".into()],
            "  texto livre  ".into(),
            parsed,
            Some(120),
            900,
        )
    }

    #[test]
    fn test_code_and_summary() {
        let a = analysis(None);
        assert_eq!(a.base.code, "IA-42");
        assert_eq!(a.summary_text(), "texto livre");

        let b = analysis(Some(serde_json::json!({"cor": "azul"})));
        assert_eq!(b.summary_text(), r#"{"cor":"azul"}"#);
    }

    #[test]
    fn test_validate_requires_images() {
        let mut a = analysis(None);
        assert!(a.validate().is_ok());
        a.image_urls.clear();
        assert!(a.validate().is_err());
    }
}
