pub mod request;

pub use request::{AnalyzeImagesBatchRequest, AnalyzeImagesRequest};

use crate::usecases::common::{BatchItemResult, UseCaseMetadata};

/// Результат анализа одного товара в пакете
pub type BatchAnalysisResult = BatchItemResult;

pub struct AnalyzeImages;

impl UseCaseMetadata for AnalyzeImages {
    fn usecase_index() -> &'static str {
        "u502"
    }

    fn usecase_name() -> &'static str {
        "analyze_images"
    }

    fn display_name() -> &'static str {
        "Анализ изображений товаров"
    }

    fn description() -> &'static str {
        "Последовательный анализ изображений списка товаров через LLM с vision"
    }
}
