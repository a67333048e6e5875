pub mod request;

pub use request::{GenerateBatchRequest, GenerateRequest};

use crate::usecases::common::UseCaseMetadata;

pub struct GenerateContent;

impl UseCaseMetadata for GenerateContent {
    fn usecase_index() -> &'static str {
        "u503"
    }

    fn usecase_name() -> &'static str {
        "generate_content"
    }

    fn display_name() -> &'static str {
        "Генерация контента"
    }

    fn description() -> &'static str {
        "Генерация названий и описаний товаров через LLM агента"
    }
}
