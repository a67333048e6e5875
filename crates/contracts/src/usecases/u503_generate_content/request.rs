use crate::domain::a006_generated_content::aggregate::ContentKind;
use serde::{Deserialize, Serialize};

/// Генерация контента для одного товара
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub kind: ContentKind,
    #[serde(default)]
    pub agent_id: Option<String>,
}

/// Пакетная генерация
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBatchRequest {
    pub product_ids: Vec<String>,
    pub kind: ContentKind,
    #[serde(default)]
    pub agent_id: Option<String>,
}
