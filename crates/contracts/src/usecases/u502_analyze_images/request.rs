use serde::{Deserialize, Serialize};

/// Запрос на пакетный анализ изображений
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeImagesBatchRequest {
    pub product_ids: Vec<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub force_new_analysis: bool,
}

/// Запрос на анализ изображений одного товара
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeImagesRequest {
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub force_new_analysis: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_default() {
        let req: AnalyzeImagesBatchRequest =
            serde_json::from_str(r#"{"productIds":["a","b"]}"#).unwrap();
        assert_eq!(req.product_ids, vec!["a", "b"]);
        assert!(req.agent_id.is_none());
        assert!(!req.force_new_analysis);
    }
}
