use serde::{Deserialize, Serialize};

/// Запрос на публикацию товаров в Anymarket
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub product_ids: Vec<String>,
    #[serde(default = "default_true")]
    pub publish_title: bool,
    #[serde(default = "default_true")]
    pub publish_description: bool,
    #[serde(default)]
    pub upload_images: bool,
    #[serde(default)]
    pub remove_background: bool,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req: PublishRequest = serde_json::from_str(r#"{"productIds":["x"]}"#).unwrap();
        assert!(req.publish_title);
        assert!(req.publish_description);
        assert!(!req.upload_images);
        assert!(!req.remove_background);
    }
}
