use serde::{Deserialize, Serialize};

/// Запрос на импорт каталога из VTEX
///
/// Если `product_ids` задан, импортируются только эти товары (VTEX product id),
/// иначе диапазон `from_index..=to_index` из GetProductAndSkuIds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    #[serde(default)]
    pub from_index: Option<u32>,
    #[serde(default)]
    pub to_index: Option<u32>,
    #[serde(default)]
    pub product_ids: Option<Vec<i64>>,
}
