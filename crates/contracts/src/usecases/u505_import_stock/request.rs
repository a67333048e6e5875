use serde::{Deserialize, Serialize};

/// Источник остатков
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockSource {
    Vtex,
    Csv,
}

impl StockSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockSource::Vtex => "vtex",
            StockSource::Csv => "csv",
        }
    }
}

/// Запрос на импорт остатков из VTEX
///
/// Без `sku_ids` обрабатываются все активные SKU каталога.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockImportRequest {
    pub source: StockSource,
    #[serde(default)]
    pub sku_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub push_to_anymarket: bool,
}
