use serde::{Deserialize, Serialize};

/// Результат по одному SKU
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItemResult {
    pub sku_id: i64,
    pub previous_quantity: Option<i64>,
    pub quantity: i64,
    pub pushed_to_anymarket: bool,
}

/// Итог импорта остатков
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockImportReport {
    pub processed: usize,
    pub updated: usize,
    pub errors: usize,
    pub error_messages: Vec<String>,
    pub items: Vec<StockItemResult>,
}

impl StockImportReport {
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors += 1;
        self.error_messages.push(message.into());
    }
}
