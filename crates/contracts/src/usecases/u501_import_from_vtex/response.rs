use serde::{Deserialize, Serialize};

/// Итог импорта каталога
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub processed: usize,
    pub inserted: usize,
    pub updated: usize,
    pub errors: usize,
    pub error_messages: Vec<String>,
}

impl ImportReport {
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors += 1;
        self.error_messages.push(message.into());
    }
}
