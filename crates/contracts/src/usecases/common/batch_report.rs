use serde::{Deserialize, Serialize};

/// Результат обработки одного товара в пакетной операции
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemResult {
    pub product_id: String,
    pub product_name: String,
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Длительность обработки, мс
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

impl BatchItemResult {
    pub fn ok(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        message: impl Into<String>,
        duration: u64,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            success: true,
            message: message.into(),
            error: None,
            duration: Some(duration),
        }
    }

    pub fn failed(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        error: impl Into<String>,
        duration: u64,
    ) -> Self {
        let error = error.into();
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            success: false,
            message: format!("Error: {}", error),
            error: Some(error),
            duration: Some(duration),
        }
    }
}

/// Сводный отчёт пакетной операции
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub total: usize,
    pub success: usize,
    pub errors: usize,
    pub results: Vec<BatchItemResult>,
    /// Общая длительность, мс
    pub total_time: u64,
}

impl BatchReport {
    /// Добавить результат и пересчитать счётчики
    pub fn push(&mut self, result: BatchItemResult) {
        if result.success {
            self.success += 1;
        } else {
            self.errors += 1;
        }
        self.results.push(result);
        self.total = self.results.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_follow_results() {
        let mut report = BatchReport::default();
        report.push(BatchItemResult::ok("1", "A", "ok", 10));
        report.push(BatchItemResult::failed("2", "2", "boom", 5));
        report.push(BatchItemResult::ok("3", "C", "ok", 7));
        assert_eq!(report.total, 3);
        assert_eq!(report.success, 2);
        assert_eq!(report.errors, 1);
        assert_eq!(report.results[1].error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let mut report = BatchReport::default();
        report.push(BatchItemResult::ok("1", "A", "ok", 10));
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("totalTime").is_some());
        let item = &json["results"][0];
        assert_eq!(item["productId"], "1");
        assert_eq!(item["productName"], "A");
        assert!(item.get("error").is_none());
    }
}
