use serde::{Deserialize, Serialize};

/// Строка журнала system_log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: String,
    /// "client" или "server"
    pub source: String,
    /// Префикс категории совпадает с индексом сценария или агрегата:
    /// "u502_analyze_images", "a006_generated_content", "startup"
    pub category: String,
    pub message: String,
}

/// Запись в журнал от клиента (POST /api/logs)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLogRequest {
    #[serde(default = "default_source")]
    pub source: String,
    pub category: String,
    pub message: String,
}

fn default_source() -> String {
    "client".to_string()
}

/// Параметры выборки журнала (GET /api/logs)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogQuery {
    pub limit: Option<u64>,
    /// Фильтр по началу категории, "u50" отдаст все пакетные сценарии
    pub category: Option<String>,
}

impl LogQuery {
    pub const DEFAULT_LIMIT: u64 = 500;
    pub const MAX_LIMIT: u64 = 10_000;

    pub fn effective_limit(&self) -> u64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn category_prefix(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped() {
        assert_eq!(LogQuery::default().effective_limit(), 500);
        let q = LogQuery { limit: Some(0), category: None };
        assert_eq!(q.effective_limit(), 1);
        let q = LogQuery { limit: Some(1_000_000), category: None };
        assert_eq!(q.effective_limit(), 10_000);
    }

    #[test]
    fn blank_category_is_ignored() {
        let q = LogQuery { limit: None, category: Some("  ".into()) };
        assert_eq!(q.category_prefix(), None);
        let q = LogQuery { limit: None, category: Some("u502".into()) };
        assert_eq!(q.category_prefix(), Some("u502"));
    }

    #[test]
    fn client_is_default_source() {
        let req: CreateLogRequest =
            serde_json::from_str(r#"{"category":"ui","message":"opened"}"#).unwrap();
        assert_eq!(req.source, "client");
    }
}
