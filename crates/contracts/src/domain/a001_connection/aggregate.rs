use crate::domain::common::{AggregateId, BaseAggregate, Origin};
use crate::enums::IntegrationKind;
use serde::{Deserialize, Serialize};

crate::uuid_aggregate_id!(ConnectionId, "ID подключения к внешнему сервису");

pub const DEFAULT_VTEX_ENVIRONMENT: &str = "vtexcommercestable";
pub const DEFAULT_ANYMARKET_BASE_URL: &str = "https://api.anymarket.com.br/v2";
pub const DEFAULT_PIXIAN_BASE_URL: &str = "https://api.pixian.ai/api/v2";

/// Подключение к внешнему сервису (VTEX, Anymarket, Pixian)
///
/// Значение `api_key` / `api_secret` зависит от вида:
/// - VTEX: X-VTEX-API-AppKey / X-VTEX-API-AppToken
/// - Anymarket: gumgaToken / не используется
/// - Pixian: API Id / API Secret (basic auth)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    #[serde(flatten)]
    pub base: BaseAggregate<ConnectionId>,

    pub kind: IntegrationKind,

    /// Явный base URL (перекрывает вычисляемый)
    #[serde(rename = "baseUrl")]
    pub base_url: Option<String>,

    /// Имя аккаунта VTEX
    #[serde(rename = "accountName")]
    pub account_name: Option<String>,

    /// Окружение VTEX (vtexcommercestable по умолчанию)
    pub environment: Option<String>,

    #[serde(rename = "apiKey")]
    pub api_key: String,

    #[serde(rename = "apiSecret")]
    pub api_secret: Option<String>,

    /// Основное подключение своего вида
    #[serde(rename = "isPrimary")]
    pub is_primary: bool,
}

impl Connection {
    #[allow(clippy::too_many_arguments)]
    pub fn new_for_insert(
        code: String,
        description: String,
        kind: IntegrationKind,
        base_url: Option<String>,
        account_name: Option<String>,
        environment: Option<String>,
        api_key: String,
        api_secret: Option<String>,
        is_primary: bool,
    ) -> Self {
        Self {
            base: BaseAggregate::new(ConnectionId::new_v4(), code, description),
            kind,
            base_url,
            account_name,
            environment,
            api_key,
            api_secret,
            is_primary,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Обновить данные из DTO
    pub fn update(&mut self, dto: &ConnectionDto) {
        if let Some(code) = &dto.code {
            self.base.code = code.clone();
        }
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.kind = dto.kind;
        self.base_url = non_empty(dto.base_url.clone());
        self.account_name = non_empty(dto.account_name.clone());
        self.environment = non_empty(dto.environment.clone());
        self.api_key = dto.api_key.clone();
        self.api_secret = non_empty(dto.api_secret.clone());
        self.is_primary = dto.is_primary;
    }

    /// Base URL API с учётом значений по умолчанию
    pub fn resolved_base_url(&self) -> String {
        if let Some(url) = self.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return url.trim().trim_end_matches('/').to_string();
        }
        match self.kind {
            IntegrationKind::Vtex => format!(
                "https://{}.{}.com.br",
                self.account_name.as_deref().unwrap_or_default().trim(),
                self.environment
                    .as_deref()
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or(DEFAULT_VTEX_ENVIRONMENT)
                    .trim()
            ),
            IntegrationKind::Anymarket => DEFAULT_ANYMARKET_BASE_URL.to_string(),
            IntegrationKind::Pixian => DEFAULT_PIXIAN_BASE_URL.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Описание не может быть пустым".into());
        }
        if self.api_key.trim().is_empty() {
            return Err("API ключ обязателен".into());
        }
        match self.kind {
            IntegrationKind::Vtex => {
                let has_account = self
                    .account_name
                    .as_deref()
                    .map(|a| !a.trim().is_empty())
                    .unwrap_or(false);
                if !has_account && self.base_url.is_none() {
                    return Err("Для VTEX нужно указать аккаунт или base URL".into());
                }
                if self.api_secret.is_none() {
                    return Err("Для VTEX обязателен AppToken".into());
                }
            }
            IntegrationKind::Pixian => {
                if self.api_secret.is_none() {
                    return Err("Для Pixian обязателен API Secret".into());
                }
            }
            IntegrationKind::Anymarket => {}
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }

    /// Маскирование API ключа для отображения
    pub fn masked_api_key(&self) -> String {
        mask_secret(&self.api_key)
    }

    /// Копия для ответов API: ключ и секрет замаскированы
    pub fn redacted(mut self) -> Self {
        self.api_key = self.masked_api_key();
        self.api_secret = self.api_secret.as_deref().map(mask_secret);
        self
    }
}

crate::impl_aggregate_root!(
    Connection,
    ConnectionId,
    "a001",
    "connection",
    "Подключение",
    "Подключения",
    Origin::Self_
);

/// Маскирование секрета: первые и последние 4 символа
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления подключения
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub comment: Option<String>,
    pub kind: IntegrationKind,
    #[serde(rename = "baseUrl", default)]
    pub base_url: Option<String>,
    #[serde(rename = "accountName", default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(rename = "apiKey")]
    pub api_key: String,
    #[serde(rename = "apiSecret", default)]
    pub api_secret: Option<String>,
    #[serde(rename = "isPrimary", default)]
    pub is_primary: bool,
}

/// Результат тестирования подключения
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionTestResult {
    pub success: bool,
    pub message: String,
    pub duration_ms: u64,
    pub tested_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vtex(account: Option<&str>, env: Option<&str>) -> Connection {
        Connection::new_for_insert(
            "VTEX-1".into(),
            "Loja".into(),
            IntegrationKind::Vtex,
            None,
            account.map(String::from),
            env.map(String::from),
            "vtexappkey-loja-ABC".into(),
            Some("token".into()),
            true,
        )
    }

    #[test]
    fn test_vtex_base_url() {
        assert_eq!(
            vtex(Some("minhaloja"), None).resolved_base_url(),
            "https://minhaloja.vtexcommercestable.com.br"
        );
        assert_eq!(
            vtex(Some("minhaloja"), Some("vtexcommercebeta")).resolved_base_url(),
            "https://minhaloja.vtexcommercebeta.com.br"
        );
    }

    #[test]
    fn test_explicit_base_url_wins() {
        let mut c = vtex(Some("minhaloja"), None);
        c.base_url = Some("http://localhost:8080/".into());
        assert_eq!(c.resolved_base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_validate_vtex_requires_account() {
        assert!(vtex(None, None).validate().is_err());
        assert!(vtex(Some("minhaloja"), None).validate().is_ok());
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("short"), "****");
        assert_eq!(mask_secret("abcd1234efgh"), "abcd...efgh");
    }
}
