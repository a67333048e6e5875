use serde::{Deserialize, Serialize};

/// Внешние сервисы, с которыми работает back-office
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationKind {
    /// Каталог магазина VTEX
    Vtex,
    /// Хаб маркетплейсов Anymarket
    Anymarket,
    /// Удаление фона Pixian.ai
    Pixian,
}

impl IntegrationKind {
    /// Код для хранения в БД
    pub fn code(&self) -> &'static str {
        match self {
            IntegrationKind::Vtex => "vtex",
            IntegrationKind::Anymarket => "anymarket",
            IntegrationKind::Pixian => "pixian",
        }
    }

    /// Человекочитаемое название
    pub fn display_name(&self) -> &'static str {
        match self {
            IntegrationKind::Vtex => "VTEX",
            IntegrationKind::Anymarket => "Anymarket",
            IntegrationKind::Pixian => "Pixian.ai",
        }
    }

    pub fn all() -> Vec<IntegrationKind> {
        vec![
            IntegrationKind::Vtex,
            IntegrationKind::Anymarket,
            IntegrationKind::Pixian,
        ]
    }

    /// Парсинг из строки (регистр не важен)
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "vtex" => Some(IntegrationKind::Vtex),
            "anymarket" => Some(IntegrationKind::Anymarket),
            "pixian" | "pixian.ai" => Some(IntegrationKind::Pixian),
            _ => None,
        }
    }
}

impl std::fmt::Display for IntegrationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        for kind in IntegrationKind::all() {
            assert_eq!(IntegrationKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(IntegrationKind::from_code(" VTEX "), Some(IntegrationKind::Vtex));
        assert_eq!(IntegrationKind::from_code("Pixian.ai"), Some(IntegrationKind::Pixian));
        assert_eq!(IntegrationKind::from_code("ozon"), None);
    }
}
