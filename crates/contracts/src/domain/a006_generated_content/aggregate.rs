use crate::domain::common::{AggregateId, BaseAggregate, Origin};
use serde::{Deserialize, Serialize};

crate::uuid_aggregate_id!(GeneratedContentId, "ID сгенерированного контента");

/// Что сгенерировано
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Title,
    Description,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Title => "title",
            ContentKind::Description => "description",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "title" => Ok(ContentKind::Title),
            "description" => Ok(ContentKind::Description),
            _ => Err(format!("Unknown content kind: {}", s)),
        }
    }

    /// Назначение агента, который по умолчанию генерирует этот вид контента
    pub fn agent_purpose(&self) -> crate::enums::AgentPurpose {
        match self {
            ContentKind::Title => crate::enums::AgentPurpose::Title,
            ContentKind::Description => crate::enums::AgentPurpose::Description,
        }
    }
}

/// Статус контента: draft → approved → published, rejected из draft/approved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Draft,
    Approved,
    Published,
    Rejected,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Approved => "approved",
            ContentStatus::Published => "published",
            ContentStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "draft" => Ok(ContentStatus::Draft),
            "approved" => Ok(ContentStatus::Approved),
            "published" => Ok(ContentStatus::Published),
            "rejected" => Ok(ContentStatus::Rejected),
            _ => Err(format!("Unknown content status: {}", s)),
        }
    }

    pub fn can_transition_to(&self, next: ContentStatus) -> bool {
        matches!(
            (self, next),
            (ContentStatus::Draft, ContentStatus::Approved)
                | (ContentStatus::Approved, ContentStatus::Published)
                | (ContentStatus::Draft, ContentStatus::Rejected)
                | (ContentStatus::Approved, ContentStatus::Rejected)
        )
    }
}

/// Контент (title/description), сгенерированный LLM для товара
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContent {
    #[serde(flatten)]
    pub base: BaseAggregate<GeneratedContentId>,

    #[serde(rename = "productRef")]
    pub product_ref: String,

    #[serde(rename = "agentRef")]
    pub agent_ref: String,

    pub kind: ContentKind,

    pub status: ContentStatus,

    /// Итоговый текст после постобработки
    pub content: String,

    #[serde(rename = "modelName")]
    pub model_name: String,

    #[serde(rename = "tokensUsed")]
    pub tokens_used: Option<i32>,

    #[serde(rename = "publishedAt")]
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl GeneratedContent {
    pub fn new_draft(
        product_ref: String,
        product_name: String,
        agent_ref: String,
        kind: ContentKind,
        content: String,
        model_name: String,
        tokens_used: Option<i32>,
    ) -> Self {
        let id = GeneratedContentId::new_v4();
        let code = format!("{}-{}", kind.as_str().to_uppercase(), &id.as_string()[..8]);
        Self {
            base: BaseAggregate::new(id, code, product_name),
            product_ref,
            agent_ref,
            kind,
            status: ContentStatus::Draft,
            content,
            model_name,
            tokens_used,
            published_at: None,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    fn transition(&mut self, next: ContentStatus) -> Result<(), String> {
        if !self.status.can_transition_to(next) {
            return Err(format!(
                "Переход {} → {} недопустим",
                self.status.as_str(),
                next.as_str()
            ));
        }
        self.status = next;
        self.base.events.record(format!("status:{}", next.as_str()));
        Ok(())
    }

    pub fn approve(&mut self) -> Result<(), String> {
        self.transition(ContentStatus::Approved)
    }

    pub fn reject(&mut self) -> Result<(), String> {
        self.transition(ContentStatus::Rejected)
    }

    pub fn mark_published(&mut self) -> Result<(), String> {
        self.transition(ContentStatus::Published)?;
        self.published_at = Some(chrono::Utc::now());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.product_ref.trim().is_empty() {
            return Err("Ссылка на товар не может быть пустой".into());
        }
        if self.content.trim().is_empty() {
            return Err("Контент не может быть пустым".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

crate::impl_aggregate_root!(
    GeneratedContent,
    GeneratedContentId,
    "a006",
    "generated_content",
    "Сгенерированный контент",
    "Сгенерированный контент",
    Origin::Llm
);

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> GeneratedContent {
        GeneratedContent::new_draft(
            "p".into(),
            "Tênis".into(),
            "a".into(),
            ContentKind::Title,
            "Tênis de Corrida Azul".into(),
            "gpt-4o".into(),
            None,
        )
    }

    #[test]
    fn test_happy_path_to_published() {
        let mut c = draft();
        assert!(c.base.code.starts_with("TITLE-"));
        assert!(c.mark_published().is_err());
        c.approve().unwrap();
        c.mark_published().unwrap();
        assert_eq!(c.status, ContentStatus::Published);
        assert!(c.published_at.is_some());
        assert!(c.reject().is_err());
    }

    #[test]
    fn test_reject_from_draft_and_approved() {
        let mut c = draft();
        c.reject().unwrap();
        assert!(c.approve().is_err());

        let mut c = draft();
        c.approve().unwrap();
        c.reject().unwrap();
        assert_eq!(c.status, ContentStatus::Rejected);
    }
}
