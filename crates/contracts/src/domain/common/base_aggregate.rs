use super::{EntityMetadata, EventStore};
use serde::{Deserialize, Serialize};

/// Общая часть всех записей каталога
///
/// `code` хранит внешний ключ записи: VTEX id товара или SKU, код агента,
/// код черновика. `description` хранит отображаемое имя.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseAggregate<Id> {
    pub id: Id,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub metadata: EntityMetadata,
    /// Изменения статуса, ещё не записанные в system_log
    #[serde(skip)]
    pub events: EventStore,
}

impl<Id> BaseAggregate<Id> {
    pub fn new(id: Id, code: String, description: String) -> Self {
        Self::with_metadata(id, code, description, None, EntityMetadata::new())
    }

    /// Сборка из строки БД
    pub fn with_metadata(
        id: Id,
        code: String,
        description: String,
        comment: Option<String>,
        metadata: EntityMetadata,
    ) -> Self {
        Self {
            id,
            code,
            description,
            comment,
            metadata,
            events: EventStore::new(),
        }
    }

    pub fn touch(&mut self) {
        self.metadata.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_unsaved_and_has_no_events() {
        let base = BaseAggregate::new(1u32, "1001".into(), "Кроссовки".into());
        assert!(base.metadata.is_new());
        assert!(base.comment.is_none());
        assert!(base.events.is_empty());
    }
}
