use serde::{Deserialize, Serialize};

/// Хранилище доменных событий агрегата
///
/// События не персистятся: это журнал изменений в пределах одной операции
/// (например, "primary снят", "контент опубликован"), который сервис
/// выводит в system_log после записи.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EventStore {
    #[serde(skip)]
    pending: Vec<String>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Зарегистрировать событие
    pub fn record(&mut self, event: impl Into<String>) {
        self.pending.push(event.into());
    }

    /// Забрать накопленные события (хранилище очищается)
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_store() {
        let mut store = EventStore::new();
        store.record("a");
        store.record("b");
        assert_eq!(store.drain(), vec!["a".to_string(), "b".to_string()]);
        assert!(store.is_empty());
    }
}
