use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Служебные поля записи каталога
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Запись скрыта из списков; повторный импорт из VTEX её восстанавливает
    pub is_deleted: bool,
    /// Для сгенерированного контента: отправлен в Anymarket
    pub is_posted: bool,
    /// Растёт на каждом сохранении, 0 у несохранённой записи
    pub version: i32,
}

impl EntityMetadata {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            is_deleted: false,
            is_posted: false,
            version: 0,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Снять пометку удаления (запись снова пришла из источника)
    pub fn restore(&mut self) {
        if self.is_deleted {
            self.is_deleted = false;
            self.touch();
        }
    }

    pub fn is_new(&self) -> bool {
        self.version == 0
    }
}

impl Default for EntityMetadata {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_clears_deleted_flag() {
        let mut meta = EntityMetadata::new();
        assert!(meta.is_new());
        meta.is_deleted = true;
        meta.restore();
        assert!(!meta.is_deleted);
    }
}
