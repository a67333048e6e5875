use super::{EntityMetadata, EventStore, Origin};

/// Трейт для корня агрегата
///
/// Определяет обязательные методы и метаданные для всех агрегатов системы
pub trait AggregateRoot {
    /// Тип идентификатора агрегата
    type Id;

    // ============================================================================
    // Методы экземпляра (данные конкретной записи)
    // ============================================================================

    /// Получить ID записи
    fn id(&self) -> Self::Id;

    /// Получить бизнес-код записи (например, VTEX product id)
    fn code(&self) -> &str;

    /// Получить описание/название записи
    fn description(&self) -> &str;

    /// Получить метаданные жизненного цикла
    fn metadata(&self) -> &EntityMetadata;

    /// Получить изменяемые метаданные
    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    /// Получить хранилище событий
    fn events(&self) -> &EventStore;

    /// Получить изменяемое хранилище событий
    fn events_mut(&mut self) -> &mut EventStore;

    // ============================================================================
    // Метаданные класса агрегата (статические данные)
    // ============================================================================

    /// Индекс агрегата в системе (например, "a003")
    fn aggregate_index() -> &'static str;

    /// Имя коллекции для БД (например, "product")
    fn collection_name() -> &'static str;

    /// Имя элемента для UI (единственное число)
    fn element_name() -> &'static str;

    /// Имя списка для UI (множественное число)
    fn list_name() -> &'static str;

    /// Источник данных агрегата
    fn origin() -> Origin;

    // ============================================================================
    // Методы с реализацией по умолчанию
    // ============================================================================

    /// Полное имя агрегата, совпадает с именем таблицы (например, "a003_product")
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }
}

/// Реализация AggregateRoot для агрегатов с полем `base: BaseAggregate<Id>`
#[macro_export]
macro_rules! impl_aggregate_root {
    ($ty:ty, $id:ty, $index:literal, $collection:literal, $element:literal, $list:literal, $origin:expr) => {
        impl $crate::domain::common::AggregateRoot for $ty {
            type Id = $id;

            fn id(&self) -> Self::Id {
                self.base.id
            }

            fn code(&self) -> &str {
                &self.base.code
            }

            fn description(&self) -> &str {
                &self.base.description
            }

            fn metadata(&self) -> &$crate::domain::common::EntityMetadata {
                &self.base.metadata
            }

            fn metadata_mut(&mut self) -> &mut $crate::domain::common::EntityMetadata {
                &mut self.base.metadata
            }

            fn events(&self) -> &$crate::domain::common::EventStore {
                &self.base.events
            }

            fn events_mut(&mut self) -> &mut $crate::domain::common::EventStore {
                &mut self.base.events
            }

            fn aggregate_index() -> &'static str {
                $index
            }

            fn collection_name() -> &'static str {
                $collection
            }

            fn element_name() -> &'static str {
                $element
            }

            fn list_name() -> &'static str {
                $list
            }

            fn origin() -> $crate::domain::common::Origin {
                $origin
            }
        }
    };
}
