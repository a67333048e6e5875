/// Идентификация сценария: индекс, техническое имя и подпись для журналов
pub trait UseCaseMetadata {
    /// Индекс вида "u502"
    fn usecase_index() -> &'static str;

    /// Техническое имя, например "analyze_images"
    fn usecase_name() -> &'static str;

    /// Подпись для журнала и UI ("Анализ изображений товаров")
    fn display_name() -> &'static str;

    fn description() -> &'static str {
        ""
    }

    /// Категория журнала: "u502_analyze_images"
    fn full_name() -> String {
        format!("{}_{}", Self::usecase_index(), Self::usecase_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SyncPrices;

    impl UseCaseMetadata for SyncPrices {
        fn usecase_index() -> &'static str {
            "u999"
        }
        fn usecase_name() -> &'static str {
            "sync_prices"
        }
        fn display_name() -> &'static str {
            "Синхронизация цен"
        }
    }

    #[test]
    fn full_name_joins_index_and_name() {
        assert_eq!(SyncPrices::full_name(), "u999_sync_prices");
        assert_eq!(SyncPrices::description(), "");
    }
}
