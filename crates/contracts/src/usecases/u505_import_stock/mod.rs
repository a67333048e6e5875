pub mod request;
pub mod response;

pub use request::{StockImportRequest, StockSource};
pub use response::{StockImportReport, StockItemResult};

use crate::usecases::common::UseCaseMetadata;

pub struct ImportStock;

impl UseCaseMetadata for ImportStock {
    fn usecase_index() -> &'static str {
        "u505"
    }

    fn usecase_name() -> &'static str {
        "import_stock"
    }

    fn display_name() -> &'static str {
        "Импорт остатков"
    }

    fn description() -> &'static str {
        "Обновление остатков SKU из VTEX Logistics или CSV с отправкой в Anymarket"
    }
}
