pub mod request;
pub mod response;

pub use request::ImportRequest;
pub use response::ImportReport;

use crate::usecases::common::UseCaseMetadata;

pub struct ImportFromVtex;

impl UseCaseMetadata for ImportFromVtex {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "import_from_vtex"
    }

    fn display_name() -> &'static str {
        "Импорт каталога из VTEX"
    }

    fn description() -> &'static str {
        "Загрузка товаров и SKU из VTEX Catalog API"
    }
}
