pub mod request;

pub use request::PublishRequest;

use crate::usecases::common::UseCaseMetadata;

pub struct PublishToAnymarket;

impl UseCaseMetadata for PublishToAnymarket {
    fn usecase_index() -> &'static str {
        "u504"
    }

    fn usecase_name() -> &'static str {
        "publish_anymarket"
    }

    fn display_name() -> &'static str {
        "Публикация в Anymarket"
    }

    fn description() -> &'static str {
        "Отправка одобренных названий, описаний и изображений в Anymarket"
    }
}
