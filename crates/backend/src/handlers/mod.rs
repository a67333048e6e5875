// Aggregate handlers (a001-a006)
pub mod a001_connection;
pub mod a002_llm_agent;
pub mod a003_product;
pub mod a004_sku;
pub mod a005_image_analysis;
pub mod a006_generated_content;

// System log
pub mod logs;

// UseCase handlers
pub mod usecases;

use axum::http::StatusCode;

use crate::shared::integrations::IntegrationError;
use crate::usecases::common::OperationError;

/// ID в пути должен быть UUID
pub(crate) fn check_id(id: &str) -> Result<(), StatusCode> {
    uuid::Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| StatusCode::BAD_REQUEST)
}

/// HTTP статус для ошибки операции
pub(crate) fn error_status(e: &anyhow::Error) -> StatusCode {
    if let Some(op) = e.downcast_ref::<OperationError>() {
        return match op {
            OperationError::ProductNotFound(_) => StatusCode::NOT_FOUND,
            OperationError::NoImages | OperationError::Invalid(_) => StatusCode::BAD_REQUEST,
        };
    }
    match e.downcast_ref::<IntegrationError>() {
        Some(IntegrationError::MissingConnection(_)) | Some(IntegrationError::Config(_)) => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status() {
        let not_found = anyhow::Error::from(OperationError::ProductNotFound("x".into()));
        assert_eq!(error_status(&not_found), StatusCode::NOT_FOUND);

        let no_images = anyhow::Error::from(OperationError::NoImages);
        assert_eq!(error_status(&no_images), StatusCode::BAD_REQUEST);

        let missing = anyhow::Error::from(IntegrationError::MissingConnection("Anymarket"));
        assert_eq!(error_status(&missing), StatusCode::BAD_REQUEST);

        let other = anyhow::anyhow!("database is locked");
        assert_eq!(error_status(&other), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_check_id() {
        assert!(check_id("not-a-uuid").is_err());
        assert!(check_id(&uuid::Uuid::new_v4().to_string()).is_ok());
    }
}
