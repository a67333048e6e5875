use axum::{extract::Multipart, Json};
use once_cell::sync::Lazy;

use super::error_status;
use crate::usecases::{
    u501_import_from_vtex, u502_analyze_images, u503_generate_content, u504_publish_anymarket,
    u505_import_stock,
};
use contracts::usecases::common::BatchReport;

// ============================================================================
// UseCase u501: Import from VTEX
// ============================================================================

static IMPORT_EXECUTOR: Lazy<u501_import_from_vtex::ImportExecutor> =
    Lazy::new(u501_import_from_vtex::ImportExecutor::from_config);

/// POST /api/u501/import
pub async fn u501_import(
    Json(request): Json<contracts::usecases::u501_import_from_vtex::ImportRequest>,
) -> Result<Json<contracts::usecases::u501_import_from_vtex::ImportReport>, axum::http::StatusCode>
{
    match IMPORT_EXECUTOR.execute(&request).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::error!("VTEX import failed: {}", e);
            Err(error_status(&e))
        }
    }
}

// ============================================================================
// UseCase u502: Analyze images
// ============================================================================

static ANALYZE_EXECUTOR: Lazy<
    u502_analyze_images::AnalyzeImagesExecutor<u502_analyze_images::CatalogImageAnalyzer>,
> = Lazy::new(u502_analyze_images::AnalyzeImagesExecutor::from_config);

/// POST /api/u502/analyze-images-batch
pub async fn u502_analyze_images_batch(
    Json(request): Json<contracts::usecases::u502_analyze_images::AnalyzeImagesBatchRequest>,
) -> Json<BatchReport> {
    Json(ANALYZE_EXECUTOR.execute(&request).await)
}

// ============================================================================
// UseCase u503: Generate content
// ============================================================================

static GENERATE_EXECUTOR: Lazy<u503_generate_content::GenerateBatchExecutor> =
    Lazy::new(u503_generate_content::GenerateBatchExecutor::from_config);

/// POST /api/u503/generate-batch
pub async fn u503_generate_batch(
    Json(request): Json<contracts::usecases::u503_generate_content::GenerateBatchRequest>,
) -> Json<BatchReport> {
    Json(GENERATE_EXECUTOR.execute(&request).await)
}

// ============================================================================
// UseCase u504: Publish to Anymarket
// ============================================================================

static PUBLISH_EXECUTOR: Lazy<u504_publish_anymarket::PublishExecutor> =
    Lazy::new(u504_publish_anymarket::PublishExecutor::from_config);

/// POST /api/u504/publish
pub async fn u504_publish(
    Json(request): Json<contracts::usecases::u504_publish_anymarket::PublishRequest>,
) -> Result<Json<BatchReport>, axum::http::StatusCode> {
    match PUBLISH_EXECUTOR.execute(&request).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::error!("Anymarket publish failed: {}", e);
            Err(error_status(&e))
        }
    }
}

// ============================================================================
// UseCase u505: Import stock
// ============================================================================

static STOCK_EXECUTOR: Lazy<u505_import_stock::StockImportExecutor> =
    Lazy::new(u505_import_stock::StockImportExecutor::from_config);

/// POST /api/u505/stock/import
pub async fn u505_import_stock(
    Json(request): Json<contracts::usecases::u505_import_stock::StockImportRequest>,
) -> Result<Json<contracts::usecases::u505_import_stock::StockImportReport>, axum::http::StatusCode>
{
    match STOCK_EXECUTOR.import_from_vtex(&request).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::error!("Stock import from VTEX failed: {}", e);
            Err(error_status(&e))
        }
    }
}

/// POST /api/u505/stock/import-csv
/// multipart: `file` (CSV) и необязательное `pushToAnymarket` = "true"
pub async fn u505_import_stock_csv(
    mut multipart: Multipart,
) -> Result<Json<contracts::usecases::u505_import_stock::StockImportReport>, axum::http::StatusCode>
{
    let mut file: Option<Vec<u8>> = None;
    let mut push_to_anymarket = false;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Multipart error: {}", e);
        axum::http::StatusCode::BAD_REQUEST
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| axum::http::StatusCode::BAD_REQUEST)?;
                file = Some(bytes.to_vec());
            }
            "pushToAnymarket" => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| axum::http::StatusCode::BAD_REQUEST)?;
                push_to_anymarket = value.trim().eq_ignore_ascii_case("true");
            }
            _ => {}
        }
    }

    let file = file.ok_or(axum::http::StatusCode::BAD_REQUEST)?;
    match STOCK_EXECUTOR.import_from_csv(&file, push_to_anymarket).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::error!("Stock import from CSV failed: {}", e);
            Err(error_status(&e))
        }
    }
}
