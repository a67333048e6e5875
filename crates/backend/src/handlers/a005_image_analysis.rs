use axum::{
    extract::{Path, Query},
    Json,
};
use serde::Deserialize;

use super::check_id;
use crate::domain::a005_image_analysis;
use contracts::domain::a005_image_analysis::aggregate::ImageAnalysis;

#[derive(Deserialize)]
pub struct ImageAnalysisListParams {
    pub product_id: Option<String>,
}

/// GET /api/a005/image-analysis
pub async fn list(
    Query(params): Query<ImageAnalysisListParams>,
) -> Result<Json<Vec<ImageAnalysis>>, axum::http::StatusCode> {
    let product_id = params.product_id.as_deref().filter(|s| !s.is_empty());
    if let Some(id) = product_id {
        check_id(id)?;
    }
    match a005_image_analysis::service::list(product_id).await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list image analyses: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/a005/image-analysis/:id
pub async fn get_by_id(
    Path(id): Path<String>,
) -> Result<Json<ImageAnalysis>, axum::http::StatusCode> {
    check_id(&id)?;
    match a005_image_analysis::service::get_by_id(&id).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// DELETE /api/a005/image-analysis/:id
pub async fn delete(Path(id): Path<String>) -> Result<(), axum::http::StatusCode> {
    check_id(&id)?;
    match a005_image_analysis::service::delete(&id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
