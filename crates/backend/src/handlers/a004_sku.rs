use axum::{extract::Path, Json};

use super::check_id;
use crate::domain::a004_sku;
use contracts::domain::a004_sku::aggregate::Sku;

/// GET /api/a004/sku/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Sku>, axum::http::StatusCode> {
    check_id(&id)?;
    match a004_sku::service::get_by_id(&id).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// DELETE /api/a004/sku/:id
pub async fn delete(Path(id): Path<String>) -> Result<(), axum::http::StatusCode> {
    check_id(&id)?;
    match a004_sku::service::delete(&id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
