use axum::{extract::Path, Json};

use super::check_id;
use crate::domain::a006_generated_content;
use contracts::domain::a006_generated_content::aggregate::GeneratedContent;

/// GET /api/a006/generated-content/:id
pub async fn get_by_id(
    Path(id): Path<String>,
) -> Result<Json<GeneratedContent>, axum::http::StatusCode> {
    check_id(&id)?;
    match a006_generated_content::service::get_by_id(&id).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/a006/generated-content/:id/approve
pub async fn approve(
    Path(id): Path<String>,
) -> Result<Json<GeneratedContent>, axum::http::StatusCode> {
    check_id(&id)?;
    transition_response(&id, a006_generated_content::service::approve(&id).await)
}

/// POST /api/a006/generated-content/:id/reject
pub async fn reject(
    Path(id): Path<String>,
) -> Result<Json<GeneratedContent>, axum::http::StatusCode> {
    check_id(&id)?;
    transition_response(&id, a006_generated_content::service::reject(&id).await)
}

/// DELETE /api/a006/generated-content/:id
pub async fn delete(Path(id): Path<String>) -> Result<(), axum::http::StatusCode> {
    check_id(&id)?;
    match a006_generated_content::service::delete(&id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// Недопустимый переход статуса отдаётся как 409
fn transition_response(
    id: &str,
    result: anyhow::Result<Option<Result<GeneratedContent, String>>>,
) -> Result<Json<GeneratedContent>, axum::http::StatusCode> {
    match result {
        Ok(Some(Ok(v))) => Ok(Json(v)),
        Ok(Some(Err(reason))) => {
            tracing::warn!("Status change of {} rejected: {}", id, reason);
            Err(axum::http::StatusCode::CONFLICT)
        }
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to change status of {}: {}", id, e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
