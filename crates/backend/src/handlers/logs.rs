use axum::{extract::Query, http::StatusCode, Json};
use contracts::shared::logger::{CreateLogRequest, LogEntry, LogQuery};

use crate::shared::logger::repository;

/// GET /api/logs?limit=&category=
pub async fn list_recent(Query(query): Query<LogQuery>) -> Result<Json<Vec<LogEntry>>, StatusCode> {
    repository::get_recent_logs(&query).await.map(Json).map_err(|e| {
        tracing::error!("Failed to read system_log: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// POST /api/logs
pub async fn create(Json(req): Json<CreateLogRequest>) -> StatusCode {
    if req.category.trim().is_empty() {
        return StatusCode::BAD_REQUEST;
    }
    match repository::log_event(&req.source, &req.category, &req.message).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::error!("Failed to write system_log: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// DELETE /api/logs
pub async fn clear_all() -> StatusCode {
    match repository::clear_all_logs().await {
        Ok(_) => {
            tracing::info!("system_log cleared");
            StatusCode::OK
        }
        Err(e) => {
            tracing::error!("Failed to clear system_log: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
