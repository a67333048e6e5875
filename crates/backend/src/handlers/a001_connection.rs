use axum::{extract::Path, Json};
use serde_json::json;

use super::check_id;
use crate::domain::a001_connection;
use contracts::domain::a001_connection::aggregate::{
    Connection, ConnectionDto, ConnectionTestResult,
};

/// GET /api/a001-connection
pub async fn list_all() -> Result<Json<Vec<Connection>>, axum::http::StatusCode> {
    match a001_connection::service::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list connections: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/a001-connection/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Connection>, axum::http::StatusCode> {
    check_id(&id)?;
    match a001_connection::service::get_by_id(&id).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/a001-connection
pub async fn upsert(
    Json(dto): Json<ConnectionDto>,
) -> Result<Json<serde_json::Value>, axum::http::StatusCode> {
    let result = if dto.id.is_some() {
        a001_connection::service::update(dto)
            .await
            .map(|_| json!({"success": true}))
    } else {
        a001_connection::service::create(dto)
            .await
            .map(|id| json!({"success": true, "id": id.to_string()}))
    };
    match result {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to save connection: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// DELETE /api/a001-connection/:id
pub async fn delete(Path(id): Path<String>) -> Result<(), axum::http::StatusCode> {
    check_id(&id)?;
    match a001_connection::service::delete(&id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/a001-connection/test
/// Проверка подключения по данным формы
pub async fn test_connection(Json(dto): Json<ConnectionDto>) -> Json<ConnectionTestResult> {
    Json(a001_connection::service::test_connection(dto).await)
}
