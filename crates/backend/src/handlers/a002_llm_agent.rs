use axum::{
    extract::{Path, Query},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::check_id;
use crate::domain::a002_llm_agent;
use contracts::domain::a002_llm_agent::aggregate::LlmAgent;
use contracts::enums::AgentPurpose;
use contracts::shared::pagination::PaginatedResponse;

#[derive(Deserialize)]
pub struct LlmAgentListParams {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub sort_by: Option<String>,
    pub sort_desc: Option<bool>,
}

/// GET /api/a002-llm-agent
pub async fn list_all() -> Result<Json<Vec<LlmAgent>>, axum::http::StatusCode> {
    match a002_llm_agent::service::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /api/a002-llm-agent/list
pub async fn list_paginated(
    Query(params): Query<LlmAgentListParams>,
) -> Result<Json<PaginatedResponse<LlmAgent>>, axum::http::StatusCode> {
    let limit = params.limit.unwrap_or(100).clamp(10, 10000);
    let offset = params.offset.unwrap_or(0);
    let sort_by = params.sort_by.as_deref().unwrap_or("description");
    let sort_desc = params.sort_desc.unwrap_or(false);

    match a002_llm_agent::service::list_paginated(limit, offset, sort_by, sort_desc).await {
        Ok((items, total)) => Ok(Json(PaginatedResponse::new(items, total, limit, offset))),
        Err(e) => {
            tracing::error!("Failed to list LLM agents: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/a002-llm-agent/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<LlmAgent>, axum::http::StatusCode> {
    check_id(&id)?;
    match a002_llm_agent::service::get_by_id(&id).await {
        Ok(Some(v)) => Ok(Json(v.redacted())),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// DELETE /api/a002-llm-agent/:id
pub async fn delete(Path(id): Path<String>) -> Result<(), axum::http::StatusCode> {
    check_id(&id)?;
    match a002_llm_agent::service::delete(&id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/a002-llm-agent
pub async fn upsert(
    Json(dto): Json<a002_llm_agent::service::LlmAgentDto>,
) -> Result<Json<serde_json::Value>, axum::http::StatusCode> {
    if dto.id.is_some() {
        match a002_llm_agent::service::update(dto).await {
            Ok(_) => Ok(Json(json!({"success": true}))),
            Err(e) => {
                tracing::error!("Failed to update LLM agent: {}", e);
                Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    } else {
        match a002_llm_agent::service::create(dto).await {
            Ok(id) => Ok(Json(json!({"success": true, "id": id.to_string()}))),
            Err(e) => {
                tracing::error!("Failed to create LLM agent: {}", e);
                Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

/// GET /api/a002-llm-agent/primary/:purpose
pub async fn get_primary(
    Path(purpose): Path<String>,
) -> Result<Json<LlmAgent>, axum::http::StatusCode> {
    let purpose =
        AgentPurpose::from_str(&purpose).map_err(|_| axum::http::StatusCode::BAD_REQUEST)?;
    match a002_llm_agent::service::get_primary(purpose).await {
        Ok(Some(v)) => Ok(Json(v.redacted())),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/a002-llm-agent/:id/test
/// Тест подключения к LLM провайдеру
pub async fn test_connection(
    Path(id): Path<String>,
) -> Result<Json<a002_llm_agent::service::AgentTestResult>, axum::http::StatusCode> {
    check_id(&id)?;
    let agent = match a002_llm_agent::service::get_by_id(&id).await {
        Ok(Some(v)) => v,
        Ok(None) => return Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => return Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    };
    Ok(Json(a002_llm_agent::service::test_connection(&agent).await))
}
