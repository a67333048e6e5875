use axum::{
    extract::{Path, Query},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::{check_id, error_status};
use crate::domain::{a003_product, a004_sku, a006_generated_content};
use crate::shared::config;
use crate::usecases::{u502_analyze_images, u503_generate_content};
use contracts::domain::a003_product::aggregate::{
    Product, ProductDto, ProductListItemDto, SetAnymarketIdRequest,
};
use contracts::domain::a004_sku::aggregate::Sku;
use contracts::domain::a005_image_analysis::aggregate::ImageAnalysisResponse;
use contracts::domain::a006_generated_content::aggregate::GeneratedContent;
use contracts::shared::pagination::PaginatedResponse;
use contracts::usecases::u502_analyze_images::AnalyzeImagesRequest;
use contracts::usecases::u503_generate_content::GenerateRequest;

#[derive(Deserialize)]
pub struct ProductListParams {
    pub search: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub sort_by: Option<String>,
    pub sort_desc: Option<bool>,
}

/// GET /api/a003/product
pub async fn list_paginated(
    Query(params): Query<ProductListParams>,
) -> Result<Json<PaginatedResponse<ProductListItemDto>>, axum::http::StatusCode> {
    let limit = params.limit.unwrap_or(100).clamp(10, 10000);
    let offset = params.offset.unwrap_or(0);
    let sort_by = params.sort_by.as_deref().unwrap_or("description");
    let sort_desc = params.sort_desc.unwrap_or(false);
    let search = params.search.as_deref().filter(|s| !s.trim().is_empty());

    match a003_product::service::list_paginated(search, limit, offset, sort_by, sort_desc).await {
        Ok((items, total)) => {
            let items = items.iter().map(ProductListItemDto::from).collect();
            Ok(Json(PaginatedResponse::new(items, total, limit, offset)))
        }
        Err(e) => {
            tracing::error!("Failed to list products: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/a003/product/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Product>, axum::http::StatusCode> {
    check_id(&id)?;
    match a003_product::service::get_by_id(&id).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/a003/product
pub async fn upsert(
    Json(dto): Json<ProductDto>,
) -> Result<Json<serde_json::Value>, axum::http::StatusCode> {
    match a003_product::service::upsert(dto).await {
        Ok(id) => Ok(Json(json!({"id": id.to_string()}))),
        Err(e) => {
            tracing::error!("Failed to save product: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// DELETE /api/a003/product/:id
pub async fn delete(Path(id): Path<String>) -> Result<(), axum::http::StatusCode> {
    check_id(&id)?;
    match a003_product::service::delete(&id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /api/a003/product/:id/skus
pub async fn list_skus(Path(id): Path<String>) -> Result<Json<Vec<Sku>>, axum::http::StatusCode> {
    check_id(&id)?;
    match a004_sku::service::list_by_product(&id).await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list SKUs of product {}: {}", id, e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/a003/product/:id/anymarket-id
pub async fn set_anymarket_id(
    Path(id): Path<String>,
    Json(req): Json<SetAnymarketIdRequest>,
) -> Result<(), axum::http::StatusCode> {
    check_id(&id)?;
    match a003_product::service::set_anymarket_id(&id, req.anymarket_id.as_deref()).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to set Anymarket id of {}: {}", id, e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/a003/product/:id/analyze-images
pub async fn analyze_images(
    Path(id): Path<String>,
    Json(req): Json<AnalyzeImagesRequest>,
) -> Result<Json<ImageAnalysisResponse>, axum::http::StatusCode> {
    check_id(&id)?;
    match u502_analyze_images::analyze_product_images(
        &id,
        req.agent_id.as_deref(),
        req.force_new_analysis,
        config::get().batch.max_images,
    )
    .await
    {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Image analysis of {} failed: {}", id, e);
            Err(error_status(&e))
        }
    }
}

/// POST /api/a003/product/:id/generate
pub async fn generate(
    Path(id): Path<String>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GeneratedContent>, axum::http::StatusCode> {
    check_id(&id)?;
    match u503_generate_content::generate_for_product(
        &id,
        req.kind,
        req.agent_id.as_deref(),
        config::get().batch.title_max_len,
    )
    .await
    {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Content generation for {} failed: {}", id, e);
            Err(error_status(&e))
        }
    }
}

/// GET /api/a003/product/:id/content
pub async fn list_content(
    Path(id): Path<String>,
) -> Result<Json<Vec<GeneratedContent>>, axum::http::StatusCode> {
    check_id(&id)?;
    match a006_generated_content::service::list_by_product(&id).await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
