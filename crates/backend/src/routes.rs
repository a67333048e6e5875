use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // AGGREGATES
        // ========================================
        // A001 Connection handlers
        .route(
            "/api/a001-connection",
            get(handlers::a001_connection::list_all).post(handlers::a001_connection::upsert),
        )
        .route(
            "/api/a001-connection/test",
            post(handlers::a001_connection::test_connection),
        )
        .route(
            "/api/a001-connection/:id",
            get(handlers::a001_connection::get_by_id).delete(handlers::a001_connection::delete),
        )
        // A002 LLM Agent handlers
        .route(
            "/api/a002-llm-agent",
            get(handlers::a002_llm_agent::list_all).post(handlers::a002_llm_agent::upsert),
        )
        .route(
            "/api/a002-llm-agent/list",
            get(handlers::a002_llm_agent::list_paginated),
        )
        .route(
            "/api/a002-llm-agent/primary/:purpose",
            get(handlers::a002_llm_agent::get_primary),
        )
        .route(
            "/api/a002-llm-agent/:id",
            get(handlers::a002_llm_agent::get_by_id).delete(handlers::a002_llm_agent::delete),
        )
        .route(
            "/api/a002-llm-agent/:id/test",
            post(handlers::a002_llm_agent::test_connection),
        )
        // A003 Product handlers
        .route(
            "/api/a003/product",
            get(handlers::a003_product::list_paginated).post(handlers::a003_product::upsert),
        )
        .route(
            "/api/a003/product/:id",
            get(handlers::a003_product::get_by_id).delete(handlers::a003_product::delete),
        )
        .route(
            "/api/a003/product/:id/skus",
            get(handlers::a003_product::list_skus),
        )
        .route(
            "/api/a003/product/:id/anymarket-id",
            post(handlers::a003_product::set_anymarket_id),
        )
        .route(
            "/api/a003/product/:id/analyze-images",
            post(handlers::a003_product::analyze_images),
        )
        .route(
            "/api/a003/product/:id/generate",
            post(handlers::a003_product::generate),
        )
        .route(
            "/api/a003/product/:id/content",
            get(handlers::a003_product::list_content),
        )
        // A004 SKU handlers
        .route(
            "/api/a004/sku/:id",
            get(handlers::a004_sku::get_by_id).delete(handlers::a004_sku::delete),
        )
        // A005 Image Analysis handlers
        .route(
            "/api/a005/image-analysis",
            get(handlers::a005_image_analysis::list),
        )
        .route(
            "/api/a005/image-analysis/:id",
            get(handlers::a005_image_analysis::get_by_id)
                .delete(handlers::a005_image_analysis::delete),
        )
        // A006 Generated Content handlers
        .route(
            "/api/a006/generated-content/:id",
            get(handlers::a006_generated_content::get_by_id)
                .delete(handlers::a006_generated_content::delete),
        )
        .route(
            "/api/a006/generated-content/:id/approve",
            post(handlers::a006_generated_content::approve),
        )
        .route(
            "/api/a006/generated-content/:id/reject",
            post(handlers::a006_generated_content::reject),
        )
        // ========================================
        // USECASES
        // ========================================
        .route("/api/u501/import", post(handlers::usecases::u501_import))
        .route(
            "/api/u502/analyze-images-batch",
            post(handlers::usecases::u502_analyze_images_batch),
        )
        .route(
            "/api/u503/generate-batch",
            post(handlers::usecases::u503_generate_batch),
        )
        .route("/api/u504/publish", post(handlers::usecases::u504_publish))
        .route(
            "/api/u505/stock/import",
            post(handlers::usecases::u505_import_stock),
        )
        .route(
            "/api/u505/stock/import-csv",
            post(handlers::usecases::u505_import_stock_csv),
        )
        // ========================================
        // UTILITIES
        // ========================================
        .route(
            "/api/logs",
            get(handlers::logs::list_recent)
                .post(handlers::logs::create)
                .delete(handlers::logs::clear_all),
        )
}
