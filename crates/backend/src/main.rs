#![allow(clippy::too_many_arguments)]

pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;
pub mod usecases;

use axum::http::{header, Method};
use axum::middleware;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use shared::config;
use shared::data::{db, migration_runner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_file = system::tracing::initialize()?;
    tracing::info!("Logging to {}", log_file.display());

    let cfg = config::init()?;
    let db_path = config::get_database_path(cfg)?;

    migration_runner::run_migrations(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("migrations failed: {e}"))?;

    db::initialize_database(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;
    migration_runner::ensure_late_columns(db::get_connection()).await?;

    let media_dir = config::get_media_dir(cfg);
    std::fs::create_dir_all(&media_dir)?;
    tracing::info!("Serving media from {}", media_dir.display());

    shared::logger::log("startup", "Backend started");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::configure_routes()
        .nest_service("/media", ServeDir::new(media_dir))
        .layer(middleware::from_fn(system::middleware::request_logger))
        .layer(cors);

    let port = cfg.server.port;
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
