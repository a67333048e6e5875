use super::db::{build_sqlite_url, ensure_column};
use sea_orm::DatabaseConnection;
use sqlx::sqlite::SqlitePool;
use std::path::{Path, PathBuf};

/// Колонки, появившиеся после первой версии схемы: (таблица, колонка, определение)
const LATE_COLUMNS: &[(&str, &str, &str)] = &[
    ("a003_product", "anymarket_id", "TEXT"),
    ("a003_product", "last_sync_at", "TEXT"),
    ("a004_sku", "stock_quantity", "INTEGER"),
    ("a004_sku", "stock_updated_at", "TEXT"),
    ("a002_llm_agent", "purpose", "TEXT NOT NULL DEFAULT 'general'"),
    ("a002_llm_agent", "prompt_template", "TEXT NOT NULL DEFAULT ''"),
];

fn candidate_migrations_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.join("migrations"));
        }
    }

    dirs.push(PathBuf::from("migrations"));
    dirs.push(PathBuf::from("../../migrations"));
    dirs.push(PathBuf::from("../../../migrations"));

    dirs
}

async fn has_table(pool: &SqlitePool, table_name: &str) -> anyhow::Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(1) FROM sqlite_master WHERE type='table' AND name = ?1",
    )
    .bind(table_name)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Применить SQL-миграции из каталога migrations
pub async fn run_migrations(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db_url = build_sqlite_url(db_path);
    let pool = SqlitePool::connect(&db_url).await?;

    let has_migrations_table = has_table(&pool, "_sqlx_migrations").await?;
    let has_core_table = has_table(&pool, "a003_product").await?;
    if !has_migrations_table && has_core_table {
        tracing::info!(
            "Legacy database detected (business tables exist, _sqlx_migrations absent). Running baseline migration in idempotent mode."
        );
    }

    let migrations_dir = candidate_migrations_dirs()
        .into_iter()
        .find(|p| p.exists() && p.is_dir())
        .ok_or_else(|| anyhow::anyhow!("migrations directory not found"))?;

    tracing::info!("Using migrations directory: {}", migrations_dir.display());

    let migrator = sqlx::migrate::Migrator::new(migrations_dir.as_path()).await?;
    migrator.run(&pool).await?;
    pool.close().await;

    tracing::info!("Database migrations applied successfully");
    Ok(())
}

/// Дотянуть старые таблицы до текущей схемы
pub async fn ensure_late_columns(conn: &DatabaseConnection) -> anyhow::Result<()> {
    let mut added = 0;
    for (table, column, definition) in LATE_COLUMNS {
        if ensure_column(conn, table, column, definition).await? {
            added += 1;
        }
    }
    if added > 0 {
        tracing::info!("Added {} missing columns to legacy tables", added);
    }
    Ok(())
}
