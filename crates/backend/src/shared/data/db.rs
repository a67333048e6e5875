use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// SQLite URL для sea-orm/sqlx (с учётом путей Windows)
pub fn build_sqlite_url(path: &Path) -> String {
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

/// Подключиться к БД по пути из конфига; схему создают миграции
pub async fn initialize_database(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_path.is_absolute() {
        db_path.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_path)
    };
    let db_url = build_sqlite_url(&absolute_path);
    tracing::info!("Connecting to database: {}", db_url);

    let conn = Database::connect(&db_url).await?;
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        "PRAGMA foreign_keys = ON;".to_string(),
    ))
    .await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    try_get_connection().expect("Database connection has not been initialized")
}

/// Соединение, если БД уже подключена
pub fn try_get_connection() -> Option<&'static DatabaseConnection> {
    thread_connection().or_else(|| DB_CONN.get())
}

// Тесты подключают свою БД на поток: #[tokio::test] крутит future в текущем потоке
#[cfg(test)]
thread_local! {
    static TEST_CONN: std::cell::Cell<Option<&'static DatabaseConnection>> =
        const { std::cell::Cell::new(None) };
}

#[cfg(test)]
fn thread_connection() -> Option<&'static DatabaseConnection> {
    TEST_CONN.with(|cell| cell.get())
}

#[cfg(not(test))]
fn thread_connection() -> Option<&'static DatabaseConnection> {
    None
}

/// Свежая БД с миграциями во временном файле, видимая только текущему потоку
///
/// Файл, а не `sqlite::memory:`: у каждого соединения пула была бы своя пустая память.
#[cfg(test)]
pub async fn connect_test_database() -> anyhow::Result<&'static DatabaseConnection> {
    let path = std::env::temp_dir().join(format!(
        "catalog-test-{}.db",
        uuid::Uuid::new_v4().simple()
    ));
    super::migration_runner::run_migrations(&path).await?;
    let conn = Database::connect(&build_sqlite_url(&path)).await?;
    let conn: &'static DatabaseConnection = Box::leak(Box::new(conn));
    TEST_CONN.with(|cell| cell.set(Some(conn)));
    Ok(conn)
}

/// Добавить колонку, если её нет в существующей таблице
///
/// `definition`: часть после имени колонки, например `TEXT NOT NULL DEFAULT ''`.
pub async fn ensure_column(
    conn: &DatabaseConnection,
    table: &str,
    column: &str,
    definition: &str,
) -> anyhow::Result<bool> {
    let pragma = format!("PRAGMA table_info('{}');", table);
    let cols = conn
        .query_all(Statement::from_string(DatabaseBackend::Sqlite, pragma))
        .await?;
    let exists = cols.iter().any(|row| {
        row.try_get::<String>("", "name")
            .map(|name| name == column)
            .unwrap_or(false)
    });
    if exists {
        return Ok(false);
    }

    tracing::info!("Adding column {}.{}", table, column);
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        format!("ALTER TABLE {} ADD COLUMN {} {};", table, column, definition),
    ))
    .await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_sqlite_url() {
        assert_eq!(
            build_sqlite_url(Path::new("/var/data/app.db")),
            "sqlite:///var/data/app.db?mode=rwc"
        );
        assert_eq!(
            build_sqlite_url(Path::new("C:\\data\\app.db")),
            "sqlite:///C:/data/app.db?mode=rwc"
        );
    }

    #[tokio::test]
    async fn test_ensure_column_adds_once() {
        let conn = Database::connect("sqlite::memory:").await.unwrap();
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "CREATE TABLE t (id TEXT PRIMARY KEY NOT NULL);".to_string(),
        ))
        .await
        .unwrap();

        assert!(ensure_column(&conn, "t", "note", "TEXT").await.unwrap());
        assert!(!ensure_column(&conn, "t", "note", "TEXT").await.unwrap());
    }

    #[tokio::test]
    async fn test_connect_test_database_applies_schema() {
        let conn = connect_test_database().await.unwrap();
        assert!(std::ptr::eq(conn, get_connection()));

        let rows = conn
            .query_all(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type='table' AND name='sku_stock_log';"
                    .to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }
}
