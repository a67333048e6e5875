use super::repository;
use crate::shared::config;
use crate::shared::integrations::{
    anymarket::AnymarketApiClient, build_http_client, pixian::PixianApiClient,
    vtex::VtexApiClient, IntegrationError,
};
use crate::shared::logger;
use contracts::domain::a001_connection::aggregate::{
    Connection, ConnectionDto, ConnectionTestResult,
};
use contracts::enums::IntegrationKind;
use uuid::Uuid;

/// Создание нового подключения
pub async fn create(dto: ConnectionDto) -> anyhow::Result<Uuid> {
    let code = dto
        .code
        .clone()
        .unwrap_or_else(|| format!("{}-{}", dto.kind.code().to_uppercase(), &Uuid::new_v4().to_string()[..8]));

    let mut aggregate = Connection::new_for_insert(
        code,
        dto.description.clone(),
        dto.kind,
        None,
        None,
        None,
        dto.api_key.clone(),
        None,
        dto.is_primary,
    );
    aggregate.update(&dto);

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    aggregate.before_write();

    // Основным может быть только одно подключение вида
    if aggregate.is_primary {
        repository::clear_primary(aggregate.kind).await?;
    }

    let id = aggregate.base.id.0;
    repository::insert(&aggregate).await?;
    logger::log(
        "a001",
        &format!("Connection created: {} ({})", aggregate.base.description, aggregate.kind),
    );
    Ok(id)
}

/// Обновление подключения
pub async fn update(dto: ConnectionDto) -> anyhow::Result<()> {
    let id_str = dto
        .id
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("ID is required"))?;

    let mut aggregate = repository::find_by_id(id_str)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Connection not found"))?;

    // Из списка приходит маскированный ключ: сохраняем прежний
    let keep_key = dto.api_key.contains("...") || dto.api_key == "****";
    let old_key = aggregate.api_key.clone();
    aggregate.update(&dto);
    if keep_key {
        aggregate.api_key = old_key;
    }

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    aggregate.before_write();

    if aggregate.is_primary {
        repository::clear_primary(aggregate.kind).await?;
    }

    repository::update(&aggregate).await
}

pub async fn delete(id: &str) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

/// Подключение для UI: секреты замаскированы
pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Connection>> {
    Ok(repository::find_by_id(id).await?.map(Connection::redacted))
}

/// Список для UI: секреты замаскированы
pub async fn list_all() -> anyhow::Result<Vec<Connection>> {
    Ok(repository::list_all()
        .await?
        .into_iter()
        .map(Connection::redacted)
        .collect())
}

async fn active_connection(kind: IntegrationKind) -> anyhow::Result<Connection> {
    repository::find_active(kind)
        .await?
        .ok_or_else(|| IntegrationError::MissingConnection(kind.display_name()).into())
}

fn http_client() -> Result<reqwest::Client, IntegrationError> {
    build_http_client(config::get().http.timeout_secs)
}

/// Клиент VTEX по активному подключению
pub async fn vtex_client() -> anyhow::Result<VtexApiClient> {
    let connection = active_connection(IntegrationKind::Vtex).await?;
    Ok(VtexApiClient::new(http_client()?, &connection)?)
}

/// Клиент Anymarket по активному подключению
pub async fn anymarket_client() -> anyhow::Result<AnymarketApiClient> {
    let connection = active_connection(IntegrationKind::Anymarket).await?;
    Ok(AnymarketApiClient::new(http_client()?, &connection)?)
}

/// Клиент Pixian по активному подключению
pub async fn pixian_client() -> anyhow::Result<PixianApiClient> {
    let connection = active_connection(IntegrationKind::Pixian).await?;
    Ok(PixianApiClient::new(http_client()?, &connection)?)
}

/// Тест подключения по данным формы (до сохранения)
pub async fn test_connection(dto: ConnectionDto) -> ConnectionTestResult {
    let started = std::time::Instant::now();

    let mut connection = Connection::new_for_insert(
        "TEST".into(),
        dto.description.clone(),
        dto.kind,
        None,
        None,
        None,
        dto.api_key.clone(),
        None,
        false,
    );
    connection.update(&dto);

    // Маскированный ключ из формы: берём сохранённый
    if let Some(id) = dto.id.as_deref() {
        if connection.api_key.contains("...") {
            if let Ok(Some(saved)) = repository::find_by_id(id).await {
                connection.api_key = saved.api_key;
                if connection.api_secret.is_none() {
                    connection.api_secret = saved.api_secret;
                }
            }
        }
    }

    let outcome: Result<(), String> = match connection.validate() {
        Err(e) => Err(e),
        Ok(()) => run_test(&connection).await.map_err(|e| e.to_string()),
    };

    let duration_ms = started.elapsed().as_millis() as u64;
    let base_url = connection.resolved_base_url();
    match outcome {
        Ok(()) => ConnectionTestResult {
            success: true,
            message: format!("Connected to {}", connection.kind.display_name()),
            duration_ms,
            tested_at: chrono::Utc::now(),
            details: Some(base_url),
        },
        Err(e) => {
            tracing::warn!("Connection test failed for {}: {}", base_url, e);
            ConnectionTestResult {
                success: false,
                message: format!("Connection failed: {}", e),
                duration_ms,
                tested_at: chrono::Utc::now(),
                details: Some(base_url),
            }
        }
    }
}

async fn run_test(connection: &Connection) -> Result<(), IntegrationError> {
    let client = http_client()?;
    match connection.kind {
        IntegrationKind::Vtex => VtexApiClient::new(client, connection)?.test_connection().await,
        IntegrationKind::Anymarket => {
            AnymarketApiClient::new(client, connection)?
                .test_connection()
                .await
        }
        IntegrationKind::Pixian => PixianApiClient::new(client, connection)?.test_connection().await,
    }
}
