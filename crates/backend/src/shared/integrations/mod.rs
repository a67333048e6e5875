//! HTTP-клиенты внешних сервисов: VTEX, Anymarket, Pixian

pub mod anymarket;
pub mod pixian;
pub mod vtex;

use thiserror::Error;

/// Ошибки обращения к внешнему API
#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("No active {0} connection configured")]
    MissingConnection(&'static str),

    #[error("Connection is misconfigured: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to parse {service} response: {message}")]
    Parse {
        service: &'static str,
        message: String,
    },
}

/// HTTP клиент с таймаутом из конфига
pub fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, IntegrationError> {
    Ok(reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()?)
}

/// Проверить статус ответа; тело ошибки обрезается для логов
pub(crate) async fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, IntegrationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let body: String = body.chars().take(500).collect();
    tracing::error!("{} API request failed with status {}: {}", service, status, body);
    Err(IntegrationError::Status {
        service,
        status: status.as_u16(),
        body,
    })
}

/// Прочитать тело как JSON с понятной ошибкой
pub(crate) async fn parse_json<T: serde::de::DeserializeOwned>(
    service: &'static str,
    response: reqwest::Response,
) -> Result<T, IntegrationError> {
    let body = response.text().await?;
    serde_json::from_str::<T>(&body).map_err(|e| {
        let preview: String = body.chars().take(300).collect();
        tracing::error!("Failed to parse {} response: {}. Body: {}", service, e, preview);
        IntegrationError::Parse {
            service,
            message: e.to_string(),
        }
    })
}
