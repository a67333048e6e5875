use super::{check_status, IntegrationError};
use contracts::domain::a001_connection::aggregate::Connection;

const SERVICE: &str = "Pixian";

/// Клиент Pixian.AI: удаление фона, ответ в PNG
pub struct PixianApiClient {
    client: reqwest::Client,
    base_url: String,
    api_id: String,
    api_secret: String,
}

impl PixianApiClient {
    pub fn new(client: reqwest::Client, connection: &Connection) -> Result<Self, IntegrationError> {
        let api_secret = connection
            .api_secret
            .clone()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| IntegrationError::Config("Pixian API secret is empty".into()))?;
        Ok(Self {
            client,
            base_url: connection.resolved_base_url(),
            api_id: connection.api_key.clone(),
            api_secret,
        })
    }

    pub async fn test_connection(&self) -> Result<(), IntegrationError> {
        let response = self
            .client
            .get(format!("{}/account", self.base_url))
            .basic_auth(&self.api_id, Some(&self.api_secret))
            .send()
            .await?;
        check_status(SERVICE, response).await?;
        Ok(())
    }

    /// Удалить фон у изображения по URL
    pub async fn remove_background(&self, image_url: &str) -> Result<Vec<u8>, IntegrationError> {
        tracing::debug!("Pixian remove-background: {}", image_url);
        let response = self
            .client
            .post(format!("{}/remove-background", self.base_url))
            .basic_auth(&self.api_id, Some(&self.api_secret))
            .form(&[("image.url", image_url)])
            .send()
            .await?;
        let response = check_status(SERVICE, response).await?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(IntegrationError::Parse {
                service: SERVICE,
                message: "empty image".into(),
            });
        }
        Ok(bytes.to_vec())
    }
}
