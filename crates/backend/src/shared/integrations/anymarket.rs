use super::{check_status, parse_json, IntegrationError};
use contracts::domain::a001_connection::aggregate::Connection;
use serde::{Deserialize, Serialize};

const SERVICE: &str = "Anymarket";

/// HTTP-клиент Anymarket API v2 (авторизация заголовком gumgaToken)
pub struct AnymarketApiClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl AnymarketApiClient {
    pub fn new(client: reqwest::Client, connection: &Connection) -> Result<Self, IntegrationError> {
        if connection.api_key.trim().is_empty() {
            return Err(IntegrationError::Config("gumgaToken is empty".into()));
        }
        Ok(Self {
            client,
            base_url: connection.resolved_base_url(),
            token: connection.api_key.clone(),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("gumgaToken", &self.token)
            .header("Accept", "application/json")
    }

    pub async fn test_connection(&self) -> Result<(), IntegrationError> {
        let response = self
            .request(reqwest::Method::GET, "/products?limit=1")
            .send()
            .await?;
        check_status(SERVICE, response).await?;
        Ok(())
    }

    /// Найти товар Anymarket по partnerId SKU; None, если SKU там нет
    pub async fn find_product_id_by_partner_id(
        &self,
        partner_id: &str,
    ) -> Result<Option<String>, IntegrationError> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/skus?partnerId={}", urlencoding::encode(partner_id)),
            )
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(SERVICE, response).await?;
        let body: serde_json::Value = parse_json(SERVICE, response).await?;
        Ok(product_id_from_sku_lookup(&body))
    }

    /// PATCH /products/{id}: только переданные поля
    pub async fn update_product_content(
        &self,
        product_id: &str,
        patch: &ProductContentPatch,
    ) -> Result<(), IntegrationError> {
        tracing::info!("Anymarket PATCH /products/{}", product_id);
        let response = self
            .request(reqwest::Method::PATCH, &format!("/products/{}", product_id))
            .json(patch)
            .send()
            .await?;
        check_status(SERVICE, response).await?;
        Ok(())
    }

    /// POST /products/{id}/images: Anymarket сам скачивает изображение по URL
    pub async fn add_product_image(
        &self,
        product_id: &str,
        image: &ProductImageUpload,
    ) -> Result<(), IntegrationError> {
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/products/{}/images", product_id),
            )
            .json(image)
            .send()
            .await?;
        check_status(SERVICE, response).await?;
        Ok(())
    }

    /// PUT /stocks для одного SKU
    pub async fn update_stock(&self, partner_id: &str, quantity: i64) -> Result<(), IntegrationError> {
        let body = vec![StockUpdate {
            partner_id: partner_id.to_string(),
            quantity,
        }];
        let response = self
            .request(reqwest::Method::PUT, "/stocks")
            .json(&body)
            .send()
            .await?;
        check_status(SERVICE, response).await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductContentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProductContentPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductImageUpload {
    pub url: String,
    pub main: bool,
    pub index: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct StockUpdate {
    partner_id: String,
    quantity: i64,
}

#[derive(Debug, Deserialize)]
struct SkuLookupItem {
    #[serde(default)]
    product: Option<ProductRef>,
    #[serde(default, rename = "idProduct")]
    id_product: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ProductRef {
    id: serde_json::Value,
}

fn id_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Ответ /skus бывает страницей `{content: [...]}` или массивом
fn product_id_from_sku_lookup(body: &serde_json::Value) -> Option<String> {
    let items = match body {
        serde_json::Value::Array(items) => items.clone(),
        serde_json::Value::Object(map) => match map.get("content") {
            Some(serde_json::Value::Array(items)) => items.clone(),
            _ => vec![body.clone()],
        },
        _ => return None,
    };

    items.into_iter().find_map(|item| {
        let parsed: SkuLookupItem = serde_json::from_value(item).ok()?;
        parsed
            .product
            .as_ref()
            .and_then(|p| id_to_string(&p.id))
            .or_else(|| parsed.id_product.as_ref().and_then(id_to_string))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_from_page() {
        let body = serde_json::json!({
            "content": [{"id": 1, "partnerId": "TN-42", "product": {"id": 555}}],
            "page": {"size": 5, "totalElements": 1}
        });
        assert_eq!(product_id_from_sku_lookup(&body).as_deref(), Some("555"));
    }

    #[test]
    fn test_product_id_from_array_and_empty() {
        let body = serde_json::json!([{"idProduct": "777"}]);
        assert_eq!(product_id_from_sku_lookup(&body).as_deref(), Some("777"));

        let empty = serde_json::json!({"content": []});
        assert_eq!(product_id_from_sku_lookup(&empty), None);
    }

    #[test]
    fn test_patch_skips_missing_fields() {
        let patch = ProductContentPatch {
            title: Some("Novo título".into()),
            description: None,
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({"title": "Novo título"})
        );
        assert!(ProductContentPatch::default().is_empty());
    }
}
