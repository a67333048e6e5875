use crate::domain::{a001_connection, a003_product, a004_sku, a006_generated_content};
use crate::shared::config;
use crate::shared::integrations::anymarket::{
    AnymarketApiClient, ProductContentPatch, ProductImageUpload,
};
use crate::shared::integrations::pixian::PixianApiClient;
use crate::shared::media;
use crate::usecases::common::{run_sequential, BatchItemProcessor, OperationError};
use async_trait::async_trait;
use contracts::domain::a003_product::aggregate::Product;
use contracts::domain::a004_sku::aggregate::{collect_image_urls, Sku};
use contracts::domain::a006_generated_content::aggregate::{ContentKind, GeneratedContent};
use contracts::usecases::common::{BatchReport, UseCaseMetadata};
use contracts::usecases::u504_publish_anymarket::{PublishRequest, PublishToAnymarket};
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::time::Duration;

/// Категория для журналов
static CATEGORY: Lazy<String> = Lazy::new(PublishToAnymarket::full_name);

/// Executor публикации в Anymarket
pub struct PublishExecutor {
    pause: Duration,
    max_images: usize,
    media_dir: PathBuf,
    public_base_url: String,
}

impl PublishExecutor {
    pub fn from_config() -> Self {
        let cfg = config::get();
        Self {
            pause: Duration::from_millis(cfg.batch.pause_ms),
            max_images: cfg.batch.max_images,
            media_dir: config::get_media_dir(cfg),
            public_base_url: cfg.media.public_base_url.clone(),
        }
    }

    /// Подключения проверяются до начала пакета: без них не обработать ни один товар
    pub async fn execute(&self, request: &PublishRequest) -> anyhow::Result<BatchReport> {
        let anymarket = a001_connection::service::anymarket_client().await?;
        let pixian = if request.upload_images && request.remove_background {
            Some(a001_connection::service::pixian_client().await?)
        } else {
            None
        };

        let processor = PublishItem {
            executor: self,
            request,
            anymarket,
            pixian,
        };
        Ok(run_sequential(&processor, &request.product_ids, self.pause, CATEGORY.as_str()).await)
    }
}

struct PublishItem<'a> {
    executor: &'a PublishExecutor,
    request: &'a PublishRequest,
    anymarket: AnymarketApiClient,
    pixian: Option<PixianApiClient>,
}

#[async_trait]
impl<'a> BatchItemProcessor for PublishItem<'a> {
    async fn display_name(&self, product_id: &str) -> Option<String> {
        a003_product::service::display_name(product_id).await
    }

    async fn process(&self, product_id: &str) -> anyhow::Result<String> {
        let product = a003_product::service::get_by_id(product_id)
            .await?
            .ok_or_else(|| OperationError::ProductNotFound(product_id.to_string()))?;
        let skus = a004_sku::service::list_by_product(product_id).await?;

        let anymarket_id = self.resolve_anymarket_id(&product, &skus).await?;
        let mut published = Vec::new();

        let drafts = self.approved_content(product_id).await?;
        let patch = content_patch(&drafts);
        if !patch.is_empty() {
            self.anymarket
                .update_product_content(&anymarket_id, &patch)
                .await?;
            for mut content in drafts {
                a006_generated_content::service::mark_published(&mut content).await?;
                published.push(content.kind.as_str().to_string());
            }
        }

        if self.request.upload_images {
            let count = self.upload_images(&anymarket_id, &skus).await?;
            if count > 0 {
                published.push(format!("{} images", count));
            }
        }

        Ok(if published.is_empty() {
            format!("Nothing to publish for Anymarket product {}", anymarket_id)
        } else {
            format!(
                "Published to Anymarket product {}: {}",
                anymarket_id,
                published.join(", ")
            )
        })
    }
}

impl<'a> PublishItem<'a> {
    /// Сохранённый ID, иначе поиск по partnerId SKU с сохранением результата
    async fn resolve_anymarket_id(&self, product: &Product, skus: &[Sku]) -> anyhow::Result<String> {
        if let Some(id) = product.anymarket_id.as_deref().filter(|s| !s.trim().is_empty()) {
            return Ok(id.to_string());
        }

        for sku in skus {
            let partner_id = sku.partner_id();
            if let Some(id) = self
                .anymarket
                .find_product_id_by_partner_id(&partner_id)
                .await?
            {
                tracing::info!(
                    "Resolved Anymarket product {} for {} by partnerId {}",
                    id,
                    product.to_string_id(),
                    partner_id
                );
                a003_product::service::set_anymarket_id(&product.to_string_id(), Some(&id)).await?;
                return Ok(id);
            }
        }

        Err(OperationError::Invalid(format!(
            "Product {} not found in Anymarket",
            product.display_name()
        ))
        .into())
    }

    async fn approved_content(&self, product_id: &str) -> anyhow::Result<Vec<GeneratedContent>> {
        let mut found = Vec::new();
        let kinds = [
            (self.request.publish_title, ContentKind::Title),
            (self.request.publish_description, ContentKind::Description),
        ];
        for (enabled, kind) in kinds {
            if !enabled {
                continue;
            }
            if let Some(content) =
                a006_generated_content::service::latest_approved(product_id, kind).await?
            {
                found.push(content);
            }
        }
        Ok(found)
    }

    async fn upload_images(&self, anymarket_id: &str, skus: &[Sku]) -> anyhow::Result<usize> {
        let urls = collect_image_urls(skus, self.executor.max_images);
        for (index, url) in urls.iter().enumerate() {
            let url = match &self.pixian {
                Some(pixian) => {
                    let png = pixian.remove_background(url).await?;
                    let name = media::store(&self.executor.media_dir, &png, "png").await?;
                    media::public_url(&self.executor.public_base_url, &name)
                }
                None => url.clone(),
            };
            self.anymarket
                .add_product_image(anymarket_id, &image_upload(url, index))
                .await?;
        }
        Ok(urls.len())
    }
}

fn content_patch(contents: &[GeneratedContent]) -> ProductContentPatch {
    let mut patch = ProductContentPatch::default();
    for content in contents {
        match content.kind {
            ContentKind::Title => patch.title = Some(content.content.clone()),
            ContentKind::Description => patch.description = Some(content.content.clone()),
        }
    }
    patch
}

/// Первое изображение главное, индексы с 1
fn image_upload(url: String, position: usize) -> ProductImageUpload {
    ProductImageUpload {
        url,
        main: position == 0,
        index: position + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_test_database;
    use crate::shared::data::fixtures;
    use axum::extract::State;
    use axum::http::{HeaderMap, Method, StatusCode, Uri};
    use axum::response::{IntoResponse, Response};
    use axum::{Json, Router};
    use contracts::domain::a001_connection::aggregate::Connection;
    use contracts::domain::a006_generated_content::aggregate::ContentStatus;
    use contracts::enums::IntegrationKind;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    type Hits = Arc<Mutex<Vec<String>>>;

    /// Anymarket на loopback: знает только товар 555 с partnerId TN-42
    async fn anymarket_stub(
        State(hits): State<Hits>,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: String,
    ) -> Response {
        if headers.get("gumgatoken").and_then(|v| v.to_str().ok()) != Some("tok") {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        hits.lock().unwrap().push(format!("{} {} {}", method, uri, body));
        match (method.as_str(), uri.path(), uri.query()) {
            ("GET", "/skus", Some("partnerId=TN-42")) => {
                Json(json!({"content": [{"product": {"id": 555}}]})).into_response()
            }
            ("GET", "/skus", _) => Json(json!({"content": []})).into_response(),
            _ => StatusCode::OK.into_response(),
        }
    }

    async fn start_anymarket(hits: &Hits) -> AnymarketApiClient {
        let app = Router::new()
            .fallback(anymarket_stub)
            .with_state(hits.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        let connection = Connection::new_for_insert(
            "AM".into(),
            "Anymarket".into(),
            IntegrationKind::Anymarket,
            Some(format!("http://{}", addr)),
            None,
            None,
            "tok".into(),
            None,
            true,
        );
        AnymarketApiClient::new(reqwest::Client::new(), &connection).unwrap()
    }

    fn executor() -> PublishExecutor {
        PublishExecutor {
            pause: Duration::ZERO,
            max_images: 4,
            media_dir: std::env::temp_dir().join("catalog-test-media"),
            public_base_url: "http://localhost:3000".into(),
        }
    }

    fn publish_request(upload_images: bool) -> PublishRequest {
        PublishRequest {
            product_ids: Vec::new(),
            publish_title: true,
            publish_description: true,
            upload_images,
            remove_background: false,
        }
    }

    async fn stored_content(product: &Product, kind: ContentKind, text: &str, approve: bool) -> String {
        let mut content = GeneratedContent::new_draft(
            product.to_string_id(),
            product.display_name().to_string(),
            "agent".into(),
            kind,
            text.into(),
            "gpt-4o".into(),
            Some(120),
        );
        a006_generated_content::service::save_draft(&mut content)
            .await
            .unwrap();
        let id = content.to_string_id();
        if approve {
            a006_generated_content::service::approve(&id)
                .await
                .unwrap()
                .unwrap()
                .unwrap();
        }
        id
    }

    async fn status_of(id: &str) -> ContentStatus {
        a006_generated_content::service::get_by_id(id)
            .await
            .unwrap()
            .unwrap()
            .status
    }

    #[tokio::test]
    async fn test_publish_resolves_id_by_partner_and_marks_content() {
        connect_test_database().await.unwrap();
        let hits = Hits::default();
        let anymarket = start_anymarket(&hits).await;

        let product = fixtures::product(3001, "Tenis Azul").await;
        fixtures::sku(&product, 7001, Some("TN-42"), &["https://img/1.jpg", "https://img/2.jpg"]).await;
        let title = stored_content(&product, ContentKind::Title, "Tenis Azul Leve", true).await;
        let description = stored_content(&product, ContentKind::Description, "<p>Rascunho</p>", false).await;

        let executor = executor();
        let request = publish_request(true);
        let item = PublishItem {
            executor: &executor,
            request: &request,
            anymarket,
            pixian: None,
        };
        let product_id = product.to_string_id();
        let message = item.process(&product_id).await.unwrap();
        assert_eq!(message, "Published to Anymarket product 555: title, 2 images");

        let stored = a003_product::service::get_by_id(&product_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.anymarket_id.as_deref(), Some("555"));
        assert_eq!(status_of(&title).await, ContentStatus::Published);
        assert_eq!(status_of(&description).await, ContentStatus::Draft);

        let hits = hits.lock().unwrap().clone();
        assert_eq!(hits.len(), 4);
        assert_eq!(hits[0], "GET /skus?partnerId=TN-42 ");
        assert_eq!(hits[1], r#"PATCH /products/555 {"title":"Tenis Azul Leve"}"#);
        assert_eq!(
            hits[2],
            r#"POST /products/555/images {"url":"https://img/1.jpg","main":true,"index":1}"#
        );
        assert_eq!(
            hits[3],
            r#"POST /products/555/images {"url":"https://img/2.jpg","main":false,"index":2}"#
        );
    }

    #[tokio::test]
    async fn test_stored_anymarket_id_skips_lookup() {
        connect_test_database().await.unwrap();
        let hits = Hits::default();
        let anymarket = start_anymarket(&hits).await;

        let product = fixtures::product(3002, "Jaqueta").await;
        fixtures::sku(&product, 7002, Some("TN-42"), &["https://img/j.jpg"]).await;
        let product_id = product.to_string_id();
        a003_product::service::set_anymarket_id(&product_id, Some("777"))
            .await
            .unwrap();

        let executor = executor();
        let request = publish_request(false);
        let item = PublishItem {
            executor: &executor,
            request: &request,
            anymarket,
            pixian: None,
        };
        let message = item.process(&product_id).await.unwrap();
        assert_eq!(message, "Nothing to publish for Anymarket product 777");
        assert!(hits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_partner_id_fails_without_storing() {
        connect_test_database().await.unwrap();
        let hits = Hits::default();
        let anymarket = start_anymarket(&hits).await;

        let product = fixtures::product(3003, "Luva").await;
        fixtures::sku(&product, 7003, Some("LV-1"), &[]).await;
        let title = stored_content(&product, ContentKind::Title, "Luva Termica", true).await;

        let executor = executor();
        let request = publish_request(false);
        let item = PublishItem {
            executor: &executor,
            request: &request,
            anymarket,
            pixian: None,
        };
        let product_id = product.to_string_id();
        let err = item.process(&product_id).await.unwrap_err();
        assert_eq!(err.to_string(), "Product Luva not found in Anymarket");

        let stored = a003_product::service::get_by_id(&product_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.anymarket_id, None);
        assert_eq!(status_of(&title).await, ContentStatus::Approved);
        assert_eq!(*hits.lock().unwrap(), vec!["GET /skus?partnerId=LV-1 ".to_string()]);
    }

    fn content(kind: ContentKind, text: &str) -> GeneratedContent {
        GeneratedContent::new_draft(
            "p".into(),
            "Produto".into(),
            "agent".into(),
            kind,
            text.into(),
            "gpt-4o".into(),
            None,
        )
    }

    #[test]
    fn test_content_patch() {
        assert!(content_patch(&[]).is_empty());

        let patch = content_patch(&[
            content(ContentKind::Title, "Tênis Azul"),
            content(ContentKind::Description, "<p>Leve</p>"),
        ]);
        assert_eq!(patch.title.as_deref(), Some("Tênis Azul"));
        assert_eq!(patch.description.as_deref(), Some("<p>Leve</p>"));

        let only_title = content_patch(&[content(ContentKind::Title, "X")]);
        let json = serde_json::to_value(&only_title).unwrap();
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_first_image_is_main() {
        let first = image_upload("https://a".into(), 0);
        let second = image_upload("https://b".into(), 1);
        assert!(first.main);
        assert_eq!(first.index, 1);
        assert!(!second.main);
        assert_eq!(second.index, 2);
    }
}
