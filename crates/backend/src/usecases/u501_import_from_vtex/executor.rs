use crate::domain::{a001_connection, a003_product, a004_sku};
use crate::shared::config;
use crate::shared::integrations::vtex::{VtexApiClient, VtexProduct, VtexSku};
use crate::shared::logger;
use anyhow::Result;
use contracts::domain::a003_product::aggregate::Product;
use contracts::domain::a004_sku::aggregate::{Sku, SkuImage};
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_import_from_vtex::{ImportFromVtex, ImportReport, ImportRequest};
use once_cell::sync::Lazy;
use std::time::Duration;

/// Категория для журналов
static CATEGORY: Lazy<String> = Lazy::new(ImportFromVtex::full_name);

/// GetProductAndSkuIds отдаёт не больше 50 товаров за запрос
const PAGE_SIZE: u32 = 50;

/// Executor импорта каталога из VTEX
pub struct ImportExecutor {
    pause: Duration,
}

impl ImportExecutor {
    pub fn new(pause: Duration) -> Self {
        Self { pause }
    }

    pub fn from_config() -> Self {
        Self::new(Duration::from_millis(config::get().batch.pause_ms))
    }

    /// Импорт за один запрос: товары по очереди, ошибки товара пишутся в отчёт
    pub async fn execute(&self, request: &ImportRequest) -> Result<ImportReport> {
        let client = a001_connection::service::vtex_client().await?;
        let work = self.collect_work(&client, request).await?;

        tracing::info!("[{}] Importing {} products from VTEX", CATEGORY.as_str(), work.len());

        let mut report = ImportReport::default();
        for (index, (product_id, sku_ids)) in work.into_iter().enumerate() {
            if index > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
            report.processed += 1;

            match import_product(&client, product_id, sku_ids).await {
                Ok(true) => report.inserted += 1,
                Ok(false) => report.updated += 1,
                Err(e) => {
                    tracing::error!("[{}] Product {} failed: {}", CATEGORY.as_str(), product_id, e);
                    report.record_error(format!("Product {}: {}", product_id, e));
                }
            }
        }

        let summary = format!(
            "VTEX import finished: {} processed, {} inserted, {} updated, {} errors",
            report.processed, report.inserted, report.updated, report.errors
        );
        tracing::info!("[{}] {}", CATEGORY.as_str(), summary);
        logger::log(CATEGORY.as_str(), &summary);

        Ok(report)
    }

    /// Список (product id, sku ids); при None SKU запрашиваются отдельно
    async fn collect_work(
        &self,
        client: &VtexApiClient,
        request: &ImportRequest,
    ) -> Result<Vec<(i64, Option<Vec<i64>>)>> {
        if let Some(ids) = request.product_ids.as_ref().filter(|ids| !ids.is_empty()) {
            return Ok(ids.iter().map(|id| (*id, None)).collect());
        }

        let from = request.from_index.unwrap_or(1).max(1);
        let first_to = page_end(from, request.to_index);
        let first = client.get_product_and_sku_ids(from, first_to).await?;

        let last = match request.to_index {
            Some(to) => to.min(first.range.total),
            None => first.range.total,
        };

        let mut work: Vec<(i64, Option<Vec<i64>>)> = first
            .entries()
            .into_iter()
            .map(|(id, skus)| (id, Some(skus)))
            .collect();

        let rest = match first_to.checked_add(1) {
            Some(next) => page_ranges(next, last, PAGE_SIZE),
            None => Vec::new(),
        };
        for (page_from, page_to) in rest {
            tokio::time::sleep(self.pause).await;
            let page = client.get_product_and_sku_ids(page_from, page_to).await?;
            if page.data.is_empty() {
                break;
            }
            work.extend(page.entries().into_iter().map(|(id, skus)| (id, Some(skus))));
        }

        Ok(work)
    }
}

fn page_end(from: u32, to_index: Option<u32>) -> u32 {
    let end = from.saturating_add(PAGE_SIZE - 1);
    match to_index {
        Some(to) if to >= from => end.min(to),
        _ => end,
    }
}

/// Диапазоны страниц `from..=to` по `size`, включительно
fn page_ranges(from: u32, to: u32, size: u32) -> Vec<(u32, u32)> {
    let mut ranges = Vec::new();
    let mut start = from;
    while start <= to {
        let end = start.saturating_add(size.saturating_sub(1)).min(to);
        ranges.push((start, end));
        match end.checked_add(1) {
            Some(next) => start = next,
            None => break,
        }
    }
    ranges
}

/// Импортировать товар и его SKU. true, если товар создан впервые
async fn import_product(
    client: &VtexApiClient,
    product_id: i64,
    sku_ids: Option<Vec<i64>>,
) -> Result<bool> {
    let vtex_product = client.get_product(product_id).await?;
    let sku_ids = match sku_ids {
        Some(ids) => ids,
        None => client.get_sku_ids_by_product(product_id).await?,
    };

    let mut vtex_skus = Vec::with_capacity(sku_ids.len());
    for sku_id in sku_ids {
        vtex_skus.push(client.get_sku(sku_id).await?);
    }

    let mut product = match a003_product::service::find_by_vtex_id(product_id).await? {
        Some(existing) => existing,
        None => Product::new_for_vtex(product_id, vtex_product.name.clone()),
    };
    apply_vtex_product(&mut product, &vtex_product, vtex_skus.first());
    let inserted = a003_product::service::save_imported(&mut product).await?;

    let product_ref = product.to_string_id();
    for vtex_sku in &vtex_skus {
        let mut sku = match a004_sku::service::find_by_vtex_id(vtex_sku.id).await? {
            Some(existing) => existing,
            None => Sku::new_for_vtex(
                product_ref.clone(),
                product_id,
                vtex_sku.id,
                vtex_sku.display_name(),
            ),
        };
        sku.product_ref = product_ref.clone();
        apply_vtex_sku(&mut sku, vtex_sku);
        a004_sku::service::save_imported(&mut sku).await?;
    }

    tracing::debug!(
        "Imported product {} with {} SKUs",
        product_id,
        vtex_skus.len()
    );
    Ok(inserted)
}

/// Перенести поля товара VTEX; бренд и категория берутся из первого SKU
fn apply_vtex_product(product: &mut Product, source: &VtexProduct, first_sku: Option<&VtexSku>) {
    product.base.description = source.name.clone();
    product.base.metadata.restore();
    product.ref_id = source.ref_id.clone().filter(|r| !r.trim().is_empty());
    product.brand_id = source.brand_id;
    product.category_id = source.category_id;
    product.department_id = source.department_id;
    product.link_id = source.link_id.clone();
    product.title = source.title.clone();
    product.meta_description = source.meta_tag_description.clone();
    product.product_description = source.description.clone();
    product.is_active = source.is_active.unwrap_or(true);
    product.is_visible = source.is_visible.unwrap_or(true);
    if let Some(sku) = first_sku {
        if sku.brand_name.is_some() {
            product.brand_name = sku.brand_name.clone();
        }
        if let Some(category) = sku.category_name(source.category_id) {
            product.category_name = Some(category);
        }
    }
    product.last_sync_at = Some(chrono::Utc::now());
}

fn apply_vtex_sku(sku: &mut Sku, source: &VtexSku) {
    sku.base.description = source.display_name();
    sku.base.metadata.restore();
    sku.vtex_product_id = source.product_id;
    sku.ean = source.ean();
    sku.ref_id = source.ref_id();
    sku.is_active = source.is_active;
    sku.images = source
        .images
        .iter()
        .map(|img| SkuImage {
            url: img.image_url.clone(),
            name: img.image_name.clone(),
            label: img.image_label.clone(),
        })
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vtex_product() -> VtexProduct {
        serde_json::from_str(
            r#"{
                "Id": 42, "Name": "Camiseta Básica", "DepartmentId": 1, "CategoryId": 7,
                "BrandId": 2000, "LinkId": "camiseta-basica", "RefId": "CB-01",
                "IsVisible": true, "Description": "<p>Algodão</p>", "Title": "Camiseta",
                "MetaTagDescription": "meta", "IsActive": true
            }"#,
        )
        .unwrap()
    }

    fn vtex_sku() -> VtexSku {
        serde_json::from_str(
            r#"{
                "Id": 310, "ProductId": 42, "NameComplete": "Camiseta Básica P",
                "BrandName": "Marca", "ProductCategories": {"1": "Roupas", "7": "Camisetas"},
                "IsActive": true,
                "Images": [{"ImageUrl": "https://vtex/img/1.jpg", "ImageName": "frente"}],
                "AlternateIds": {"Ean": "7890000000001", "RefId": "CB-01-P"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_page_ranges() {
        assert_eq!(page_ranges(51, 120, 50), vec![(51, 100), (101, 120)]);
        assert_eq!(page_ranges(51, 50, 50), Vec::<(u32, u32)>::new());
        assert_eq!(page_ranges(1, 1, 50), vec![(1, 1)]);
    }

    #[test]
    fn test_page_end_respects_to_index() {
        assert_eq!(page_end(1, None), 50);
        assert_eq!(page_end(1, Some(10)), 10);
        assert_eq!(page_end(20, Some(5)), 69);
    }

    #[test]
    fn test_page_bounds_near_u32_max() {
        assert_eq!(page_end(u32::MAX - 10, None), u32::MAX);
        assert_eq!(page_end(u32::MAX, Some(u32::MAX)), u32::MAX);
        assert_eq!(
            page_ranges(u32::MAX - 60, u32::MAX, 50),
            vec![(u32::MAX - 60, u32::MAX - 11), (u32::MAX - 10, u32::MAX)]
        );
        assert_eq!(page_ranges(u32::MAX, u32::MAX, 50), vec![(u32::MAX, u32::MAX)]);
    }

    #[test]
    fn test_apply_vtex_product_restores_deleted() {
        let mut product = Product::new_for_vtex(42, "old".into());
        product.base.metadata.is_deleted = true;
        product.anymarket_id = Some("777".into());

        apply_vtex_product(&mut product, &vtex_product(), Some(&vtex_sku()));

        assert!(!product.base.metadata.is_deleted);
        assert_eq!(product.display_name(), "Camiseta Básica");
        assert_eq!(product.brand_name.as_deref(), Some("Marca"));
        assert_eq!(product.category_name.as_deref(), Some("Camisetas"));
        assert_eq!(product.ref_id.as_deref(), Some("CB-01"));
        assert_eq!(product.anymarket_id.as_deref(), Some("777"));
        assert!(product.last_sync_at.is_some());
    }

    #[test]
    fn test_apply_vtex_sku() {
        let mut sku = Sku::new_for_vtex("p".into(), 42, 310, "x".into());
        apply_vtex_sku(&mut sku, &vtex_sku());

        assert_eq!(sku.base.description, "Camiseta Básica P");
        assert_eq!(sku.ean.as_deref(), Some("7890000000001"));
        assert_eq!(sku.partner_id(), "CB-01-P");
        assert_eq!(sku.images.len(), 1);
        assert_eq!(sku.images[0].name.as_deref(), Some("frente"));
    }
}
