use crate::domain::common::{AggregateId, BaseAggregate, Origin};
use serde::{Deserialize, Serialize};

crate::uuid_aggregate_id!(SkuId, "Уникальный идентификатор SKU");

/// Изображение SKU (как его отдаёт VTEX)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuImage {
    pub url: String,
    pub name: Option<String>,
    pub label: Option<String>,
}

/// SKU: продаваемый вариант товара
///
/// `base.code` хранит VTEX sku id строкой, `base.description` хранит полное название.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sku {
    #[serde(flatten)]
    pub base: BaseAggregate<SkuId>,

    /// Ссылка на a003_product (UUID)
    #[serde(rename = "productRef")]
    pub product_ref: String,

    #[serde(rename = "vtexSkuId")]
    pub vtex_sku_id: i64,

    #[serde(rename = "vtexProductId")]
    pub vtex_product_id: i64,

    pub ean: Option<String>,

    /// RefId SKU; в Anymarket это partnerId
    #[serde(rename = "refId")]
    pub ref_id: Option<String>,

    pub images: Vec<SkuImage>,

    #[serde(rename = "isActive")]
    pub is_active: bool,

    #[serde(rename = "stockQuantity")]
    pub stock_quantity: Option<i64>,

    #[serde(rename = "stockUpdatedAt")]
    pub stock_updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Sku {
    pub fn new_for_vtex(
        product_ref: String,
        vtex_product_id: i64,
        vtex_sku_id: i64,
        name: String,
    ) -> Self {
        Self {
            base: BaseAggregate::new(SkuId::new_v4(), vtex_sku_id.to_string(), name),
            product_ref,
            vtex_sku_id,
            vtex_product_id,
            ean: None,
            ref_id: None,
            images: Vec::new(),
            is_active: true,
            stock_quantity: None,
            stock_updated_at: None,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Идентификатор для Anymarket: RefId, а без него VTEX sku id
    pub fn partner_id(&self) -> String {
        self.ref_id
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from)
            .unwrap_or_else(|| self.vtex_sku_id.to_string())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.vtex_sku_id <= 0 {
            return Err("VTEX sku id должен быть положительным".into());
        }
        if self.product_ref.trim().is_empty() {
            return Err("Ссылка на товар не может быть пустой".into());
        }
        if self.stock_quantity.map(|q| q < 0).unwrap_or(false) {
            return Err("Остаток не может быть отрицательным".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

crate::impl_aggregate_root!(
    Sku,
    SkuId,
    "a004",
    "sku",
    "SKU",
    "SKU",
    Origin::Vtex
);

/// Собрать URL изображений по списку SKU: порядок сохраняется, дубли убираются
pub fn collect_image_urls<'a>(skus: impl IntoIterator<Item = &'a Sku>, limit: usize) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for sku in skus {
        for image in &sku.images {
            let url = image.url.trim();
            if url.is_empty() || urls.iter().any(|u| u == url) {
                continue;
            }
            if urls.len() >= limit {
                return urls;
            }
            urls.push(url.to_string());
        }
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sku_with(urls: &[&str]) -> Sku {
        let mut sku = Sku::new_for_vtex("p".into(), 1, 10, "SKU".into());
        sku.images = urls
            .iter()
            .map(|u| SkuImage {
                url: u.to_string(),
                name: None,
                label: None,
            })
            .collect();
        sku
    }

    #[test]
    fn test_collect_image_urls_dedup_and_limit() {
        let a = sku_with(&["http://x/1.jpg", "http://x/2.jpg"]);
        let b = sku_with(&["http://x/2.jpg", " ", "http://x/3.jpg", "http://x/4.jpg"]);
        assert_eq!(
            collect_image_urls([&a, &b], 3),
            vec!["http://x/1.jpg", "http://x/2.jpg", "http://x/3.jpg"]
        );
        assert!(collect_image_urls([&a], 0).is_empty());
    }

    #[test]
    fn test_partner_id_prefers_ref_id() {
        let mut sku = sku_with(&[]);
        assert_eq!(sku.partner_id(), "10");
        sku.ref_id = Some(" ABC-1 ".into());
        assert_eq!(sku.partner_id(), "ABC-1");
    }
}
