use crate::domain::common::{AggregateId, BaseAggregate, Origin};
use serde::{Deserialize, Serialize};

crate::uuid_aggregate_id!(ProductId, "Уникальный идентификатор товара каталога");

// ============================================================================
// Aggregate Root
// ============================================================================

/// Товар каталога (зеркало продукта VTEX)
///
/// `base.code` хранит VTEX product id строкой, `base.description` хранит название.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(flatten)]
    pub base: BaseAggregate<ProductId>,

    #[serde(rename = "vtexProductId")]
    pub vtex_product_id: i64,

    #[serde(rename = "refId")]
    pub ref_id: Option<String>,

    #[serde(rename = "brandId")]
    pub brand_id: Option<i64>,

    #[serde(rename = "brandName")]
    pub brand_name: Option<String>,

    #[serde(rename = "categoryId")]
    pub category_id: Option<i64>,

    #[serde(rename = "categoryName")]
    pub category_name: Option<String>,

    #[serde(rename = "departmentId")]
    pub department_id: Option<i64>,

    #[serde(rename = "linkId")]
    pub link_id: Option<String>,

    /// SEO title из VTEX
    pub title: Option<String>,

    #[serde(rename = "metaDescription")]
    pub meta_description: Option<String>,

    /// Описание товара из VTEX (HTML)
    #[serde(rename = "productDescription")]
    pub product_description: Option<String>,

    #[serde(rename = "isActive")]
    pub is_active: bool,

    #[serde(rename = "isVisible")]
    pub is_visible: bool,

    /// ID товара в Anymarket (если уже связан)
    #[serde(rename = "anymarketId")]
    pub anymarket_id: Option<String>,

    /// Когда последний раз синхронизировали с VTEX
    #[serde(rename = "lastSyncAt")]
    pub last_sync_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Product {
    /// Пустой товар для VTEX product id (поля заполняет импорт)
    pub fn new_for_vtex(vtex_product_id: i64, name: String) -> Self {
        Self {
            base: BaseAggregate::new(ProductId::new_v4(), vtex_product_id.to_string(), name),
            vtex_product_id,
            ref_id: None,
            brand_id: None,
            brand_name: None,
            category_id: None,
            category_name: None,
            department_id: None,
            link_id: None,
            title: None,
            meta_description: None,
            product_description: None,
            is_active: true,
            is_visible: true,
            anymarket_id: None,
            last_sync_at: None,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Отображаемое имя (для отчётов и логов)
    pub fn display_name(&self) -> &str {
        if self.base.description.trim().is_empty() {
            &self.base.code
        } else {
            &self.base.description
        }
    }

    /// Обновить данные из DTO
    pub fn update(&mut self, dto: &ProductDto) {
        self.base.description = dto.name.clone();
        self.base.comment = dto.comment.clone();
        self.ref_id = dto.ref_id.clone();
        self.brand_name = dto.brand_name.clone();
        self.category_name = dto.category_name.clone();
        self.title = dto.title.clone();
        self.meta_description = dto.meta_description.clone();
        self.product_description = dto.product_description.clone();
        self.is_active = dto.is_active;
        self.anymarket_id = dto.anymarket_id.clone().filter(|s| !s.trim().is_empty());
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.vtex_product_id <= 0 {
            return Err("VTEX product id должен быть положительным".into());
        }
        if self.base.description.trim().is_empty() {
            return Err("Название товара не может быть пустым".into());
        }
        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

crate::impl_aggregate_root!(
    Product,
    ProductId,
    "a003",
    "product",
    "Товар",
    "Товары",
    Origin::Vtex
);

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления товара вручную
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductDto {
    pub id: Option<String>,
    #[serde(rename = "vtexProductId")]
    pub vtex_product_id: i64,
    pub name: String,
    pub comment: Option<String>,
    #[serde(rename = "refId")]
    pub ref_id: Option<String>,
    #[serde(rename = "brandName")]
    pub brand_name: Option<String>,
    #[serde(rename = "categoryName")]
    pub category_name: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "metaDescription")]
    pub meta_description: Option<String>,
    #[serde(rename = "productDescription")]
    pub product_description: Option<String>,
    #[serde(rename = "isActive", default)]
    pub is_active: bool,
    #[serde(rename = "anymarketId")]
    pub anymarket_id: Option<String>,
}

/// Строка списка товаров (минимальные поля для list view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductListItemDto {
    pub id: String,
    #[serde(rename = "vtexProductId")]
    pub vtex_product_id: i64,
    pub name: String,
    #[serde(rename = "refId")]
    pub ref_id: Option<String>,
    #[serde(rename = "brandName")]
    pub brand_name: Option<String>,
    #[serde(rename = "anymarketId")]
    pub anymarket_id: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    #[serde(rename = "lastSyncAt")]
    pub last_sync_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<&Product> for ProductListItemDto {
    fn from(p: &Product) -> Self {
        Self {
            id: p.to_string_id(),
            vtex_product_id: p.vtex_product_id,
            name: p.base.description.clone(),
            ref_id: p.ref_id.clone(),
            brand_name: p.brand_name.clone(),
            anymarket_id: p.anymarket_id.clone(),
            is_active: p.is_active,
            last_sync_at: p.last_sync_at,
        }
    }
}

/// Запрос на привязку товара к Anymarket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetAnymarketIdRequest {
    #[serde(rename = "anymarketId")]
    pub anymarket_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_code() {
        let mut p = Product::new_for_vtex(42, String::new());
        assert_eq!(p.display_name(), "42");
        p.base.description = "Tênis Corrida".into();
        assert_eq!(p.display_name(), "Tênis Corrida");
    }

    #[test]
    fn test_update_clears_blank_anymarket_id() {
        let mut p = Product::new_for_vtex(42, "Tênis".into());
        p.anymarket_id = Some("777".into());
        let dto = ProductDto {
            vtex_product_id: 42,
            name: "Tênis".into(),
            anymarket_id: Some("  ".into()),
            is_active: true,
            ..Default::default()
        };
        p.update(&dto);
        assert_eq!(p.anymarket_id, None);
        assert!(p.validate().is_ok());
    }
}
