use super::{check_status, parse_json, IntegrationError};
use contracts::domain::a001_connection::aggregate::Connection;
use serde::Deserialize;
use std::collections::BTreeMap;

const SERVICE: &str = "VTEX";

/// HTTP-клиент VTEX Catalog / Logistics API
pub struct VtexApiClient {
    client: reqwest::Client,
    base_url: String,
    app_key: String,
    app_token: String,
}

impl VtexApiClient {
    pub fn new(client: reqwest::Client, connection: &Connection) -> Result<Self, IntegrationError> {
        let app_token = connection
            .api_secret
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| IntegrationError::Config("VTEX AppToken is empty".into()))?;
        Ok(Self {
            client,
            base_url: connection.resolved_base_url(),
            app_key: connection.api_key.clone(),
            app_token,
        })
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .header("X-VTEX-API-AppKey", &self.app_key)
            .header("X-VTEX-API-AppToken", &self.app_token)
            .header("Accept", "application/json")
    }

    /// Проверка доступа: дерево категорий первого уровня
    pub async fn test_connection(&self) -> Result<(), IntegrationError> {
        let response = self
            .get("/api/catalog_system/pub/category/tree/1")
            .send()
            .await?;
        check_status(SERVICE, response).await?;
        Ok(())
    }

    /// GetProductAndSkuIds: страница `from..=to` (VTEX отдаёт не более 50 за раз)
    pub async fn get_product_and_sku_ids(
        &self,
        from: u32,
        to: u32,
    ) -> Result<ProductAndSkuIds, IntegrationError> {
        tracing::debug!("VTEX GetProductAndSkuIds _from={} _to={}", from, to);
        let response = self
            .get(&format!(
                "/api/catalog_system/pvt/products/GetProductAndSkuIds?_from={}&_to={}",
                from, to
            ))
            .send()
            .await?;
        let response = check_status(SERVICE, response).await?;
        parse_json(SERVICE, response).await
    }

    pub async fn get_product(&self, product_id: i64) -> Result<VtexProduct, IntegrationError> {
        let response = self
            .get(&format!("/api/catalog/pvt/product/{}", product_id))
            .send()
            .await?;
        let response = check_status(SERVICE, response).await?;
        parse_json(SERVICE, response).await
    }

    pub async fn get_sku(&self, sku_id: i64) -> Result<VtexSku, IntegrationError> {
        let response = self
            .get(&format!(
                "/api/catalog_system/pvt/sku/stockkeepingunitbyid/{}",
                sku_id
            ))
            .send()
            .await?;
        let response = check_status(SERVICE, response).await?;
        parse_json(SERVICE, response).await
    }

    /// Список SKU товара (когда id SKU не пришли из GetProductAndSkuIds)
    pub async fn get_sku_ids_by_product(&self, product_id: i64) -> Result<Vec<i64>, IntegrationError> {
        let response = self
            .get(&format!(
                "/api/catalog_system/pvt/sku/stockkeepingunitByProductId/{}",
                product_id
            ))
            .send()
            .await?;
        let response = check_status(SERVICE, response).await?;
        let items: Vec<VtexSkuRef> = parse_json(SERVICE, response).await?;
        Ok(items.into_iter().map(|s| s.id).collect())
    }

    pub async fn get_inventory(&self, sku_id: i64) -> Result<VtexInventory, IntegrationError> {
        let response = self
            .get(&format!("/api/logistics/pvt/inventory/skus/{}", sku_id))
            .send()
            .await?;
        let response = check_status(SERVICE, response).await?;
        parse_json(SERVICE, response).await
    }
}

// ============================================================================
// Response structures
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ProductAndSkuIds {
    /// product id (строкой) → sku ids
    #[serde(default)]
    pub data: BTreeMap<String, Vec<i64>>,
    pub range: VtexRange,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VtexRange {
    pub total: u32,
    pub from: u32,
    pub to: u32,
}

impl ProductAndSkuIds {
    /// Пары (product id, sku ids) в порядке возрастания product id
    pub fn entries(&self) -> Vec<(i64, Vec<i64>)> {
        let mut entries: Vec<(i64, Vec<i64>)> = self
            .data
            .iter()
            .filter_map(|(k, v)| k.parse::<i64>().ok().map(|id| (id, v.clone())))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VtexProduct {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub department_id: Option<i64>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub brand_id: Option<i64>,
    #[serde(default)]
    pub link_id: Option<String>,
    #[serde(default)]
    pub ref_id: Option<String>,
    #[serde(default)]
    pub is_visible: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub meta_tag_description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VtexSku {
    pub id: i64,
    pub product_id: i64,
    #[serde(default)]
    pub name_complete: Option<String>,
    #[serde(default)]
    pub sku_name: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub brand_name: Option<String>,
    /// category id → name, от корня к листу
    #[serde(default)]
    pub product_categories: BTreeMap<String, String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub images: Vec<VtexSkuImage>,
    #[serde(default)]
    pub alternate_ids: Option<VtexAlternateIds>,
}

impl VtexSku {
    pub fn display_name(&self) -> String {
        self.name_complete
            .clone()
            .or_else(|| self.sku_name.clone())
            .unwrap_or_else(|| self.id.to_string())
    }

    pub fn ean(&self) -> Option<String> {
        self.alternate_ids.as_ref().and_then(|a| a.ean.clone())
    }

    pub fn ref_id(&self) -> Option<String> {
        self.alternate_ids.as_ref().and_then(|a| a.ref_id.clone())
    }

    /// Название категории товара: последняя в цепочке
    pub fn category_name(&self, category_id: Option<i64>) -> Option<String> {
        if let Some(id) = category_id {
            if let Some(name) = self.product_categories.get(&id.to_string()) {
                return Some(name.clone());
            }
        }
        self.product_categories.values().last().cloned()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VtexSkuImage {
    pub image_url: String,
    #[serde(default)]
    pub image_name: Option<String>,
    #[serde(default)]
    pub image_label: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VtexAlternateIds {
    #[serde(default)]
    pub ean: Option<String>,
    #[serde(default)]
    pub ref_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct VtexSkuRef {
    id: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VtexInventory {
    #[serde(default)]
    pub balance: Vec<VtexWarehouseBalance>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VtexWarehouseBalance {
    #[serde(default)]
    pub warehouse_id: Option<String>,
    #[serde(default)]
    pub total_quantity: i64,
    #[serde(default)]
    pub reserved_quantity: i64,
    #[serde(default)]
    pub has_unlimited_quantity: bool,
}

impl VtexInventory {
    /// Доступный остаток: сумма (total - reserved) по складам, не меньше 0
    pub fn available_quantity(&self, unlimited_stock: i64) -> i64 {
        if self.balance.iter().any(|b| b.has_unlimited_quantity) {
            return unlimited_stock;
        }
        self.balance
            .iter()
            .map(|b| b.total_quantity - b.reserved_quantity)
            .sum::<i64>()
            .max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_and_sku_ids_entries_sorted() {
        let parsed: ProductAndSkuIds = serde_json::from_str(
            r#"{"data":{"10":[100,101],"2":[20]},"range":{"total":2,"from":1,"to":50}}"#,
        )
        .unwrap();
        assert_eq!(parsed.entries(), vec![(2, vec![20]), (10, vec![100, 101])]);
        assert_eq!(parsed.range.total, 2);
    }

    #[test]
    fn test_sku_parsing() {
        let sku: VtexSku = serde_json::from_str(
            r#"{
                "Id": 7, "ProductId": 3, "NameComplete": "Tênis Azul 42",
                "BrandName": "Marca", "IsActive": true,
                "ProductCategories": {"1": "Calçados", "5": "Tênis"},
                "Images": [{"ImageUrl": "http://img/1.jpg", "ImageName": "frente"}],
                "AlternateIds": {"Ean": "789", "RefId": "TN-42"}
            }"#,
        )
        .unwrap();
        assert_eq!(sku.display_name(), "Tênis Azul 42");
        assert_eq!(sku.ean().as_deref(), Some("789"));
        assert_eq!(sku.ref_id().as_deref(), Some("TN-42"));
        assert_eq!(sku.category_name(Some(5)).as_deref(), Some("Tênis"));
        assert_eq!(sku.category_name(None).as_deref(), Some("Tênis"));
        assert_eq!(sku.images[0].image_url, "http://img/1.jpg");
    }

    #[test]
    fn test_available_quantity() {
        let inv: VtexInventory = serde_json::from_str(
            r#"{"balance":[
                {"warehouseId":"1","totalQuantity":10,"reservedQuantity":3},
                {"warehouseId":"2","totalQuantity":1,"reservedQuantity":5}
            ]}"#,
        )
        .unwrap();
        assert_eq!(inv.available_quantity(999), 3);

        let negative: VtexInventory = serde_json::from_str(
            r#"{"balance":[{"totalQuantity":0,"reservedQuantity":2}]}"#,
        )
        .unwrap();
        assert_eq!(negative.available_quantity(999), 0);

        let unlimited: VtexInventory = serde_json::from_str(
            r#"{"balance":[{"totalQuantity":0,"reservedQuantity":0,"hasUnlimitedQuantity":true}]}"#,
        )
        .unwrap();
        assert_eq!(unlimited.available_quantity(999), 999);
    }
}
