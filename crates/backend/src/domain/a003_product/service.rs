use super::repository;
use contracts::domain::a003_product::aggregate::{Product, ProductDto};
use uuid::Uuid;

/// Создание или обновление товара из формы
pub async fn upsert(dto: ProductDto) -> anyhow::Result<Uuid> {
    let existing = match dto.id.as_deref() {
        Some(id) => Some(
            repository::find_by_id(id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Product not found"))?,
        ),
        None => None,
    };

    match existing {
        Some(mut aggregate) => {
            aggregate.update(&dto);
            aggregate
                .validate()
                .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
            aggregate.before_write();
            repository::update(&aggregate).await?;
            Ok(aggregate.base.id.0)
        }
        None => {
            if repository::find_by_vtex_id(dto.vtex_product_id)
                .await?
                .is_some()
            {
                anyhow::bail!(
                    "Product with VTEX id {} already exists",
                    dto.vtex_product_id
                );
            }
            let mut aggregate = Product::new_for_vtex(dto.vtex_product_id, dto.name.clone());
            aggregate.update(&dto);
            aggregate
                .validate()
                .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
            aggregate.before_write();
            let id = aggregate.base.id.0;
            repository::insert(&aggregate).await?;
            Ok(id)
        }
    }
}

/// Сохранить товар, пришедший из VTEX. Возвращает true, если запись новая.
pub async fn save_imported(product: &mut Product) -> anyhow::Result<bool> {
    product
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    product.before_write();
    if product.base.metadata.is_new() {
        repository::insert(product).await?;
        Ok(true)
    } else {
        repository::update(product).await?;
        Ok(false)
    }
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Product>> {
    repository::find_by_id(id).await
}

pub async fn find_by_vtex_id(vtex_product_id: i64) -> anyhow::Result<Option<Product>> {
    repository::find_by_vtex_id(vtex_product_id).await
}

/// Название для отчётов; None, если товара нет
pub async fn display_name(id: &str) -> Option<String> {
    match repository::find_by_id(id).await {
        Ok(Some(p)) => Some(p.display_name().to_string()),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("Product name lookup failed for {}: {}", id, e);
            None
        }
    }
}

pub async fn list_paginated(
    search: Option<&str>,
    limit: u64,
    offset: u64,
    sort_by: &str,
    sort_desc: bool,
) -> anyhow::Result<(Vec<Product>, u64)> {
    repository::list_paginated(search, limit, offset, sort_by, sort_desc).await
}

pub async fn delete(id: &str) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn set_anymarket_id(id: &str, anymarket_id: Option<&str>) -> anyhow::Result<bool> {
    let anymarket_id = anymarket_id.map(str::trim).filter(|s| !s.is_empty());
    repository::set_anymarket_id(id, anymarket_id).await
}
