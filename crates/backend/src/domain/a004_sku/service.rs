use super::repository;
use contracts::domain::a004_sku::aggregate::Sku;

/// Сохранить SKU из VTEX. Возвращает true, если запись новая.
pub async fn save_imported(sku: &mut Sku) -> anyhow::Result<bool> {
    sku.validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    sku.before_write();
    if sku.base.metadata.is_new() {
        repository::insert(sku).await?;
        Ok(true)
    } else {
        repository::update(sku).await?;
        Ok(false)
    }
}

pub async fn list_by_product(product_ref: &str) -> anyhow::Result<Vec<Sku>> {
    repository::list_by_product(product_ref).await
}

pub async fn list_active() -> anyhow::Result<Vec<Sku>> {
    repository::list_active().await
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Sku>> {
    repository::find_by_id(id).await
}

pub async fn find_by_vtex_id(vtex_sku_id: i64) -> anyhow::Result<Option<Sku>> {
    repository::find_by_vtex_id(vtex_sku_id).await
}

pub async fn delete(id: &str) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

/// Записать новый остаток (SKU + журнал атомарно)
pub async fn set_stock(sku: &Sku, quantity: i64, source: &str) -> anyhow::Result<()> {
    if quantity < 0 {
        anyhow::bail!("Stock quantity cannot be negative: {}", quantity);
    }
    repository::update_stock(sku, quantity, source).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a004_sku::stock_log;
    use crate::shared::data::db::connect_test_database;
    use crate::shared::data::fixtures;
    use sea_orm::{ConnectionTrait, EntityTrait, QueryOrder};

    async fn stored_quantity(id: &str) -> Option<i64> {
        get_by_id(id).await.unwrap().unwrap().stock_quantity
    }

    #[tokio::test]
    async fn set_stock_updates_sku_and_journal() {
        let conn = connect_test_database().await.unwrap();
        let product = fixtures::product(2001, "Camiseta Dry").await;
        let sku = fixtures::sku(&product, 6001, Some("CAM-P"), &[]).await;

        set_stock(&sku, 7, "csv").await.unwrap();
        let sku = get_by_id(&sku.to_string_id()).await.unwrap().unwrap();
        assert_eq!(sku.stock_quantity, Some(7));
        assert!(sku.stock_updated_at.is_some());

        set_stock(&sku, 3, "manual").await.unwrap();
        assert_eq!(stored_quantity(&sku.to_string_id()).await, Some(3));

        let journal = stock_log::Entity::find()
            .order_by_asc(stock_log::Column::Id)
            .all(conn)
            .await
            .unwrap();
        assert_eq!(journal.len(), 2);
        assert_eq!(journal[0].previous_quantity, None);
        assert_eq!(journal[0].quantity, 7);
        assert_eq!(journal[0].source, "csv");
        assert_eq!(journal[1].previous_quantity, Some(7));
        assert_eq!(journal[1].quantity, 3);
        assert!(journal.iter().all(|row| row.sku_ref == sku.to_string_id() && row.vtex_sku_id == 6001));
    }

    #[tokio::test]
    async fn failed_journal_write_rolls_back_stock() {
        let conn = connect_test_database().await.unwrap();
        let product = fixtures::product(2002, "Bermuda").await;
        let sku = fixtures::sku(&product, 6002, None, &[]).await;
        set_stock(&sku, 5, "csv").await.unwrap();
        let sku = get_by_id(&sku.to_string_id()).await.unwrap().unwrap();

        conn.execute_unprepared("DROP TABLE sku_stock_log;")
            .await
            .unwrap();
        assert!(set_stock(&sku, 9, "csv").await.is_err());
        assert_eq!(stored_quantity(&sku.to_string_id()).await, Some(5));
    }

    #[tokio::test]
    async fn negative_stock_is_rejected() {
        connect_test_database().await.unwrap();
        let product = fixtures::product(2003, "Chinelo").await;
        let sku = fixtures::sku(&product, 6003, None, &[]).await;

        assert!(set_stock(&sku, -1, "csv").await.is_err());
        assert_eq!(stored_quantity(&sku.to_string_id()).await, None);
    }
}
