use chrono::Utc;
use contracts::domain::a004_sku::aggregate::{Sku, SkuId, SkuImage};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::stock_log;
use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a004_sku")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub product_ref: String,
    pub vtex_sku_id: i64,
    pub vtex_product_id: i64,
    pub ean: Option<String>,
    pub ref_id: Option<String>,
    /// JSON-массив SkuImage
    pub images_json: String,
    pub is_active: bool,
    pub stock_quantity: Option<i64>,
    pub stock_updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Sku {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let images: Vec<SkuImage> = serde_json::from_str(&m.images_json).unwrap_or_else(|e| {
            tracing::warn!("Invalid images_json for SKU {}: {}", m.vtex_sku_id, e);
            Vec::new()
        });

        Sku {
            base: BaseAggregate::with_metadata(
                SkuId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            product_ref: m.product_ref,
            vtex_sku_id: m.vtex_sku_id,
            vtex_product_id: m.vtex_product_id,
            ean: m.ean,
            ref_id: m.ref_id,
            images,
            is_active: m.is_active,
            stock_quantity: m.stock_quantity,
            stock_updated_at: m.stock_updated_at,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(s: &Sku, created_at: chrono::DateTime<Utc>, version: i32) -> anyhow::Result<ActiveModel> {
    Ok(ActiveModel {
        id: Set(s.to_string_id()),
        code: Set(s.base.code.clone()),
        description: Set(s.base.description.clone()),
        comment: Set(s.base.comment.clone()),
        product_ref: Set(s.product_ref.clone()),
        vtex_sku_id: Set(s.vtex_sku_id),
        vtex_product_id: Set(s.vtex_product_id),
        ean: Set(s.ean.clone()),
        ref_id: Set(s.ref_id.clone()),
        images_json: Set(serde_json::to_string(&s.images)?),
        is_active: Set(s.is_active),
        stock_quantity: Set(s.stock_quantity),
        stock_updated_at: Set(s.stock_updated_at),
        is_deleted: Set(s.base.metadata.is_deleted),
        is_posted: Set(false),
        created_at: Set(Some(created_at)),
        updated_at: Set(Some(Utc::now())),
        version: Set(version),
    })
}

/// SKU товара в порядке VTEX sku id
pub async fn list_by_product(product_ref: &str) -> anyhow::Result<Vec<Sku>> {
    let items: Vec<Sku> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::ProductRef.eq(product_ref))
        .order_by_asc(Column::VtexSkuId)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Активные SKU каталога (для импорта остатков)
pub async fn list_active() -> anyhow::Result<Vec<Sku>> {
    let items: Vec<Sku> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::IsActive.eq(true))
        .order_by_asc(Column::VtexSkuId)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn find_by_id(id: &str) -> anyhow::Result<Option<Sku>> {
    let model = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(model.map(Into::into))
}

pub async fn find_by_vtex_id(vtex_sku_id: i64) -> anyhow::Result<Option<Sku>> {
    let model = Entity::find()
        .filter(Column::VtexSkuId.eq(vtex_sku_id))
        .one(conn())
        .await?;
    Ok(model.map(Into::into))
}

pub async fn insert(s: &Sku) -> anyhow::Result<()> {
    Entity::insert(to_active(s, Utc::now(), 1)?)
        .exec(conn())
        .await?;
    Ok(())
}

pub async fn update(s: &Sku) -> anyhow::Result<()> {
    Entity::update(to_active(
        s,
        s.base.metadata.created_at,
        s.base.metadata.version + 1,
    )?)
    .exec(conn())
    .await?;
    Ok(())
}

pub async fn soft_delete(id: &str) -> anyhow::Result<bool> {
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Some(Utc::now())))
        .filter(Column::Id.eq(id))
        .filter(Column::IsDeleted.eq(false))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}

/// Обновить остаток SKU и записать строку журнала в одной транзакции
pub async fn update_stock(sku: &Sku, quantity: i64, source: &str) -> anyhow::Result<()> {
    let now = Utc::now();
    let txn = conn().begin().await?;

    Entity::update_many()
        .col_expr(Column::StockQuantity, Expr::value(Some(quantity)))
        .col_expr(Column::StockUpdatedAt, Expr::value(Some(now)))
        .col_expr(Column::UpdatedAt, Expr::value(Some(now)))
        .filter(Column::Id.eq(sku.to_string_id()))
        .exec(&txn)
        .await?;

    stock_log::ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        sku_ref: Set(sku.to_string_id()),
        vtex_sku_id: Set(sku.vtex_sku_id),
        previous_quantity: Set(sku.stock_quantity),
        quantity: Set(quantity),
        source: Set(source.to_string()),
        created_at: Set(now),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(())
}
