use chrono::Utc;
use contracts::domain::a003_product::aggregate::{Product, ProductId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub vtex_product_id: i64,
    pub ref_id: Option<String>,
    pub brand_id: Option<i64>,
    pub brand_name: Option<String>,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub department_id: Option<i64>,
    pub link_id: Option<String>,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub product_description: Option<String>,
    pub is_active: bool,
    pub is_visible: bool,
    pub anymarket_id: Option<String>,
    pub last_sync_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Product {
            base: BaseAggregate::with_metadata(
                ProductId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            vtex_product_id: m.vtex_product_id,
            ref_id: m.ref_id,
            brand_id: m.brand_id,
            brand_name: m.brand_name,
            category_id: m.category_id,
            category_name: m.category_name,
            department_id: m.department_id,
            link_id: m.link_id,
            title: m.title,
            meta_description: m.meta_description,
            product_description: m.product_description,
            is_active: m.is_active,
            is_visible: m.is_visible,
            anymarket_id: m.anymarket_id,
            last_sync_at: m.last_sync_at,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(p: &Product, created_at: chrono::DateTime<Utc>, version: i32) -> ActiveModel {
    ActiveModel {
        id: Set(p.to_string_id()),
        code: Set(p.base.code.clone()),
        description: Set(p.base.description.clone()),
        comment: Set(p.base.comment.clone()),
        vtex_product_id: Set(p.vtex_product_id),
        ref_id: Set(p.ref_id.clone()),
        brand_id: Set(p.brand_id),
        brand_name: Set(p.brand_name.clone()),
        category_id: Set(p.category_id),
        category_name: Set(p.category_name.clone()),
        department_id: Set(p.department_id),
        link_id: Set(p.link_id.clone()),
        title: Set(p.title.clone()),
        meta_description: Set(p.meta_description.clone()),
        product_description: Set(p.product_description.clone()),
        is_active: Set(p.is_active),
        is_visible: Set(p.is_visible),
        anymarket_id: Set(p.anymarket_id.clone()),
        last_sync_at: Set(p.last_sync_at),
        is_deleted: Set(p.base.metadata.is_deleted),
        is_posted: Set(false),
        created_at: Set(Some(created_at)),
        updated_at: Set(Some(Utc::now())),
        version: Set(version),
    }
}

/// Пагинированный список с поиском по названию / RefId / VTEX id
pub async fn list_paginated(
    search: Option<&str>,
    limit: u64,
    offset: u64,
    sort_by: &str,
    sort_desc: bool,
) -> anyhow::Result<(Vec<Product>, u64)> {
    let mut query = Entity::find().filter(Column::IsDeleted.eq(false));

    if let Some(term) = search.map(str::trim).filter(|s| !s.is_empty()) {
        let mut cond = Condition::any()
            .add(Column::Description.contains(term))
            .add(Column::RefId.contains(term));
        if let Ok(vtex_id) = term.parse::<i64>() {
            cond = cond.add(Column::VtexProductId.eq(vtex_id));
        }
        query = query.filter(cond);
    }

    let total = query.clone().count(conn()).await?;

    let column = match sort_by {
        "vtex_product_id" => Column::VtexProductId,
        "ref_id" => Column::RefId,
        "brand_name" => Column::BrandName,
        "last_sync_at" => Column::LastSyncAt,
        _ => Column::Description,
    };
    let query = if sort_desc {
        query.order_by_desc(column)
    } else {
        query.order_by_asc(column)
    };

    let items: Vec<Product> = query
        .offset(offset)
        .limit(limit)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok((items, total))
}

pub async fn find_by_id(id: &str) -> anyhow::Result<Option<Product>> {
    let model = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(model.map(Into::into))
}

/// Поиск по VTEX id (включая удалённые: импорт их восстанавливает)
pub async fn find_by_vtex_id(vtex_product_id: i64) -> anyhow::Result<Option<Product>> {
    let model = Entity::find()
        .filter(Column::VtexProductId.eq(vtex_product_id))
        .one(conn())
        .await?;
    Ok(model.map(Into::into))
}

pub async fn insert(p: &Product) -> anyhow::Result<()> {
    Entity::insert(to_active(p, Utc::now(), 1))
        .exec(conn())
        .await?;
    Ok(())
}

pub async fn update(p: &Product) -> anyhow::Result<()> {
    Entity::update(to_active(
        p,
        p.base.metadata.created_at,
        p.base.metadata.version + 1,
    ))
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

pub async fn set_anymarket_id(id: &str, anymarket_id: Option<&str>) -> anyhow::Result<bool> {
    let result = Entity::update_many()
        .col_expr(Column::AnymarketId, Expr::value(anymarket_id.map(str::to_string)))
        .col_expr(Column::UpdatedAt, Expr::value(Some(Utc::now())))
        .filter(Column::Id.eq(id))
        .filter(Column::IsDeleted.eq(false))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}
