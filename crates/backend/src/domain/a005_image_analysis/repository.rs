use chrono::Utc;
use contracts::domain::a005_image_analysis::aggregate::{ImageAnalysis, ImageAnalysisId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a005_image_analysis")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub product_ref: String,
    pub agent_ref: String,
    pub model_name: String,
    pub image_urls_json: String,
    pub raw_content: String,
    pub parsed_json: Option<String>,
    pub tokens_used: Option<i32>,
    pub duration_ms: i64,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ImageAnalysis {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        ImageAnalysis {
            base: BaseAggregate::with_metadata(
                ImageAnalysisId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            product_ref: m.product_ref,
            agent_ref: m.agent_ref,
            model_name: m.model_name,
            image_urls: serde_json::from_str(&m.image_urls_json).unwrap_or_default(),
            raw_content: m.raw_content,
            parsed: m
                .parsed_json
                .as_deref()
                .and_then(|s| serde_json::from_str(s).ok()),
            tokens_used: m.tokens_used,
            duration_ms: m.duration_ms,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Анализы: все или по товару, новые сверху
pub async fn list(product_ref: Option<&str>, limit: u64) -> anyhow::Result<Vec<ImageAnalysis>> {
    let mut query = Entity::find().filter(Column::IsDeleted.eq(false));
    if let Some(product_ref) = product_ref {
        query = query.filter(Column::ProductRef.eq(product_ref));
    }
    let items = query
        .order_by_desc(Column::CreatedAt)
        .limit(limit)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn find_by_id(id: &str) -> anyhow::Result<Option<ImageAnalysis>> {
    let model = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(model.map(Into::into))
}

/// Последний анализ товара
pub async fn find_latest(product_ref: &str) -> anyhow::Result<Option<ImageAnalysis>> {
    let model = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::ProductRef.eq(product_ref))
        .order_by_desc(Column::CreatedAt)
        .one(conn())
        .await?;
    Ok(model.map(Into::into))
}

pub async fn insert(a: &ImageAnalysis) -> anyhow::Result<()> {
    let now = Utc::now();
    let parsed_json = match &a.parsed {
        Some(v) => Some(serde_json::to_string(v)?),
        None => None,
    };
    let active = ActiveModel {
        id: Set(a.to_string_id()),
        code: Set(a.base.code.clone()),
        description: Set(a.base.description.clone()),
        comment: Set(a.base.comment.clone()),
        product_ref: Set(a.product_ref.clone()),
        agent_ref: Set(a.agent_ref.clone()),
        model_name: Set(a.model_name.clone()),
        image_urls_json: Set(serde_json::to_string(&a.image_urls)?),
        raw_content: Set(a.raw_content.clone()),
        parsed_json: Set(parsed_json),
        tokens_used: Set(a.tokens_used),
        duration_ms: Set(a.duration_ms),
        is_deleted: Set(false),
        is_posted: Set(false),
        created_at: Set(Some(now)),
        updated_at: Set(Some(now)),
        version: Set(1),
    };
    Entity::insert(active).exec(conn()).await?;
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
