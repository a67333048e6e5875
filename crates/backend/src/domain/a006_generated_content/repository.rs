use chrono::Utc;
use contracts::domain::a006_generated_content::aggregate::{
    ContentKind, ContentStatus, GeneratedContent, GeneratedContentId,
};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a006_generated_content")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub product_ref: String,
    pub agent_ref: String,
    pub kind: String,
    pub status: String,
    pub content: String,
    pub model_name: String,
    pub tokens_used: Option<i32>,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for GeneratedContent {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        GeneratedContent {
            base: BaseAggregate::with_metadata(
                GeneratedContentId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            product_ref: m.product_ref,
            agent_ref: m.agent_ref,
            kind: ContentKind::from_str(&m.kind).unwrap_or(ContentKind::Description),
            status: ContentStatus::from_str(&m.status).unwrap_or(ContentStatus::Draft),
            content: m.content,
            model_name: m.model_name,
            tokens_used: m.tokens_used,
            published_at: m.published_at,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(c: &GeneratedContent, created_at: chrono::DateTime<Utc>, version: i32) -> ActiveModel {
    ActiveModel {
        id: Set(c.to_string_id()),
        code: Set(c.base.code.clone()),
        description: Set(c.base.description.clone()),
        comment: Set(c.base.comment.clone()),
        product_ref: Set(c.product_ref.clone()),
        agent_ref: Set(c.agent_ref.clone()),
        kind: Set(c.kind.as_str().to_string()),
        status: Set(c.status.as_str().to_string()),
        content: Set(c.content.clone()),
        model_name: Set(c.model_name.clone()),
        tokens_used: Set(c.tokens_used),
        published_at: Set(c.published_at),
        is_deleted: Set(false),
        is_posted: Set(c.status == ContentStatus::Published),
        created_at: Set(Some(created_at)),
        updated_at: Set(Some(Utc::now())),
        version: Set(version),
    }
}

/// Контент товара, новые сверху
pub async fn list_by_product(product_ref: &str) -> anyhow::Result<Vec<GeneratedContent>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::ProductRef.eq(product_ref))
        .order_by_desc(Column::CreatedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn find_by_id(id: &str) -> anyhow::Result<Option<GeneratedContent>> {
    let model = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(model.map(Into::into))
}

/// Последний контент вида в заданном статусе
pub async fn find_latest(
    product_ref: &str,
    kind: ContentKind,
    status: ContentStatus,
) -> anyhow::Result<Option<GeneratedContent>> {
    let model = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::ProductRef.eq(product_ref))
        .filter(Column::Kind.eq(kind.as_str()))
        .filter(Column::Status.eq(status.as_str()))
        .order_by_desc(Column::UpdatedAt)
        .one(conn())
        .await?;
    Ok(model.map(Into::into))
}

pub async fn insert(c: &GeneratedContent) -> anyhow::Result<()> {
    Entity::insert(to_active(c, Utc::now(), 1))
        .exec(conn())
        .await?;
    Ok(())
}

pub async fn update(c: &GeneratedContent) -> anyhow::Result<()> {
    Entity::update(to_active(
        c,
        c.base.metadata.created_at,
        c.base.metadata.version + 1,
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
