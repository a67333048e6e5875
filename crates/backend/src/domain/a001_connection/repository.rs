use chrono::Utc;
use contracts::domain::a001_connection::aggregate::{Connection, ConnectionId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use contracts::enums::IntegrationKind;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_connection")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub kind: String,
    pub base_url: Option<String>,
    pub account_name: Option<String>,
    pub environment: Option<String>,
    pub api_key: String,
    pub api_secret: Option<String>,
    pub is_primary: bool,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Connection {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let kind = IntegrationKind::from_code(&m.kind).unwrap_or(IntegrationKind::Vtex);

        Connection {
            base: BaseAggregate::with_metadata(
                ConnectionId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            kind,
            base_url: m.base_url,
            account_name: m.account_name,
            environment: m.environment,
            api_key: m.api_key,
            api_secret: m.api_secret,
            is_primary: m.is_primary,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(c: &Connection, created_at: chrono::DateTime<Utc>, version: i32) -> ActiveModel {
    ActiveModel {
        id: Set(c.to_string_id()),
        code: Set(c.base.code.clone()),
        description: Set(c.base.description.clone()),
        comment: Set(c.base.comment.clone()),
        kind: Set(c.kind.code().to_string()),
        base_url: Set(c.base_url.clone()),
        account_name: Set(c.account_name.clone()),
        environment: Set(c.environment.clone()),
        api_key: Set(c.api_key.clone()),
        api_secret: Set(c.api_secret.clone()),
        is_primary: Set(c.is_primary),
        is_deleted: Set(false),
        is_posted: Set(false),
        created_at: Set(Some(created_at)),
        updated_at: Set(Some(Utc::now())),
        version: Set(version),
    }
}

pub async fn list_all() -> anyhow::Result<Vec<Connection>> {
    let items: Vec<Connection> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::Kind)
        .order_by_asc(Column::Description)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn find_by_id(id: &str) -> anyhow::Result<Option<Connection>> {
    let model = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(model.map(Into::into))
}

/// Основное подключение вида; без основного берётся первое по порядку
pub async fn find_active(kind: IntegrationKind) -> anyhow::Result<Option<Connection>> {
    let model = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::Kind.eq(kind.code()))
        .order_by_desc(Column::IsPrimary)
        .order_by_asc(Column::CreatedAt)
        .one(conn())
        .await?;
    Ok(model.map(Into::into))
}

pub async fn insert(c: &Connection) -> anyhow::Result<()> {
    Entity::insert(to_active(c, Utc::now(), 1))
        .exec(conn())
        .await?;
    Ok(())
}

pub async fn update(c: &Connection) -> anyhow::Result<()> {
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

/// Снять флаг is_primary со всех подключений вида
pub async fn clear_primary(kind: IntegrationKind) -> anyhow::Result<()> {
    Entity::update_many()
        .col_expr(Column::IsPrimary, Expr::value(false))
        .filter(Column::Kind.eq(kind.code()))
        .exec(conn())
        .await?;
    Ok(())
}
