use chrono::Utc;
use contracts::domain::a002_llm_agent::aggregate::{LlmAgent, LlmAgentId, LlmProviderType};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use contracts::enums::AgentPurpose;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    Set,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_llm_agent")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub provider_type: String,
    pub api_endpoint: String,
    pub api_key: String,
    pub model_name: String,
    pub temperature: f64,
    pub max_tokens: i32,
    pub system_prompt: Option<String>,
    pub prompt_template: String,
    pub purpose: String,
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

impl From<Model> for LlmAgent {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let provider_type =
            LlmProviderType::from_str(&m.provider_type).unwrap_or(LlmProviderType::OpenAI);
        let purpose = AgentPurpose::from_str(&m.purpose).unwrap_or(AgentPurpose::General);

        LlmAgent {
            base: BaseAggregate::with_metadata(
                LlmAgentId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            provider_type,
            api_endpoint: m.api_endpoint,
            api_key: m.api_key,
            model_name: m.model_name,
            temperature: m.temperature,
            max_tokens: m.max_tokens,
            system_prompt: m.system_prompt,
            prompt_template: m.prompt_template,
            purpose,
            is_primary: m.is_primary,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(agent: &LlmAgent, created_at: chrono::DateTime<Utc>, version: i32) -> ActiveModel {
    ActiveModel {
        id: Set(agent.to_string_id()),
        code: Set(agent.base.code.clone()),
        description: Set(agent.base.description.clone()),
        comment: Set(agent.base.comment.clone()),
        provider_type: Set(agent.provider_type.as_str().to_string()),
        api_endpoint: Set(agent.api_endpoint.clone()),
        api_key: Set(agent.api_key.clone()),
        model_name: Set(agent.model_name.clone()),
        temperature: Set(agent.temperature),
        max_tokens: Set(agent.max_tokens),
        system_prompt: Set(agent.system_prompt.clone()),
        prompt_template: Set(agent.prompt_template.clone()),
        purpose: Set(agent.purpose.as_str().to_string()),
        is_primary: Set(agent.is_primary),
        is_deleted: Set(false),
        is_posted: Set(false),
        created_at: Set(Some(created_at)),
        updated_at: Set(Some(Utc::now())),
        version: Set(version),
    }
}

fn active() -> Select<Entity> {
    Entity::find().filter(Column::IsDeleted.eq(false))
}

pub async fn list_all() -> anyhow::Result<Vec<LlmAgent>> {
    Ok(active()
        .order_by_asc(Column::Purpose)
        .order_by_asc(Column::Description)
        .all(conn())
        .await?
        .into_iter()
        .map(LlmAgent::from)
        .collect())
}

/// Страница агентов и общее количество; неизвестное поле сортировки = по описанию
pub async fn list_paginated(
    limit: u64,
    offset: u64,
    sort_by: &str,
    sort_desc: bool,
) -> anyhow::Result<(Vec<LlmAgent>, u64)> {
    let total = active().count(conn()).await?;

    let column = match sort_by {
        "code" => Column::Code,
        "provider_type" => Column::ProviderType,
        "model_name" => Column::ModelName,
        "purpose" => Column::Purpose,
        "updated_at" => Column::UpdatedAt,
        _ => Column::Description,
    };
    let order = if sort_desc { Order::Desc } else { Order::Asc };

    let items = active()
        .order_by(column, order)
        .offset(offset)
        .limit(limit)
        .all(conn())
        .await?
        .into_iter()
        .map(LlmAgent::from)
        .collect();

    Ok((items, total))
}

pub async fn find_by_id(id: &str) -> anyhow::Result<Option<LlmAgent>> {
    let model = active()
        .filter(Column::Id.eq(id))
        .one(conn())
        .await?;

    Ok(model.map(Into::into))
}

/// Основной агент назначения (не больше одного)
pub async fn find_primary(purpose: AgentPurpose) -> anyhow::Result<Option<LlmAgent>> {
    let model = active()
        .filter(Column::IsPrimary.eq(true))
        .filter(Column::Purpose.eq(purpose.as_str()))
        .one(conn())
        .await?;

    Ok(model.map(Into::into))
}

pub async fn insert(agent: &LlmAgent) -> anyhow::Result<()> {
    Entity::insert(to_active(agent, Utc::now(), 1))
        .exec(conn())
        .await?;
    Ok(())
}

pub async fn update(agent: &LlmAgent) -> anyhow::Result<()> {
    Entity::update(to_active(
        agent,
        agent.base.metadata.created_at,
        agent.base.metadata.version + 1,
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

/// Снять флаг is_primary с агентов того же назначения
pub async fn clear_primary(purpose: AgentPurpose) -> anyhow::Result<()> {
    Entity::update_many()
        .col_expr(Column::IsPrimary, Expr::value(false))
        .filter(Column::Purpose.eq(purpose.as_str()))
        .exec(conn())
        .await?;
    Ok(())
}
