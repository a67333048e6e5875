//! Журнал изменений остатков SKU

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sku_stock_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub sku_ref: String,
    pub vtex_sku_id: i64,
    pub previous_quantity: Option<i64>,
    pub quantity: i64,
    pub source: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
