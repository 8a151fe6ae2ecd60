//! SeaORM Entity for provider_latest_block_reports table
//! One row per chain named in a provider's block report

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "provider_latest_block_reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub block_id: i64,
    pub tx: Option<String>,
    pub provider: String,
    #[sea_orm(column_type = "TimestampWithTimeZone")]
    pub timestamp: DateTimeWithTimeZone,
    pub chain_id: String,
    pub chain_block_height: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
