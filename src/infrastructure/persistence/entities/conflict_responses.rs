//! SeaORM Entity for conflict_responses table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "conflict_responses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub block_id: i64,
    pub tx: Option<String>,
    pub consumer: String,
    pub spec_id: String,
    pub vote_id: String,
    pub api_interface: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub api_url: Option<String>,
    pub connection_type: Option<String>,
    pub request_block: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub request_data: Option<String>,
    pub vote_deadline: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
