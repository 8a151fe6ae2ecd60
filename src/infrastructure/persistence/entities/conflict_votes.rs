//! SeaORM Entity for conflict_votes table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "conflict_votes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub block_id: i64,
    pub tx: Option<String>,
    pub vote_id: String,
    pub provider: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
