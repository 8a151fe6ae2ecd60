//! SeaORM Entity for events table
//! Provider and conflict events share this table; `event_type` says how to read the slots

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub block_id: i64,
    pub tx: Option<String>,
    pub event_type: i32,
    pub provider: Option<String>,
    pub consumer: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub t1: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub t2: Option<String>,
    pub i1: Option<i64>,
    pub i2: Option<i64>,
    pub b1: Option<i64>,
    pub b2: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
