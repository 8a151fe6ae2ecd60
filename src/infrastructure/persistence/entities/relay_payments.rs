//! SeaORM Entity for relay_payments table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "relay_payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub block_id: i64,
    pub tx: Option<String>,
    pub provider: String,
    pub consumer: String,
    pub spec_id: String,
    pub cu: i64,
    pub pay: i64,
    pub relays: Option<i64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub qos_availability: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub qos_latency: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub qos_sync: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub qos_availability_exc: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub qos_latency_exc: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub qos_sync_exc: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
