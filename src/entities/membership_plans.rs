use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Admin-managed reference data. `price` is in whole USD, `price_cn` in
/// whole CNY; minor units are derived at intent-creation time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "membership_plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub price_cn: i64,
    pub duration: i32,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub features: Option<Json>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
