use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Accumulated reading seconds per (user, novel, month). `month` is the
/// "YYYY-MM" bucket key the aggregation endpoints filter on.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "reading_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub novel_id: i64,
    pub month: String,
    pub reading_time: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
