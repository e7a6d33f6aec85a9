use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How a gift is offered on the reader side: `must` is always shown,
/// `random` rotates in, `negative` is the jokey downvote variant.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "gift_type")]
#[serde(rename_all = "snake_case")]
pub enum GiftType {
    #[sea_orm(string_value = "must")]
    Must,
    #[sea_orm(string_value = "random")]
    Random,
    #[sea_orm(string_value = "negative")]
    Negative,
}

impl std::fmt::Display for GiftType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GiftType::Must => write!(f, "must"),
            GiftType::Random => write!(f, "random"),
            GiftType::Negative => write!(f, "negative"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "gifts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub gift_type: GiftType,
    pub price: i64,
    pub price_cn: i64,
    pub icon_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
