use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Free/paid visibility classification, applied per chapter or inherited
/// from the owning novel when the chapter leaves it unset.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "chapter_policy")]
#[serde(rename_all = "snake_case")]
pub enum ChapterPolicy {
    #[sea_orm(string_value = "public")]
    Public,
    #[sea_orm(string_value = "private")]
    Private,
    #[sea_orm(string_value = "vip")]
    Vip,
}

impl std::fmt::Display for ChapterPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChapterPolicy::Public => write!(f, "public"),
            ChapterPolicy::Private => write!(f, "private"),
            ChapterPolicy::Vip => write!(f, "vip"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "chapters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub novel_id: i64,
    pub title: String,
    pub content: String,
    pub is_free: Option<ChapterPolicy>,
    pub published: bool,
    pub chapter_order: i32,
    pub quotation: Option<String>,
    pub word_count: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
