use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReadingFilter {
    User,
    Novel,
    Author,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadingStatsQuery {
    /// "YYYY-MM"
    pub month: String,
    pub filter: ReadingFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ReadingStatEntry {
    pub name: String,
    pub total_time: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordReadingRequest {
    pub novel_id: i64,
    /// 本次阅读时长（秒）
    pub seconds: i64,
}
