use crate::entities::{ChapterPolicy, NovelStatus, chapter_entity as chapters};
use crate::models::{ChapterGiftResponse, CommentResponse, ProfileResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NovelQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<NovelStatus>,
    pub is_short: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
    /// 创建该标签的用户名（管理端展示用）
    pub user_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateNovelRequest {
    pub title: String,
    pub description: String,
    pub category_id: Option<i64>,
    pub status: Option<NovelStatus>,
    pub is_free: Option<ChapterPolicy>,
    pub is_short: Option<bool>,
    pub cover_url: Option<String>,
    pub tag_ids: Option<Vec<i64>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateNovelRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub status: Option<NovelStatus>,
    pub is_free: Option<ChapterPolicy>,
    pub is_short: Option<bool>,
    pub published: Option<bool>,
    pub cover_url: Option<String>,
    pub tag_ids: Option<Vec<i64>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NovelSummary {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: NovelStatus,
    pub is_short: bool,
    pub published: bool,
    pub cover_url: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<TagResponse>,
    pub word_count: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Chapter row as listed inside a novel; `policy` is already the
/// effective value (chapter override, else novel default).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChapterSummary {
    pub id: i64,
    pub title: String,
    pub chapter_order: i32,
    pub policy: Option<ChapterPolicy>,
    pub published: bool,
    pub word_count: i64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NovelDetailResponse {
    #[serde(flatten)]
    pub novel: NovelSummary,
    pub author: Option<ProfileResponse>,
    pub chapters: Vec<ChapterSummary>,
    /// 全书最近评论（带章节标题），按时间倒序
    pub comments: Vec<CommentResponse>,
    pub gifts: Vec<ChapterGiftResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpsertChapterRequest {
    pub title: String,
    pub content: String,
    pub is_free: Option<ChapterPolicy>,
    pub published: Option<bool>,
    pub chapter_order: Option<i32>,
    pub quotation: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NovelBrief {
    pub id: i64,
    pub title: String,
    pub user_id: i64,
    pub is_free: Option<ChapterPolicy>,
}

/// Access-gated chapter view. `content` is absent when the caller is
/// paywalled; `paywalled` tells the client to render the upsell instead.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChapterViewResponse {
    pub id: i64,
    pub novel_id: i64,
    pub title: String,
    pub policy: ChapterPolicy,
    pub paywalled: bool,
    pub content: Option<String>,
    pub word_count: i64,
    pub chapter_order: i32,
    pub prev_chapter_id: Option<i64>,
    pub next_chapter_id: Option<i64>,
    pub updated_at: Option<DateTime<Utc>>,
    pub novel: NovelBrief,
}

/// 书架条目。
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookshelfItem {
    pub id: i64,
    pub novel_id: i64,
    pub title: String,
    pub cover_url: Option<String>,
    pub status: NovelStatus,
    pub added_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddBookshelfRequest {
    pub novel_id: i64,
}

impl ChapterSummary {
    pub fn from_model(chapter: &chapters::Model, novel_default: Option<ChapterPolicy>) -> Self {
        Self {
            id: chapter.id,
            title: chapter.title.clone(),
            chapter_order: chapter.chapter_order,
            policy: chapter.is_free.or(novel_default),
            published: chapter.published,
            word_count: chapter.word_count,
            created_at: chapter.created_at,
        }
    }
}
