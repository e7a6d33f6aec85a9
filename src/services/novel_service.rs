use crate::entities::{
    NovelStatus, category_entity as categories, chapter_comment_entity as comments,
    chapter_entity as chapters, chapter_gift_entity as chapter_gifts, novel_entity as novels,
    novel_tag_entity as novel_tags, reading_record_entity as reading_records, tag_entity as tags,
    user_profile_entity as profiles,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    ChapterGiftResponse, ChapterSummary, ChapterViewResponse, CommentResponse, CreateNovelRequest,
    Entitlement, NovelBrief, NovelDetailResponse, NovelQuery, NovelSummary, PaginatedResponse,
    PaginationParams, ProfileResponse, TagResponse, UpdateNovelRequest, UpsertChapterRequest,
};
use crate::services::access_gate::{Access, effective_policy, evaluate_chapter_access};
use crate::services::aggregator;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;

#[derive(Clone)]
pub struct NovelService {
    pool: DatabaseConnection,
}

impl NovelService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    fn require_owner_or_admin(novel: &novels::Model, entitlement: &Entitlement) -> AppResult<()> {
        if entitlement.is_admin() || entitlement.user_id() == Some(novel.user_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Only the owning author may modify this novel".to_string(),
            ))
        }
    }

    /// Tag rows per novel, batched to keep the listing at a fixed number
    /// of queries.
    async fn tags_by_novel(&self, novel_ids: &[i64]) -> AppResult<HashMap<i64, Vec<TagResponse>>> {
        if novel_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let links = novel_tags::Entity::find()
            .filter(novel_tags::Column::NovelId.is_in(novel_ids.to_vec()))
            .all(&self.pool)
            .await?;
        let tag_ids: Vec<i64> = links.iter().map(|l| l.tag_id).collect();
        let tag_rows = tags::Entity::find()
            .filter(tags::Column::Id.is_in(tag_ids))
            .all(&self.pool)
            .await?;
        let by_id: HashMap<i64, &tags::Model> = tag_rows.iter().map(|t| (t.id, t)).collect();

        let mut result: HashMap<i64, Vec<TagResponse>> = HashMap::new();
        for link in &links {
            if let Some(tag) = by_id.get(&link.tag_id) {
                result.entry(link.novel_id).or_default().push(TagResponse {
                    id: tag.id,
                    name: tag.name.clone(),
                    user_name: None,
                });
            }
        }
        Ok(result)
    }

    async fn category_names(&self, ids: Vec<i64>) -> AppResult<HashMap<i64, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = categories::Entity::find()
            .filter(categories::Column::Id.is_in(ids))
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|c| (c.id, c.name)).collect())
    }

    async fn summarize(&self, rows: Vec<novels::Model>) -> AppResult<Vec<NovelSummary>> {
        let novel_ids: Vec<i64> = rows.iter().map(|n| n.id).collect();
        let mut tags_map = self.tags_by_novel(&novel_ids).await?;
        let category_ids: Vec<i64> = rows.iter().filter_map(|n| n.category_id).collect();
        let category_map = self.category_names(category_ids).await?;

        Ok(rows
            .into_iter()
            .map(|n| NovelSummary {
                category: n.category_id.and_then(|id| category_map.get(&id).cloned()),
                tags: tags_map.remove(&n.id).unwrap_or_default(),
                id: n.id,
                title: n.title,
                description: n.description,
                status: n.status,
                is_short: n.is_short,
                published: n.published,
                cover_url: n.cover_url,
                word_count: n.word_count,
                created_at: n.created_at,
                updated_at: n.updated_at,
            })
            .collect())
    }

    pub async fn list_novels(
        &self,
        query: &NovelQuery,
    ) -> AppResult<PaginatedResponse<NovelSummary>> {
        let mut select = novels::Entity::find()
            .filter(novels::Column::Published.eq(true))
            .order_by_desc(novels::Column::CreatedAt);

        if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
            select = select.filter(novels::Column::Title.contains(search));
        }
        if let Some(status) = query.status {
            select = select.filter(novels::Column::Status.eq(status));
        }
        if let Some(is_short) = query.is_short {
            select = select.filter(novels::Column::IsShort.eq(is_short));
        }
        if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
            let category_row = categories::Entity::find()
                .filter(categories::Column::Name.eq(category))
                .one(&self.pool)
                .await?;
            match category_row {
                Some(c) => select = select.filter(novels::Column::CategoryId.eq(c.id)),
                None => {
                    return Ok(PaginatedResponse::new(
                        Vec::new(),
                        &PaginationParams::new(query.page, query.per_page),
                        0,
                    ));
                }
            }
        }

        let params = PaginationParams::new(query.page, query.per_page);
        let paginator = select.paginate(&self.pool, params.get_limit());
        let total = paginator.num_items().await? as i64;
        let rows = paginator.fetch_page((params.get_page() - 1) as u64).await?;

        let summaries = self.summarize(rows).await?;
        Ok(PaginatedResponse::new(summaries, &params, total))
    }

    /// Novels owned by one author, drafts included.
    pub async fn list_author_novels(&self, author_id: i64) -> AppResult<Vec<NovelSummary>> {
        let rows = novels::Entity::find()
            .filter(novels::Column::UserId.eq(author_id))
            .order_by_desc(novels::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        self.summarize(rows).await
    }

    pub async fn novel_detail(&self, novel_id: i64) -> AppResult<NovelDetailResponse> {
        let novel = novels::Entity::find_by_id(novel_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Novel not found".to_string()))?;

        let author = profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(novel.user_id))
            .one(&self.pool)
            .await?
            .map(ProfileResponse::from);

        let novel_default = novel.is_free;
        let chapter_rows = aggregator::sort_chapters(
            chapters::Entity::find()
                .filter(chapters::Column::NovelId.eq(novel_id))
                .all(&self.pool)
                .await?,
        );
        let chapter_titles: HashMap<i64, String> = chapter_rows
            .iter()
            .map(|c| (c.id, c.title.clone()))
            .collect();
        let chapter_summaries: Vec<ChapterSummary> = chapter_rows
            .iter()
            .map(|c| ChapterSummary::from_model(c, novel_default))
            .collect();

        // 全书评论流：带章节标题，按时间倒序
        let chapter_ids: Vec<i64> = chapter_rows.iter().map(|c| c.id).collect();
        let mut comment_responses: Vec<CommentResponse> = Vec::new();
        if !chapter_ids.is_empty() {
            let comment_rows = comments::Entity::find()
                .filter(comments::Column::ChapterId.is_in(chapter_ids))
                .order_by_asc(comments::Column::CreatedAt)
                .all(&self.pool)
                .await?;
            let user_ids: Vec<i64> = comment_rows.iter().map(|c| c.user_id).collect();
            let names: HashMap<i64, String> = profiles::Entity::find()
                .filter(profiles::Column::UserId.is_in(user_ids))
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|p| (p.user_id, p.user_name))
                .collect();
            comment_responses = comment_rows
                .into_iter()
                .map(|c| CommentResponse {
                    id: c.id,
                    content: c.content,
                    parent_id: c.parent_id,
                    user_id: c.user_id,
                    user_name: names.get(&c.user_id).cloned().unwrap_or_default(),
                    chapter_title: chapter_titles.get(&c.chapter_id).cloned(),
                    created_at: c.created_at,
                    updated_at: c.updated_at,
                    replies: Vec::new(),
                })
                .collect();
            comment_responses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }

        let gift_rows = chapter_gifts::Entity::find()
            .filter(chapter_gifts::Column::NovelId.eq(novel_id))
            .order_by_desc(chapter_gifts::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        let mut summaries = self.summarize(vec![novel]).await?;
        let summary = summaries.remove(0);

        Ok(NovelDetailResponse {
            novel: summary,
            author,
            chapters: chapter_summaries,
            comments: comment_responses,
            gifts: gift_rows.into_iter().map(ChapterGiftResponse::from).collect(),
        })
    }

    pub async fn create_novel(
        &self,
        entitlement: &Entitlement,
        req: CreateNovelRequest,
    ) -> AppResult<NovelSummary> {
        let user_id = entitlement
            .user_id()
            .ok_or_else(|| AppError::AuthError("User not authenticated".to_string()))?;
        if !matches!(
            entitlement,
            Entitlement::Author { .. } | Entitlement::Admin { .. }
        ) {
            return Err(AppError::Forbidden(
                "Only authors may create novels".to_string(),
            ));
        }
        if req.title.trim().is_empty() {
            return Err(AppError::ValidationError("Title is required".to_string()));
        }

        let inserted = novels::ActiveModel {
            user_id: Set(user_id),
            category_id: Set(req.category_id),
            title: Set(req.title.trim().to_string()),
            description: Set(req.description),
            status: Set(req.status.unwrap_or(NovelStatus::Ongoing)),
            is_free: Set(req.is_free),
            is_short: Set(req.is_short.unwrap_or(false)),
            published: Set(false),
            cover_url: Set(req.cover_url),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        if let Some(tag_ids) = req.tag_ids {
            self.replace_novel_tags(inserted.id, tag_ids).await?;
        }

        let mut summaries = self.summarize(vec![inserted]).await?;
        Ok(summaries.remove(0))
    }

    async fn replace_novel_tags(&self, novel_id: i64, tag_ids: Vec<i64>) -> AppResult<()> {
        novel_tags::Entity::delete_many()
            .filter(novel_tags::Column::NovelId.eq(novel_id))
            .exec(&self.pool)
            .await?;
        for tag_id in tag_ids {
            novel_tags::ActiveModel {
                novel_id: Set(novel_id),
                tag_id: Set(tag_id),
                ..Default::default()
            }
            .insert(&self.pool)
            .await?;
        }
        Ok(())
    }

    pub async fn update_novel(
        &self,
        entitlement: &Entitlement,
        novel_id: i64,
        req: UpdateNovelRequest,
    ) -> AppResult<NovelSummary> {
        let novel = novels::Entity::find_by_id(novel_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Novel not found".to_string()))?;
        Self::require_owner_or_admin(&novel, entitlement)?;

        let mut am = novel.into_active_model();
        if let Some(title) = req.title {
            if title.trim().is_empty() {
                return Err(AppError::ValidationError("Title is required".to_string()));
            }
            am.title = Set(title.trim().to_string());
        }
        if let Some(description) = req.description {
            am.description = Set(description);
        }
        if let Some(category_id) = req.category_id {
            am.category_id = Set(Some(category_id));
        }
        if let Some(status) = req.status {
            am.status = Set(status);
        }
        if let Some(is_free) = req.is_free {
            am.is_free = Set(Some(is_free));
        }
        if let Some(is_short) = req.is_short {
            am.is_short = Set(is_short);
        }
        if let Some(published) = req.published {
            am.published = Set(published);
        }
        if let Some(cover_url) = req.cover_url {
            am.cover_url = Set(Some(cover_url));
        }
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;

        if let Some(tag_ids) = req.tag_ids {
            self.replace_novel_tags(novel_id, tag_ids).await?;
        }

        let mut summaries = self.summarize(vec![updated]).await?;
        Ok(summaries.remove(0))
    }

    /// Reading records go first, then chapters, then the novel row itself.
    pub async fn delete_novel(&self, entitlement: &Entitlement, novel_id: i64) -> AppResult<()> {
        let novel = novels::Entity::find_by_id(novel_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Novel not found".to_string()))?;
        Self::require_owner_or_admin(&novel, entitlement)?;

        reading_records::Entity::delete_many()
            .filter(reading_records::Column::NovelId.eq(novel_id))
            .exec(&self.pool)
            .await?;
        chapters::Entity::delete_many()
            .filter(chapters::Column::NovelId.eq(novel_id))
            .exec(&self.pool)
            .await?;
        novels::Entity::delete_by_id(novel_id).exec(&self.pool).await?;
        Ok(())
    }

    /// Access-gated chapter read: full content, metadata-with-paywall, or
    /// 403 — decided per chapter, never per novel.
    pub async fn chapter_view(
        &self,
        novel_id: i64,
        chapter_id: i64,
        entitlement: &Entitlement,
    ) -> AppResult<ChapterViewResponse> {
        let chapter = chapters::Entity::find_by_id(chapter_id)
            .filter(chapters::Column::NovelId.eq(novel_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Chapter not found".to_string()))?;
        let novel = novels::Entity::find_by_id(novel_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Novel not found".to_string()))?;

        let policy = effective_policy(chapter.is_free, novel.is_free);
        let published = chapter.published && novel.published;
        let access = evaluate_chapter_access(policy, published, novel.user_id, entitlement);

        let (content, paywalled) = match access {
            Access::Full => (
                Some(aggregator::scrub_inline_styles(&chapter.content)),
                false,
            ),
            Access::Paywalled => (None, true),
            Access::Denied => {
                return Err(AppError::Forbidden(
                    "This chapter is not available to you".to_string(),
                ));
            }
        };

        // prev/next by chapter_order among siblings
        let siblings = aggregator::sort_chapters(
            chapters::Entity::find()
                .filter(chapters::Column::NovelId.eq(novel_id))
                .all(&self.pool)
                .await?,
        );
        let index = siblings.iter().position(|c| c.id == chapter_id);
        let prev_chapter_id =
            index.and_then(|i| i.checked_sub(1)).map(|i| siblings[i].id);
        let next_chapter_id = index
            .map(|i| i + 1)
            .filter(|&i| i < siblings.len())
            .map(|i| siblings[i].id);

        Ok(ChapterViewResponse {
            id: chapter.id,
            novel_id,
            title: chapter.title,
            policy,
            paywalled,
            content,
            word_count: chapter.word_count,
            chapter_order: chapter.chapter_order,
            prev_chapter_id,
            next_chapter_id,
            updated_at: chapter.updated_at,
            novel: NovelBrief {
                id: novel.id,
                title: novel.title,
                user_id: novel.user_id,
                is_free: novel.is_free,
            },
        })
    }

    pub async fn create_chapter(
        &self,
        entitlement: &Entitlement,
        novel_id: i64,
        req: UpsertChapterRequest,
    ) -> AppResult<ChapterSummary> {
        let novel = novels::Entity::find_by_id(novel_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Novel not found".to_string()))?;
        Self::require_owner_or_admin(&novel, entitlement)?;
        if req.title.trim().is_empty() {
            return Err(AppError::ValidationError("Title is required".to_string()));
        }

        let chapter_order = match req.chapter_order {
            Some(order) => order,
            None => {
                // append after the current last chapter
                let last = chapters::Entity::find()
                    .filter(chapters::Column::NovelId.eq(novel_id))
                    .order_by_desc(chapters::Column::ChapterOrder)
                    .one(&self.pool)
                    .await?;
                last.map(|c| c.chapter_order + 1).unwrap_or(1)
            }
        };

        let word_count = aggregator::word_count(&req.content);
        let inserted = chapters::ActiveModel {
            novel_id: Set(novel_id),
            title: Set(req.title.trim().to_string()),
            content: Set(req.content),
            is_free: Set(req.is_free),
            published: Set(req.published.unwrap_or(true)),
            chapter_order: Set(chapter_order),
            quotation: Set(req.quotation),
            word_count: Set(word_count),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(ChapterSummary::from_model(&inserted, novel.is_free))
    }

    pub async fn update_chapter(
        &self,
        entitlement: &Entitlement,
        novel_id: i64,
        chapter_id: i64,
        req: UpsertChapterRequest,
    ) -> AppResult<ChapterSummary> {
        let novel = novels::Entity::find_by_id(novel_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Novel not found".to_string()))?;
        Self::require_owner_or_admin(&novel, entitlement)?;

        let chapter = chapters::Entity::find_by_id(chapter_id)
            .filter(chapters::Column::NovelId.eq(novel_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Chapter not found".to_string()))?;

        let word_count = aggregator::word_count(&req.content);
        let mut am = chapter.into_active_model();
        am.title = Set(req.title.trim().to_string());
        am.content = Set(req.content);
        am.is_free = Set(req.is_free);
        if let Some(published) = req.published {
            am.published = Set(published);
        }
        if let Some(order) = req.chapter_order {
            am.chapter_order = Set(order);
        }
        if req.quotation.is_some() {
            am.quotation = Set(req.quotation);
        }
        am.word_count = Set(word_count);
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;

        Ok(ChapterSummary::from_model(&updated, novel.is_free))
    }

    /// Recompute per-chapter character counts and per-novel totals.
    /// Invoked from the background sweep and the admin refresh endpoint.
    pub async fn update_word_counts(&self) -> AppResult<(u64, u64)> {
        let chapter_rows = chapters::Entity::find().all(&self.pool).await?;
        let mut chapters_updated = 0u64;
        for chapter in chapter_rows {
            let count = aggregator::word_count(&chapter.content);
            if count != chapter.word_count {
                let mut am = chapter.into_active_model();
                am.word_count = Set(count);
                am.update(&self.pool).await?;
                chapters_updated += 1;
            }
        }

        let novel_rows = novels::Entity::find().all(&self.pool).await?;
        let mut novels_updated = 0u64;
        for novel in novel_rows {
            #[derive(Debug, sea_orm::FromQueryResult)]
            struct SumRow {
                total: Option<i64>,
            }
            let total = chapters::Entity::find()
                .filter(chapters::Column::NovelId.eq(novel.id))
                .select_only()
                .column_as(Expr::col(chapters::Column::WordCount).sum(), "total")
                .into_model::<SumRow>()
                .one(&self.pool)
                .await?
                .and_then(|r| r.total)
                .unwrap_or(0);
            if total != novel.word_count {
                let mut am = novel.into_active_model();
                am.word_count = Set(total);
                am.update(&self.pool).await?;
                novels_updated += 1;
            }
        }

        Ok((chapters_updated, novels_updated))
    }
}
