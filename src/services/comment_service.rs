use crate::entities::{
    chapter_comment_entity as comments, chapter_entity as chapters, user_profile_entity as profiles,
};
use crate::error::{AppError, AppResult};
use crate::models::{CommentResponse, CreateCommentRequest, UpdateCommentRequest};
use crate::services::aggregator;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use std::collections::HashMap;

const MAX_COMMENT_LEN: usize = 1000;

#[derive(Clone)]
pub struct CommentService {
    pool: DatabaseConnection,
}

impl CommentService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    fn validate_content(content: &str) -> AppResult<String> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(AppError::ValidationError(
                "Comment content is required".to_string(),
            ));
        }
        if trimmed.chars().count() > MAX_COMMENT_LEN {
            return Err(AppError::ValidationError(format!(
                "Comment content too long (max {MAX_COMMENT_LEN} characters)"
            )));
        }
        Ok(trimmed.to_string())
    }

    async fn to_response(&self, row: comments::Model) -> AppResult<CommentResponse> {
        let user_name = profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(row.user_id))
            .one(&self.pool)
            .await?
            .map(|p| p.user_name)
            .unwrap_or_default();
        Ok(CommentResponse {
            id: row.id,
            content: row.content,
            parent_id: row.parent_id,
            user_id: row.user_id,
            user_name,
            chapter_title: None,
            created_at: row.created_at,
            updated_at: row.updated_at,
            replies: Vec::new(),
        })
    }

    /// Nested comment tree for one chapter, chronological within each
    /// level.
    pub async fn list_comments(&self, chapter_id: i64) -> AppResult<Vec<CommentResponse>> {
        let rows = comments::Entity::find()
            .filter(comments::Column::ChapterId.eq(chapter_id))
            .order_by_asc(comments::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        let user_ids: Vec<i64> = rows.iter().map(|c| c.user_id).collect();
        let names: HashMap<i64, String> = profiles::Entity::find()
            .filter(profiles::Column::UserId.is_in(user_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|p| (p.user_id, p.user_name))
            .collect();

        let flat: Vec<CommentResponse> = rows
            .into_iter()
            .map(|c| CommentResponse {
                id: c.id,
                content: c.content,
                parent_id: c.parent_id,
                user_id: c.user_id,
                user_name: names.get(&c.user_id).cloned().unwrap_or_default(),
                chapter_title: None,
                created_at: c.created_at,
                updated_at: c.updated_at,
                replies: Vec::new(),
            })
            .collect();

        Ok(aggregator::build_comment_tree(flat))
    }

    pub async fn create_comment(
        &self,
        user_id: i64,
        chapter_id: i64,
        req: CreateCommentRequest,
    ) -> AppResult<CommentResponse> {
        let content = Self::validate_content(&req.content)?;

        chapters::Entity::find_by_id(chapter_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Chapter not found".to_string()))?;

        // 回复必须挂在同一章节下已存在的评论上
        if let Some(parent_id) = req.parent_id {
            comments::Entity::find_by_id(parent_id)
                .filter(comments::Column::ChapterId.eq(chapter_id))
                .one(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Parent comment not found".to_string()))?;
        }

        let inserted = comments::ActiveModel {
            chapter_id: Set(chapter_id),
            user_id: Set(user_id),
            parent_id: Set(req.parent_id),
            content: Set(content),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.to_response(inserted).await
    }

    pub async fn update_comment(
        &self,
        user_id: i64,
        comment_id: i64,
        req: UpdateCommentRequest,
    ) -> AppResult<CommentResponse> {
        let content = Self::validate_content(&req.content)?;

        let comment = comments::Entity::find_by_id(comment_id)
            .filter(comments::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        let mut am = comment.into_active_model();
        am.content = Set(content);
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;

        self.to_response(updated).await
    }

    pub async fn delete_comment(&self, user_id: i64, comment_id: i64) -> AppResult<()> {
        let comment = comments::Entity::find_by_id(comment_id)
            .filter(comments::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        comments::Entity::delete_by_id(comment.id)
            .exec(&self.pool)
            .await?;
        Ok(())
    }
}
