use crate::entities::{
    bookshelf_entity as bookshelves, novel_entity as novels, user_profile_entity as profiles,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    BookshelfItem, CurrentUserResponse, MembershipResponse, ProfileResponse, UpdateProfileRequest,
};
use crate::services::EntitlementService;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use std::collections::HashMap;

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
    entitlement_service: EntitlementService,
}

impl UserService {
    pub fn new(pool: DatabaseConnection, entitlement_service: EntitlementService) -> Self {
        Self {
            pool,
            entitlement_service,
        }
    }

    /// Profile plus the current membership, the payload behind `GET /user`.
    pub async fn current_user(&self, user_id: i64) -> AppResult<CurrentUserResponse> {
        let profile = profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User profile not found".to_string()))?;

        let record = self.entitlement_service.evaluate(user_id).await?;

        Ok(CurrentUserResponse {
            user: ProfileResponse::from(profile),
            membership: record.membership.map(MembershipResponse::from),
            is_membership_active: record.is_membership_active,
        })
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        req: UpdateProfileRequest,
    ) -> AppResult<ProfileResponse> {
        if req.user_name.is_none() && req.pen_name.is_none() {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }
        if let Some(user_name) = &req.user_name {
            let len = user_name.trim().chars().count();
            if !(2..=20).contains(&len) {
                return Err(AppError::ValidationError(
                    "User name must be 2-20 characters".to_string(),
                ));
            }
        }

        let profile = profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User profile not found".to_string()))?;

        let mut am = profile.into_active_model();
        if let Some(user_name) = req.user_name {
            am.user_name = Set(user_name.trim().to_string());
        }
        if let Some(pen_name) = req.pen_name {
            am.pen_name = Set(Some(pen_name.trim().to_string()));
        }
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;

        Ok(ProfileResponse::from(updated))
    }

    pub async fn list_bookshelf(&self, user_id: i64) -> AppResult<Vec<BookshelfItem>> {
        let rows = bookshelves::Entity::find()
            .filter(bookshelves::Column::UserId.eq(user_id))
            .order_by_desc(bookshelves::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        let novel_ids: Vec<i64> = rows.iter().map(|r| r.novel_id).collect();
        let novel_rows = novels::Entity::find()
            .filter(novels::Column::Id.is_in(novel_ids))
            .all(&self.pool)
            .await?;
        let by_id: HashMap<i64, &novels::Model> = novel_rows.iter().map(|n| (n.id, n)).collect();

        Ok(rows
            .into_iter()
            .filter_map(|r| {
                let novel = by_id.get(&r.novel_id)?;
                Some(BookshelfItem {
                    id: r.id,
                    novel_id: novel.id,
                    title: novel.title.clone(),
                    cover_url: novel.cover_url.clone(),
                    status: novel.status,
                    added_at: r.created_at,
                })
            })
            .collect())
    }

    /// Adding a novel twice is a no-op, matching the unique pair index.
    pub async fn add_to_bookshelf(&self, user_id: i64, novel_id: i64) -> AppResult<()> {
        novels::Entity::find_by_id(novel_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Novel not found".to_string()))?;

        let existing = bookshelves::Entity::find()
            .filter(bookshelves::Column::UserId.eq(user_id))
            .filter(bookshelves::Column::NovelId.eq(novel_id))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        bookshelves::ActiveModel {
            user_id: Set(user_id),
            novel_id: Set(novel_id),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn remove_from_bookshelf(&self, user_id: i64, novel_id: i64) -> AppResult<()> {
        bookshelves::Entity::delete_many()
            .filter(bookshelves::Column::UserId.eq(user_id))
            .filter(bookshelves::Column::NovelId.eq(novel_id))
            .exec(&self.pool)
            .await?;
        Ok(())
    }
}
