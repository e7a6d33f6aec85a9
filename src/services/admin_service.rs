use crate::entities::{
    novel_tag_entity as novel_tags, tag_entity as tags, user_membership_entity as memberships,
    user_profile_entity as profiles,
};
use crate::error::{AppError, AppResult};
use crate::models::{AdminUserRow, MembershipResponse, ProfileResponse, TagResponse};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use std::collections::HashMap;

#[derive(Clone)]
pub struct AdminService {
    pool: DatabaseConnection,
}

impl AdminService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// All profiles, newest first, each with its membership rows.
    pub async fn list_users(&self) -> AppResult<Vec<AdminUserRow>> {
        let profile_rows = profiles::Entity::find()
            .order_by_desc(profiles::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        let user_ids: Vec<i64> = profile_rows.iter().map(|p| p.user_id).collect();
        let membership_rows = memberships::Entity::find()
            .filter(memberships::Column::UserId.is_in(user_ids))
            .order_by_desc(memberships::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        let mut by_user: HashMap<i64, Vec<MembershipResponse>> = HashMap::new();
        for m in membership_rows {
            by_user
                .entry(m.user_id)
                .or_default()
                .push(MembershipResponse::from(m));
        }

        Ok(profile_rows
            .into_iter()
            .map(|p| AdminUserRow {
                ip: p.ip.clone(),
                memberships: by_user.remove(&p.user_id).unwrap_or_default(),
                profile: ProfileResponse::from(p),
            })
            .collect())
    }

    /// Flip the approval flag, used for author applications.
    pub async fn approve_profile(&self, profile_id: i64) -> AppResult<ProfileResponse> {
        let profile = profiles::Entity::find_by_id(profile_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

        let mut am = profile.into_active_model();
        am.approved = Set(true);
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;
        Ok(ProfileResponse::from(updated))
    }

    pub async fn list_tags(&self) -> AppResult<Vec<TagResponse>> {
        let tag_rows = tags::Entity::find()
            .order_by_asc(tags::Column::Name)
            .all(&self.pool)
            .await?;

        let creator_ids: Vec<i64> = tag_rows.iter().filter_map(|t| t.user_id).collect();
        let names: HashMap<i64, String> = profiles::Entity::find()
            .filter(profiles::Column::UserId.is_in(creator_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|p| (p.user_id, p.user_name))
            .collect();

        Ok(tag_rows
            .into_iter()
            .map(|t| TagResponse {
                user_name: t.user_id.and_then(|id| names.get(&id).cloned()),
                id: t.id,
                name: t.name,
            })
            .collect())
    }

    pub async fn create_tag(&self, user_id: i64, name: &str) -> AppResult<TagResponse> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError("Tag name is required".to_string()));
        }
        let existing = tags::Entity::find()
            .filter(tags::Column::Name.eq(name))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::ValidationError(format!(
                "Tag '{name}' already exists"
            )));
        }

        let inserted = tags::ActiveModel {
            name: Set(name.to_string()),
            user_id: Set(Some(user_id)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(TagResponse {
            id: inserted.id,
            name: inserted.name,
            user_name: None,
        })
    }

    /// Link rows go first so the tag never dangles from novel_tags.
    pub async fn delete_tag(&self, tag_id: i64) -> AppResult<()> {
        tags::Entity::find_by_id(tag_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Tag not found".to_string()))?;

        novel_tags::Entity::delete_many()
            .filter(novel_tags::Column::TagId.eq(tag_id))
            .exec(&self.pool)
            .await?;
        tags::Entity::delete_by_id(tag_id).exec(&self.pool).await?;
        Ok(())
    }
}
