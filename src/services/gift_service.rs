use crate::entities::{
    GiftPaymentStatus, chapter_entity as chapters, chapter_gift_entity as chapter_gifts,
    gift_entity as gifts, novel_entity as novels,
};
use crate::error::{AppError, AppResult};
use crate::models::{ChapterGiftListResponse, ChapterGiftResponse, GiftResponse, SendGiftRequest};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

#[derive(Clone)]
pub struct GiftService {
    pool: DatabaseConnection,
}

impl GiftService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_gifts(&self) -> AppResult<Vec<GiftResponse>> {
        let rows = gifts::Entity::find()
            .order_by_desc(gifts::Column::UpdatedAt)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(GiftResponse::from).collect())
    }

    /// Catalog plus this chapter's purchase records, for the gift panel.
    pub async fn chapter_gift_list(
        &self,
        novel_id: i64,
        chapter_id: i64,
    ) -> AppResult<ChapterGiftListResponse> {
        let catalog = self.list_gifts().await?;
        let records = chapter_gifts::Entity::find()
            .filter(chapter_gifts::Column::NovelId.eq(novel_id))
            .filter(chapter_gifts::Column::ChapterId.eq(chapter_id))
            .order_by_desc(chapter_gifts::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(ChapterGiftListResponse {
            gifts: catalog,
            chapter_gifts: records.into_iter().map(ChapterGiftResponse::from).collect(),
        })
    }

    /// Create or refresh the pending purchase record for this checkout.
    /// The row is keyed by (user, chapter, client secret) so a retried or
    /// re-methoded payment updates in place instead of duplicating.
    pub async fn send_gift(
        &self,
        user_id: i64,
        novel_id: i64,
        chapter_id: i64,
        req: SendGiftRequest,
    ) -> AppResult<ChapterGiftResponse> {
        gifts::Entity::find_by_id(req.gift_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Gift {} not found", req.gift_id)))?;
        novels::Entity::find_by_id(novel_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Novel {novel_id} not found")))?;
        chapters::Entity::find_by_id(chapter_id)
            .filter(chapters::Column::NovelId.eq(novel_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Chapter {chapter_id} not found")))?;

        let existing = match req.client_secret.as_deref() {
            Some(secret) => {
                chapter_gifts::Entity::find()
                    .filter(chapter_gifts::Column::UserId.eq(user_id))
                    .filter(chapter_gifts::Column::ChapterId.eq(chapter_id))
                    .filter(chapter_gifts::Column::StripeClientSecret.eq(secret))
                    .one(&self.pool)
                    .await?
            }
            None => None,
        };

        let row = match existing {
            Some(record) => {
                let mut am = record.into_active_model();
                am.gift_id = Set(req.gift_id);
                am.payment_method = Set(Some(req.payment_method.to_string()));
                am.payment_status = Set(GiftPaymentStatus::Pending);
                am.paid_at = Set(None);
                am.updated_at = Set(Some(Utc::now()));
                am.update(&self.pool).await?
            }
            None => {
                chapter_gifts::ActiveModel {
                    user_id: Set(user_id),
                    novel_id: Set(novel_id),
                    chapter_id: Set(chapter_id),
                    gift_id: Set(req.gift_id),
                    payment_status: Set(GiftPaymentStatus::Pending),
                    payment_method: Set(Some(req.payment_method.to_string())),
                    stripe_client_secret: Set(req.client_secret.clone()),
                    ..Default::default()
                }
                .insert(&self.pool)
                .await?
            }
        };

        Ok(ChapterGiftResponse::from(row))
    }
}
