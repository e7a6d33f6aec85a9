use crate::entities::{
    GiftPaymentStatus, GiftType, chapter_gift_entity as chapter_gifts, gift_entity as gifts,
};
use crate::external::PaymentMethod;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GiftResponse {
    pub id: i64,
    pub name: String,
    pub gift_type: GiftType,
    pub price: i64,
    pub price_cn: i64,
    pub icon_url: Option<String>,
}

impl From<gifts::Model> for GiftResponse {
    fn from(g: gifts::Model) -> Self {
        Self {
            id: g.id,
            name: g.name,
            gift_type: g.gift_type,
            price: g.price,
            price_cn: g.price_cn,
            icon_url: g.icon_url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChapterGiftResponse {
    pub id: i64,
    pub user_id: i64,
    pub novel_id: i64,
    pub chapter_id: i64,
    pub gift_id: i64,
    pub payment_status: GiftPaymentStatus,
    pub payment_method: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<chapter_gifts::Model> for ChapterGiftResponse {
    fn from(cg: chapter_gifts::Model) -> Self {
        Self {
            id: cg.id,
            user_id: cg.user_id,
            novel_id: cg.novel_id,
            chapter_id: cg.chapter_id,
            gift_id: cg.gift_id,
            payment_status: cg.payment_status,
            payment_method: cg.payment_method,
            paid_at: cg.paid_at,
            created_at: cg.created_at,
        }
    }
}

/// 为打赏创建/更新支付意图。
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GiftIntentRequest {
    pub gift_id: i64,
    pub novel_id: i64,
    pub chapter_id: i64,
    pub payment_method: PaymentMethod,
    pub client_secret: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GiftIntentResponse {
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
}

/// 记录打赏（创建或刷新 pending 购买记录）。
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendGiftRequest {
    pub gift_id: i64,
    pub payment_method: PaymentMethod,
    pub client_secret: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConfirmGiftPaymentRequest {
    pub chapter_gift_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConfirmGiftPaymentResponse {
    pub status: GiftPaymentStatus,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChapterGiftListResponse {
    pub gifts: Vec<GiftResponse>,
    pub chapter_gifts: Vec<ChapterGiftResponse>,
}
