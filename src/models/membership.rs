use crate::entities::{
    MembershipStatus, membership_plan_entity as plans, user_membership_entity as memberships,
};
use crate::external::PaymentMethod;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MembershipPlanResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// 美元整数价
    pub price: i64,
    /// 人民币整数价
    pub price_cn: i64,
    /// 时长（月）
    pub duration: i32,
    pub features: Vec<String>,
}

impl From<plans::Model> for MembershipPlanResponse {
    fn from(p: plans::Model) -> Self {
        let features = p
            .features
            .and_then(|v| serde_json::from_value::<Vec<String>>(v).ok())
            .unwrap_or_default();
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            price_cn: p.price_cn,
            duration: p.duration,
            features,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MembershipResponse {
    pub id: i64,
    pub plan_id: i64,
    pub status: MembershipStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl From<memberships::Model> for MembershipResponse {
    fn from(m: memberships::Model) -> Self {
        Self {
            id: m.id,
            plan_id: m.plan_id,
            status: m.status,
            start_date: m.start_date,
            end_date: m.end_date,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateMembershipIntentRequest {
    pub plan_id: i64,
    pub payment_method: PaymentMethod,
    /// 换支付方式重试时带上已有的 client secret，原支付意图原地更新
    pub client_secret: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateMembershipIntentResponse {
    pub user_membership_id: i64,
    pub client_secret: String,
    /// minor units
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConfirmPaymentRequest {
    pub user_membership_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConfirmPaymentResponse {
    /// "active" once the processor reports success, otherwise "pending"
    pub status: MembershipStatus,
    pub plan_name: String,
    pub end_date: Option<DateTime<Utc>>,
}
