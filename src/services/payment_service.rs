use crate::entities::{
    MembershipStatus, chapter_entity as chapters, gift_entity as gifts,
    membership_plan_entity as plans, novel_entity as novels, user_membership_entity as memberships,
};
use crate::error::{AppError, AppResult};
use crate::external::{PaymentMethod, StripeService, intent_id_from_client_secret};
use crate::models::{
    CreateMembershipIntentRequest, CreateMembershipIntentResponse, GiftIntentRequest,
    GiftIntentResponse, Identity,
};
use crate::services::reconcile_service::membership_end_date;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use std::collections::HashMap;

/// What is being bought; picks the sandbox override amount for admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseKind {
    Membership,
    Gift,
}

/// Price in minor units for a purchase. Prices always come from stored
/// reference data; `card` charges the USD figure, wallet methods the CNY
/// one. Admin callers get a fixed nominal amount so test-mode charges on
/// the live catalog stay harmless.
pub fn resolve_amount(
    kind: PurchaseKind,
    price: i64,
    price_cn: i64,
    method: PaymentMethod,
    is_admin: bool,
) -> i64 {
    if is_admin {
        return match kind {
            PurchaseKind::Membership => 1000,
            PurchaseKind::Gift => 300,
        };
    }
    match method {
        PaymentMethod::Card => price * 100,
        _ => price_cn * 100,
    }
}

/// Creates or updates processor payment intents for a purchase target and
/// keeps the matching pending record in step.
#[derive(Clone)]
pub struct PaymentService {
    pool: DatabaseConnection,
    stripe_service: StripeService,
}

impl PaymentService {
    pub fn new(pool: DatabaseConnection, stripe_service: StripeService) -> Self {
        Self {
            pool,
            stripe_service,
        }
    }

    pub async fn list_plans(&self) -> AppResult<Vec<crate::models::MembershipPlanResponse>> {
        let rows = plans::Entity::find()
            .order_by_asc(plans::Column::Price)
            .all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(crate::models::MembershipPlanResponse::from)
            .collect())
    }

    pub async fn create_membership_intent(
        &self,
        identity: &Identity,
        req: CreateMembershipIntentRequest,
    ) -> AppResult<CreateMembershipIntentResponse> {
        let user_id = identity
            .user_id
            .ok_or_else(|| AppError::AuthError("User not authenticated".to_string()))?;

        let plan = plans::Entity::find_by_id(req.plan_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Plan not found".to_string()))?;

        let amount = resolve_amount(
            PurchaseKind::Membership,
            plan.price,
            plan.price_cn,
            req.payment_method,
            identity.is_admin,
        );

        let mut metadata = HashMap::new();
        metadata.insert("user_id".to_string(), user_id.to_string());
        metadata.insert("plan_id".to_string(), plan.id.to_string());

        // 换支付方式时复用已有 intent，避免同一笔购买产生多个意图
        let intent = if let Some(existing_secret) = req.client_secret.as_deref() {
            let intent_id = intent_id_from_client_secret(existing_secret)?;
            self.stripe_service
                .update_payment_intent(&intent_id, amount, req.payment_method, metadata)
                .await?
        } else {
            self.stripe_service
                .create_payment_intent(
                    amount,
                    req.payment_method,
                    metadata,
                    Some(&format!("User {user_id} subscribes plan {}", plan.name)),
                )
                .await?
        };

        let client_secret = intent.client_secret.clone().ok_or_else(|| {
            AppError::PaymentError("payment intent carries no client secret".to_string())
        })?;

        let now = Utc::now();
        let provisional_end = membership_end_date(now, plan.duration);

        // one pending record per checkout, found again by its client secret
        let existing = memberships::Entity::find()
            .filter(memberships::Column::UserId.eq(user_id))
            .filter(memberships::Column::StripeClientSecret.eq(client_secret.clone()))
            .order_by_desc(memberships::Column::CreatedAt)
            .one(&self.pool)
            .await?;

        let membership_id = match existing {
            Some(row) if row.status == MembershipStatus::Pending => {
                let id = row.id;
                let mut am = row.into_active_model();
                am.plan_id = Set(plan.id);
                am.start_date = Set(now);
                am.end_date = Set(provisional_end);
                am.updated_at = Set(Some(now));
                am.update(&self.pool).await?;
                id
            }
            Some(row) => row.id, // already confirmed; leave it alone
            None => {
                let inserted = memberships::ActiveModel {
                    user_id: Set(user_id),
                    plan_id: Set(plan.id),
                    status: Set(MembershipStatus::Pending),
                    start_date: Set(now),
                    end_date: Set(provisional_end),
                    stripe_client_secret: Set(Some(client_secret.clone())),
                    ..Default::default()
                }
                .insert(&self.pool)
                .await?;
                inserted.id
            }
        };

        Ok(CreateMembershipIntentResponse {
            user_membership_id: membership_id,
            client_secret,
            amount,
            currency: req.payment_method.currency().to_string(),
        })
    }

    pub async fn create_gift_intent(
        &self,
        identity: &Identity,
        req: GiftIntentRequest,
    ) -> AppResult<GiftIntentResponse> {
        let user_id = identity
            .user_id
            .ok_or_else(|| AppError::AuthError("User not authenticated".to_string()))?;

        let gift = gifts::Entity::find_by_id(req.gift_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Gift {} not found", req.gift_id)))?;
        novels::Entity::find_by_id(req.novel_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Novel {} not found", req.novel_id)))?;
        chapters::Entity::find_by_id(req.chapter_id)
            .filter(chapters::Column::NovelId.eq(req.novel_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Chapter {} not found", req.chapter_id)))?;

        let amount = resolve_amount(
            PurchaseKind::Gift,
            gift.price,
            gift.price_cn,
            req.payment_method,
            identity.is_admin,
        );

        let mut metadata = HashMap::new();
        metadata.insert("user_id".to_string(), user_id.to_string());
        metadata.insert("gift_id".to_string(), gift.id.to_string());
        metadata.insert("novel_id".to_string(), req.novel_id.to_string());
        metadata.insert("chapter_id".to_string(), req.chapter_id.to_string());

        let intent = if let Some(existing_secret) = req.client_secret.as_deref() {
            let intent_id = intent_id_from_client_secret(existing_secret)?;
            self.stripe_service
                .update_payment_intent(&intent_id, amount, req.payment_method, metadata)
                .await?
        } else {
            self.stripe_service
                .create_payment_intent(
                    amount,
                    req.payment_method,
                    metadata,
                    Some(&format!("User {user_id} sends gift {}", gift.name)),
                )
                .await?
        };

        let client_secret = intent.client_secret.clone().ok_or_else(|| {
            AppError::PaymentError("payment intent carries no client secret".to_string())
        })?;

        Ok(GiftIntentResponse {
            client_secret,
            amount,
            currency: req.payment_method.currency().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_charges_usd_minor_units() {
        let amount = resolve_amount(PurchaseKind::Membership, 10, 70, PaymentMethod::Card, false);
        assert_eq!(amount, 1000);
    }

    #[test]
    fn test_wallet_methods_charge_cny_minor_units() {
        let amount = resolve_amount(PurchaseKind::Membership, 10, 70, PaymentMethod::Alipay, false);
        assert_eq!(amount, 7000);
        let amount = resolve_amount(PurchaseKind::Gift, 5, 35, PaymentMethod::WechatPay, false);
        assert_eq!(amount, 3500);
    }

    #[test]
    fn test_admin_gets_fixed_sandbox_amounts() {
        for method in [PaymentMethod::Card, PaymentMethod::Alipay] {
            assert_eq!(
                resolve_amount(PurchaseKind::Membership, 999, 9999, method, true),
                1000
            );
            assert_eq!(resolve_amount(PurchaseKind::Gift, 999, 9999, method, true), 300);
        }
    }
}
