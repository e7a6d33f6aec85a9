use crate::entities::{
    GiftPaymentStatus, MembershipStatus, chapter_gift_entity as chapter_gifts,
    membership_plan_entity as plans, user_membership_entity as memberships,
    user_profile_entity as profiles,
};
use crate::error::{AppError, AppResult};
use crate::external::{AdminNotification, EmailService, StripeService, intent_id_from_client_secret};
use crate::models::{ConfirmGiftPaymentResponse, ConfirmPaymentResponse};
use chrono::{DateTime, Duration, Months, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set, TransactionTrait,
};
use stripe::{Currency, PaymentIntentStatus};

/// Validity window end for a plan bought now. Month arithmetic clamps to
/// the last day of shorter months (Jan 31 + 1 month = Feb 28/29).
pub fn membership_end_date(from: DateTime<Utc>, duration_months: i32) -> DateTime<Utc> {
    from.checked_add_months(Months::new(duration_months.max(0) as u32))
        .unwrap_or_else(|| from + Duration::days(30 * duration_months.max(0) as i64))
}

/// Confirms that a previously created payment intent reached `succeeded`
/// and transactionally activates the matching entitlement record.
///
/// The state machine per record is `pending → active/paid`; an intent
/// that has not succeeded leaves the record untouched and the caller may
/// poll again. Re-confirming an already-active record is a no-op.
#[derive(Clone)]
pub struct ReconcileService {
    pool: DatabaseConnection,
    stripe_service: StripeService,
    email_service: EmailService,
}

impl ReconcileService {
    pub fn new(
        pool: DatabaseConnection,
        stripe_service: StripeService,
        email_service: EmailService,
    ) -> Self {
        Self {
            pool,
            stripe_service,
            email_service,
        }
    }

    pub async fn confirm_membership(
        &self,
        user_membership_id: i64,
    ) -> AppResult<ConfirmPaymentResponse> {
        let membership = memberships::Entity::find_by_id(user_membership_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Membership not found".to_string()))?;
        let plan = plans::Entity::find_by_id(membership.plan_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Membership plan not found".to_string()))?;

        // 已激活的记录再确认一次必须无副作用（不得二次顺延有效期）
        if membership.status == MembershipStatus::Active {
            return Ok(ConfirmPaymentResponse {
                status: MembershipStatus::Active,
                plan_name: plan.name,
                end_date: Some(membership.end_date),
            });
        }

        let client_secret = membership.stripe_client_secret.clone().ok_or_else(|| {
            AppError::InvalidPaymentReference(format!(
                "membership {user_membership_id} has no stored payment reference"
            ))
        })?;
        let intent_id = intent_id_from_client_secret(&client_secret)?;
        let intent = self.stripe_service.retrieve_payment_intent(&intent_id).await?;

        if intent.status != PaymentIntentStatus::Succeeded {
            // 尚未支付成功：不是错误，记录保持 pending，前端可轮询重试
            return Ok(ConfirmPaymentResponse {
                status: MembershipStatus::Pending,
                plan_name: plan.name,
                end_date: None,
            });
        }

        let now = Utc::now();
        let end_date = membership_end_date(now, plan.duration);
        let user_id = membership.user_id;

        let txn = self.pool.begin().await?;
        // status guard inside the transaction: a concurrent confirm may
        // have won the race, in which case this one becomes a no-op
        let current = memberships::Entity::find_by_id(user_membership_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Membership not found".to_string()))?;
        if current.status == MembershipStatus::Active {
            txn.commit().await?;
            return Ok(ConfirmPaymentResponse {
                status: MembershipStatus::Active,
                plan_name: plan.name,
                end_date: Some(current.end_date),
            });
        }
        let mut am = current.into_active_model();
        am.status = Set(MembershipStatus::Active);
        am.start_date = Set(now);
        am.end_date = Set(end_date);
        am.stripe_client_secret = Set(None);
        am.updated_at = Set(Some(now));
        am.update(&txn).await?;
        txn.commit().await?;

        // 通知属于尽力而为：失败只记日志，绝不回滚确认结果
        self.notify_membership_activated(user_id, &plan, intent.currency, end_date)
            .await;

        Ok(ConfirmPaymentResponse {
            status: MembershipStatus::Active,
            plan_name: plan.name,
            end_date: Some(end_date),
        })
    }

    async fn notify_membership_activated(
        &self,
        user_id: i64,
        plan: &plans::Model,
        currency: Currency,
        end_date: DateTime<Utc>,
    ) {
        let profile = match profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await
        {
            Ok(Some(p)) => p,
            Ok(None) => {
                log::warn!("User {user_id} has no profile; skipping confirmation email");
                return;
            }
            Err(e) => {
                log::error!("Profile lookup for confirmation email failed: {e}");
                return;
            }
        };

        let amount_display = if currency == Currency::CNY {
            format!("¥{}", plan.price_cn)
        } else {
            format!("${}", plan.price)
        };
        let end_date_display = end_date.format("%Y年%m月%d日").to_string();

        if let Err(e) = self
            .email_service
            .send_payment_confirmation(
                &profile.email,
                &profile.user_name,
                &plan.name,
                &amount_display,
                &end_date_display,
            )
            .await
        {
            log::error!("Failed to send confirmation email: {e}");
        }

        if let Err(e) = self
            .email_service
            .send_admin_notification(AdminNotification::NewSubscription {
                username: profile.user_name.clone(),
                email: profile.email.clone(),
                plan_name: plan.name.clone(),
            })
            .await
        {
            log::error!("Failed to send admin subscription notification: {e}");
        }
    }

    pub async fn confirm_gift(
        &self,
        user_id: i64,
        chapter_gift_id: i64,
    ) -> AppResult<ConfirmGiftPaymentResponse> {
        let record = chapter_gifts::Entity::find_by_id(chapter_gift_id)
            .filter(chapter_gifts::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Chapter gift not found".to_string()))?;

        if record.payment_status == GiftPaymentStatus::Paid {
            return Ok(ConfirmGiftPaymentResponse {
                status: GiftPaymentStatus::Paid,
                paid_at: record.paid_at,
            });
        }

        let client_secret = record.stripe_client_secret.clone().ok_or_else(|| {
            AppError::InvalidPaymentReference(format!(
                "chapter gift {chapter_gift_id} has no stored payment reference"
            ))
        })?;
        let intent_id = intent_id_from_client_secret(&client_secret)?;
        let intent = self.stripe_service.retrieve_payment_intent(&intent_id).await?;

        if intent.status != PaymentIntentStatus::Succeeded {
            return Ok(ConfirmGiftPaymentResponse {
                status: GiftPaymentStatus::Pending,
                paid_at: None,
            });
        }

        let now = Utc::now();
        let txn = self.pool.begin().await?;
        let current = chapter_gifts::Entity::find_by_id(chapter_gift_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Chapter gift not found".to_string()))?;
        if current.payment_status == GiftPaymentStatus::Paid {
            txn.commit().await?;
            return Ok(ConfirmGiftPaymentResponse {
                status: GiftPaymentStatus::Paid,
                paid_at: current.paid_at,
            });
        }
        let mut am = current.into_active_model();
        am.payment_status = Set(GiftPaymentStatus::Paid);
        am.paid_at = Set(Some(now));
        am.updated_at = Set(Some(now));
        am.update(&txn).await?;
        txn.commit().await?;

        Ok(ConfirmGiftPaymentResponse {
            status: GiftPaymentStatus::Paid,
            paid_at: Some(now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_membership_end_date_adds_months() {
        let from = Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap();
        let end = membership_end_date(from, 3);
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 8, 15, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_membership_end_date_clamps_short_months() {
        let from = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let end = membership_end_date(from, 1);
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_membership_end_date_year_rollover() {
        let from = Utc.with_ymd_and_hms(2024, 11, 2, 0, 0, 0).unwrap();
        let end = membership_end_date(from, 12);
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 11, 2, 0, 0, 0).unwrap());
    }
}
