use crate::entities::{
    MembershipStatus, UserRole, novel_entity as novels, user_membership_entity as memberships,
    user_profile_entity as profiles,
};
use crate::error::{AppError, AppResult};
use crate::models::Entitlement;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

/// Current tier of one user: profile role plus the effective membership
/// row, if any. Absence of a membership is a valid finding, not an error.
#[derive(Debug, Clone)]
pub struct EntitlementRecord {
    pub role: UserRole,
    pub approved: bool,
    pub membership: Option<memberships::Model>,
    pub is_membership_active: bool,
}

/// A membership row grants VIP only while `active` and unexpired.
/// Expiry is evaluated lazily at read time; no sweep job flips rows.
pub fn is_membership_active(
    status: MembershipStatus,
    end_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    status == MembershipStatus::Active && end_date > now
}

#[derive(Clone)]
pub struct EntitlementService {
    pool: DatabaseConnection,
}

impl EntitlementService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// The single effective membership row: still inside its validity
    /// window and not expired-by-status, newest first when re-subscription
    /// left multiple candidates.
    async fn current_membership(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Option<memberships::Model>> {
        let row = memberships::Entity::find()
            .filter(memberships::Column::UserId.eq(user_id))
            .filter(
                memberships::Column::Status
                    .is_in([MembershipStatus::Active, MembershipStatus::Pending]),
            )
            .filter(memberships::Column::StartDate.lte(now))
            .filter(memberships::Column::EndDate.gte(now))
            .order_by_desc(memberships::Column::CreatedAt)
            .one(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn evaluate(&self, user_id: i64) -> AppResult<EntitlementRecord> {
        let profile = profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User profile not found".to_string()))?;

        let now = Utc::now();
        let membership = self.current_membership(user_id, now).await?;
        let active = membership
            .as_ref()
            .map(|m| is_membership_active(m.status, m.end_date, now))
            .unwrap_or(false);

        Ok(EntitlementRecord {
            role: profile.role,
            approved: profile.approved,
            membership,
            is_membership_active: active,
        })
    }

    /// Collapse role strings + membership state into the one tagged
    /// variant the access gate consumes.
    pub async fn entitlement_for(&self, user_id: Option<i64>) -> AppResult<Entitlement> {
        let Some(user_id) = user_id else {
            return Ok(Entitlement::Anonymous);
        };

        let profile = profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?;
        let Some(profile) = profile else {
            // token outlived the profile
            return Ok(Entitlement::Anonymous);
        };

        if profile.role == UserRole::Admin {
            return Ok(Entitlement::Admin { user_id });
        }

        let now = Utc::now();
        let vip = self
            .current_membership(user_id, now)
            .await?
            .map(|m| is_membership_active(m.status, m.end_date, now))
            .unwrap_or(false);

        match profile.role {
            UserRole::Author => {
                let novel_ids: Vec<i64> = novels::Entity::find()
                    .filter(novels::Column::UserId.eq(user_id))
                    .select_only()
                    .column(novels::Column::Id)
                    .into_tuple()
                    .all(&self.pool)
                    .await?;
                Ok(Entitlement::Author {
                    user_id,
                    novel_ids,
                    vip,
                })
            }
            _ => Ok(Entitlement::Reader {
                user_id,
                approved: profile.approved,
                vip,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_active_membership_inside_window() {
        let now = Utc::now();
        assert!(is_membership_active(
            MembershipStatus::Active,
            now + Duration::days(10),
            now
        ));
    }

    #[test]
    fn test_pending_membership_is_not_active() {
        let now = Utc::now();
        assert!(!is_membership_active(
            MembershipStatus::Pending,
            now + Duration::days(10),
            now
        ));
    }

    #[test]
    fn test_expired_end_date_is_not_active() {
        let now = Utc::now();
        assert!(!is_membership_active(
            MembershipStatus::Active,
            now - Duration::seconds(1),
            now
        ));
        assert!(!is_membership_active(MembershipStatus::Active, now, now));
    }
}
