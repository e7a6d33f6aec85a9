use crate::entities::{UserRole, user_profile_entity as profiles};
use crate::models::Identity;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Turns a decoded caller id into a normalized identity record.
///
/// Contract: never fails the request. A stale id, a missing profile or
/// even a storage hiccup resolves to the anonymous identity and a log
/// line; handlers that require authentication check the result.
#[derive(Clone)]
pub struct IdentityService {
    pool: DatabaseConnection,
}

impl IdentityService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn resolve(&self, user_id: Option<i64>) -> Identity {
        let Some(user_id) = user_id else {
            return Identity::anonymous();
        };

        match profiles::Entity::find()
            .filter(profiles::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await
        {
            Ok(Some(profile)) => Identity {
                user_id: Some(user_id),
                is_admin: profile.role == UserRole::Admin,
                email: Some(profile.email),
            },
            Ok(None) => {
                log::warn!("No profile for authenticated user {user_id}, treating as anonymous");
                Identity::anonymous()
            }
            Err(e) => {
                log::error!("Profile lookup failed for user {user_id}: {e}");
                Identity::anonymous()
            }
        }
    }
}
