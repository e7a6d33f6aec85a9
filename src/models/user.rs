use crate::entities::{UserRole, user_profile_entity as profiles};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "reader@example.com")]
    pub email: String,
    #[schema(example = "reading123")]
    pub password: String,
    #[schema(example = "书虫")]
    pub user_name: String,
    /// reader 或 author；author 注册需管理员审核后才能发布
    pub role: Option<UserRole>,
    pub pen_name: Option<String>,
    pub ip: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "reader@example.com")]
    pub email: String,
    #[schema(example = "reading123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub pen_name: Option<String>,
    pub email: String,
    pub role: UserRole,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

impl From<profiles::Model> for ProfileResponse {
    fn from(p: profiles::Model) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            user_name: p.user_name,
            pen_name: p.pen_name,
            email: p.email,
            role: p.role,
            approved: p.approved,
            created_at: p.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub user_name: Option<String>,
    pub pen_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: ProfileResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CurrentUserResponse {
    pub user: ProfileResponse,
    pub membership: Option<crate::models::MembershipResponse>,
    pub is_membership_active: bool,
}
