use crate::models::{MembershipResponse, ProfileResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 管理端用户列表行：档案 + 会员记录。
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminUserRow {
    #[serde(flatten)]
    pub profile: ProfileResponse,
    pub ip: Option<String>,
    pub memberships: Vec<MembershipResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateTagRequest {
    pub name: String,
}
