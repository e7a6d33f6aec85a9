use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactFormRequest {
    pub title: String,
    pub content: String,
    pub email: String,
}
