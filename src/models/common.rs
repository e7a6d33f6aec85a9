use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error payload carried under the `error` key of failed responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}
