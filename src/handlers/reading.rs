use crate::error::AppError;
use crate::middlewares::current_user_id;
use crate::models::*;
use crate::services::{IdentityService, ReadingService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/reading_records",
    tag = "reading",
    params(
        ("month" = String, Query, description = "统计月份 YYYY-MM"),
        ("filter" = String, Query, description = "user | novel | author")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "按维度汇总的阅读时长，降序"),
        (status = 401, description = "未授权"),
        (status = 403, description = "仅管理员")
    )
)]
pub async fn reading_stats(
    reading_service: web::Data<ReadingService>,
    identity_service: web::Data<IdentityService>,
    req: HttpRequest,
    query: web::Query<ReadingStatsQuery>,
) -> Result<HttpResponse> {
    let identity = identity_service.resolve(current_user_id(&req)).await;
    if !identity.is_authenticated() {
        return Ok(AppError::AuthError("User not authenticated".to_string()).error_response());
    }
    if !identity.is_admin {
        return Ok(AppError::Forbidden("Admin role required".to_string()).error_response());
    }

    match reading_service.monthly_stats(&query.month, query.filter).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "records": stats }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/reading_records",
    tag = "reading",
    request_body = RecordReadingRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "阅读时长已累加"),
        (status = 401, description = "未授权")
    )
)]
pub async fn record_reading(
    reading_service: web::Data<ReadingService>,
    req: HttpRequest,
    request: web::Json<RecordReadingRequest>,
) -> Result<HttpResponse> {
    let Some(user_id) = current_user_id(&req) else {
        return Ok(AppError::AuthError("User not authenticated".to_string()).error_response());
    };

    match reading_service.record_reading(user_id, request.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn reading_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/reading_records", web::get().to(reading_stats))
        .route("/reading_records", web::post().to(record_reading));
}
