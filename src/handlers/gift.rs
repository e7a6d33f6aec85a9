use crate::error::AppError;
use crate::middlewares::current_user_id;
use crate::models::*;
use crate::services::GiftService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/gifts",
    tag = "gift",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "礼物目录"),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_gifts(
    gift_service: web::Data<GiftService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if current_user_id(&req).is_none() {
        return Ok(AppError::AuthError("User not authenticated".to_string()).error_response());
    }

    match gift_service.list_gifts().await {
        Ok(gifts) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "gifts": gifts }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/novels/{novel_id}/chapters/{chapter_id}/gifts",
    tag = "gift",
    params(
        ("novel_id" = i64, Path, description = "小说ID"),
        ("chapter_id" = i64, Path, description = "章节ID")
    ),
    responses(
        (status = 200, description = "礼物目录 + 本章打赏记录", body = ChapterGiftListResponse)
    )
)]
pub async fn chapter_gift_list(
    gift_service: web::Data<GiftService>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let (novel_id, chapter_id) = path.into_inner();
    match gift_service.chapter_gift_list(novel_id, chapter_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/novels/{novel_id}/chapters/{chapter_id}/gifts",
    tag = "gift",
    request_body = SendGiftRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "打赏记录已登记", body = ChapterGiftResponse),
        (status = 401, description = "未授权"),
        (status = 404, description = "礼物/章节不存在")
    )
)]
pub async fn send_gift(
    gift_service: web::Data<GiftService>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    request: web::Json<SendGiftRequest>,
) -> Result<HttpResponse> {
    let Some(user_id) = current_user_id(&req) else {
        return Ok(AppError::AuthError("User not authenticated".to_string()).error_response());
    };
    let (novel_id, chapter_id) = path.into_inner();

    match gift_service
        .send_gift(user_id, novel_id, chapter_id, request.into_inner())
        .await
    {
        Ok(chapter_gift) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": { "chapter_gift": chapter_gift }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn gift_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/gifts", web::get().to(list_gifts))
        .route(
            "/novels/{novel_id}/chapters/{chapter_id}/gifts",
            web::get().to(chapter_gift_list),
        )
        .route(
            "/novels/{novel_id}/chapters/{chapter_id}/gifts",
            web::post().to(send_gift),
        );
}
