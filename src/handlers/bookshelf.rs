use crate::error::AppError;
use crate::middlewares::current_user_id;
use crate::models::*;
use crate::services::UserService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/bookshelf",
    tag = "bookshelf",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "我的书架"),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_bookshelf(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let Some(user_id) = current_user_id(&req) else {
        return Ok(AppError::AuthError("User not authenticated".to_string()).error_response());
    };

    match user_service.list_bookshelf(user_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "bookshelf": items }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/bookshelf",
    tag = "bookshelf",
    request_body = AddBookshelfRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "已加入书架"),
        (status = 404, description = "小说不存在")
    )
)]
pub async fn add_to_bookshelf(
    user_service: web::Data<UserService>,
    req: HttpRequest,
    request: web::Json<AddBookshelfRequest>,
) -> Result<HttpResponse> {
    let Some(user_id) = current_user_id(&req) else {
        return Ok(AppError::AuthError("User not authenticated".to_string()).error_response());
    };

    match user_service.add_to_bookshelf(user_id, request.novel_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/bookshelf/{novel_id}",
    tag = "bookshelf",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "已移出书架"),
        (status = 401, description = "未授权")
    )
)]
pub async fn remove_from_bookshelf(
    user_service: web::Data<UserService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let Some(user_id) = current_user_id(&req) else {
        return Ok(AppError::AuthError("User not authenticated".to_string()).error_response());
    };

    match user_service
        .remove_from_bookshelf(user_id, path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn bookshelf_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/bookshelf", web::get().to(list_bookshelf))
        .route("/bookshelf", web::post().to(add_to_bookshelf))
        .route("/bookshelf/{novel_id}", web::delete().to(remove_from_bookshelf));
}
