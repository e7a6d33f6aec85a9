use crate::error::AppError;
use crate::middlewares::current_user_id;
use crate::models::*;
use crate::services::CommentService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/novels/{novel_id}/chapters/{chapter_id}/comments",
    tag = "comment",
    params(
        ("novel_id" = i64, Path, description = "小说ID"),
        ("chapter_id" = i64, Path, description = "章节ID")
    ),
    responses(
        (status = 200, description = "章节评论树")
    )
)]
pub async fn list_comments(
    comment_service: web::Data<CommentService>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let (_novel_id, chapter_id) = path.into_inner();
    match comment_service.list_comments(chapter_id).await {
        Ok(comments) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "comments": comments }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/novels/{novel_id}/chapters/{chapter_id}/comments",
    tag = "comment",
    request_body = CreateCommentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "评论成功", body = CommentResponse),
        (status = 401, description = "未授权"),
        (status = 404, description = "章节或父评论不存在")
    )
)]
pub async fn create_comment(
    comment_service: web::Data<CommentService>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    request: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let Some(user_id) = current_user_id(&req) else {
        return Ok(AppError::AuthError("Authentication required".to_string()).error_response());
    };
    let (_novel_id, chapter_id) = path.into_inner();

    match comment_service
        .create_comment(user_id, chapter_id, request.into_inner())
        .await
    {
        Ok(comment) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": { "comment": comment }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/novels/{novel_id}/chapters/{chapter_id}/comments/{comment_id}",
    tag = "comment",
    request_body = UpdateCommentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "修改评论成功", body = CommentResponse),
        (status = 404, description = "评论不存在或非本人")
    )
)]
pub async fn update_comment(
    comment_service: web::Data<CommentService>,
    req: HttpRequest,
    path: web::Path<(i64, i64, i64)>,
    request: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse> {
    let Some(user_id) = current_user_id(&req) else {
        return Ok(AppError::AuthError("Authentication required".to_string()).error_response());
    };
    let (_novel_id, _chapter_id, comment_id) = path.into_inner();

    match comment_service
        .update_comment(user_id, comment_id, request.into_inner())
        .await
    {
        Ok(comment) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "comment": comment }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/novels/{novel_id}/chapters/{chapter_id}/comments/{comment_id}",
    tag = "comment",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "删除评论成功"),
        (status = 404, description = "评论不存在或非本人")
    )
)]
pub async fn delete_comment(
    comment_service: web::Data<CommentService>,
    req: HttpRequest,
    path: web::Path<(i64, i64, i64)>,
) -> Result<HttpResponse> {
    let Some(user_id) = current_user_id(&req) else {
        return Ok(AppError::AuthError("Authentication required".to_string()).error_response());
    };
    let (_novel_id, _chapter_id, comment_id) = path.into_inner();

    match comment_service.delete_comment(user_id, comment_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Comment deleted successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn comment_config(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/novels/{novel_id}/chapters/{chapter_id}/comments",
        web::get().to(list_comments),
    )
    .route(
        "/novels/{novel_id}/chapters/{chapter_id}/comments",
        web::post().to(create_comment),
    )
    .route(
        "/novels/{novel_id}/chapters/{chapter_id}/comments/{comment_id}",
        web::put().to(update_comment),
    )
    .route(
        "/novels/{novel_id}/chapters/{chapter_id}/comments/{comment_id}",
        web::delete().to(delete_comment),
    );
}
