use crate::error::AppError;
use crate::middlewares::current_user_id;
use crate::models::*;
use crate::services::{AdminService, IdentityService, NovelService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

async fn require_admin(
    identity_service: &IdentityService,
    req: &HttpRequest,
) -> Result<i64, AppError> {
    let identity = identity_service.resolve(current_user_id(req)).await;
    match identity.user_id {
        None => Err(AppError::AuthError("User not authenticated".to_string())),
        Some(user_id) if identity.is_admin => Ok(user_id),
        Some(_) => Err(AppError::Forbidden("Admin role required".to_string())),
    }
}

#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "全部用户（含会员记录）"),
        (status = 403, description = "仅管理员")
    )
)]
pub async fn list_users(
    admin_service: web::Data<AdminService>,
    identity_service: web::Data<IdentityService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&identity_service, &req).await {
        return Ok(e.error_response());
    }

    match admin_service.list_users().await {
        Ok(users) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "users": users }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/users/{profile_id}/approve",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "审核通过", body = ProfileResponse),
        (status = 404, description = "档案不存在")
    )
)]
pub async fn approve_user(
    admin_service: web::Data<AdminService>,
    identity_service: web::Data<IdentityService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&identity_service, &req).await {
        return Ok(e.error_response());
    }

    match admin_service.approve_profile(path.into_inner()).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "user": profile }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/tags",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "标签列表"),
        (status = 403, description = "仅管理员")
    )
)]
pub async fn list_tags(
    admin_service: web::Data<AdminService>,
    identity_service: web::Data<IdentityService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&identity_service, &req).await {
        return Ok(e.error_response());
    }

    match admin_service.list_tags().await {
        Ok(tags) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "tags": tags }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/tags",
    tag = "admin",
    request_body = CreateTagRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "创建标签成功", body = TagResponse),
        (status = 400, description = "标签已存在")
    )
)]
pub async fn create_tag(
    admin_service: web::Data<AdminService>,
    identity_service: web::Data<IdentityService>,
    req: HttpRequest,
    request: web::Json<CreateTagRequest>,
) -> Result<HttpResponse> {
    let user_id = match require_admin(&identity_service, &req).await {
        Ok(user_id) => user_id,
        Err(e) => return Ok(e.error_response()),
    };

    match admin_service.create_tag(user_id, &request.name).await {
        Ok(tag) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "tag": tag }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/tags/{tag_id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "删除标签成功"),
        (status = 404, description = "标签不存在")
    )
)]
pub async fn delete_tag(
    admin_service: web::Data<AdminService>,
    identity_service: web::Data<IdentityService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&identity_service, &req).await {
        return Ok(e.error_response());
    }

    match admin_service.delete_tag(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Tag deleted successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/word-count/refresh",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "字数统计已刷新"),
        (status = 403, description = "仅管理员")
    )
)]
pub async fn refresh_word_counts(
    novel_service: web::Data<NovelService>,
    identity_service: web::Data<IdentityService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_admin(&identity_service, &req).await {
        return Ok(e.error_response());
    }

    match novel_service.update_word_counts().await {
        Ok((chapters_updated, novels_updated)) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "chapters_updated": chapters_updated,
                "novels_updated": novels_updated
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/users", web::get().to(list_users))
            .route("/users/{profile_id}/approve", web::put().to(approve_user))
            .route("/tags", web::get().to(list_tags))
            .route("/tags", web::post().to(create_tag))
            .route("/tags/{tag_id}", web::delete().to(delete_tag))
            .route("/word-count/refresh", web::post().to(refresh_word_counts)),
    );
}
