use crate::error::AppError;
use crate::middlewares::current_user_id;
use crate::models::*;
use crate::services::{EntitlementService, NovelService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/novels",
    tag = "novel",
    params(
        ("search" = Option<String>, Query, description = "标题搜索"),
        ("category" = Option<String>, Query, description = "分类名"),
        ("status" = Option<String>, Query, description = "ongoing | finished"),
        ("is_short" = Option<bool>, Query, description = "短篇"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    responses(
        (status = 200, description = "小说列表")
    )
)]
pub async fn list_novels(
    novel_service: web::Data<NovelService>,
    query: web::Query<NovelQuery>,
) -> Result<HttpResponse> {
    match novel_service.list_novels(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/novels",
    tag = "novel",
    request_body = CreateNovelRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "创建小说成功", body = NovelSummary),
        (status = 403, description = "仅作者可创建")
    )
)]
pub async fn create_novel(
    novel_service: web::Data<NovelService>,
    entitlement_service: web::Data<EntitlementService>,
    req: HttpRequest,
    request: web::Json<CreateNovelRequest>,
) -> Result<HttpResponse> {
    let entitlement = match entitlement_service.entitlement_for(current_user_id(&req)).await {
        Ok(e) => e,
        Err(e) => return Ok(e.error_response()),
    };

    match novel_service.create_novel(&entitlement, request.into_inner()).await {
        Ok(novel) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "novel": novel }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/novels/author",
    tag = "novel",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "当前作者的小说（含草稿）"),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_author_novels(
    novel_service: web::Data<NovelService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let Some(user_id) = current_user_id(&req) else {
        return Ok(AppError::AuthError("User not authenticated".to_string()).error_response());
    };

    match novel_service.list_author_novels(user_id).await {
        Ok(novels) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "novels": novels }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/novels/{novel_id}",
    tag = "novel",
    params(("novel_id" = i64, Path, description = "小说ID")),
    responses(
        (status = 200, description = "小说详情", body = NovelDetailResponse),
        (status = 404, description = "小说不存在")
    )
)]
pub async fn novel_detail(
    novel_service: web::Data<NovelService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match novel_service.novel_detail(path.into_inner()).await {
        Ok(novel) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "novel": novel }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/novels/{novel_id}",
    tag = "novel",
    request_body = UpdateNovelRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "更新小说成功", body = NovelSummary),
        (status = 403, description = "无权限")
    )
)]
pub async fn update_novel(
    novel_service: web::Data<NovelService>,
    entitlement_service: web::Data<EntitlementService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateNovelRequest>,
) -> Result<HttpResponse> {
    let entitlement = match entitlement_service.entitlement_for(current_user_id(&req)).await {
        Ok(e) => e,
        Err(e) => return Ok(e.error_response()),
    };

    match novel_service
        .update_novel(&entitlement, path.into_inner(), request.into_inner())
        .await
    {
        Ok(novel) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "novel": novel }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/novels/{novel_id}",
    tag = "novel",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "删除小说成功"),
        (status = 403, description = "无权限")
    )
)]
pub async fn delete_novel(
    novel_service: web::Data<NovelService>,
    entitlement_service: web::Data<EntitlementService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let entitlement = match entitlement_service.entitlement_for(current_user_id(&req)).await {
        Ok(e) => e,
        Err(e) => return Ok(e.error_response()),
    };

    match novel_service.delete_novel(&entitlement, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Novel deleted successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/novels/{novel_id}/chapters/{chapter_id}",
    tag = "chapter",
    params(
        ("novel_id" = i64, Path, description = "小说ID"),
        ("chapter_id" = i64, Path, description = "章节ID")
    ),
    responses(
        (status = 200, description = "章节内容（按访问策略裁剪）", body = ChapterViewResponse),
        (status = 403, description = "不可阅读"),
        (status = 404, description = "章节不存在")
    )
)]
pub async fn chapter_view(
    novel_service: web::Data<NovelService>,
    entitlement_service: web::Data<EntitlementService>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let (novel_id, chapter_id) = path.into_inner();
    let entitlement = match entitlement_service.entitlement_for(current_user_id(&req)).await {
        Ok(e) => e,
        Err(e) => return Ok(e.error_response()),
    };

    match novel_service
        .chapter_view(novel_id, chapter_id, &entitlement)
        .await
    {
        Ok(chapter) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "chapter": chapter }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/novels/{novel_id}/chapters",
    tag = "chapter",
    request_body = UpsertChapterRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "创建章节成功", body = ChapterSummary),
        (status = 403, description = "无权限")
    )
)]
pub async fn create_chapter(
    novel_service: web::Data<NovelService>,
    entitlement_service: web::Data<EntitlementService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpsertChapterRequest>,
) -> Result<HttpResponse> {
    let entitlement = match entitlement_service.entitlement_for(current_user_id(&req)).await {
        Ok(e) => e,
        Err(e) => return Ok(e.error_response()),
    };

    match novel_service
        .create_chapter(&entitlement, path.into_inner(), request.into_inner())
        .await
    {
        Ok(chapter) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "chapter": chapter }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/novels/{novel_id}/chapters/{chapter_id}",
    tag = "chapter",
    request_body = UpsertChapterRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "更新章节成功", body = ChapterSummary),
        (status = 403, description = "无权限")
    )
)]
pub async fn update_chapter(
    novel_service: web::Data<NovelService>,
    entitlement_service: web::Data<EntitlementService>,
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    request: web::Json<UpsertChapterRequest>,
) -> Result<HttpResponse> {
    let (novel_id, chapter_id) = path.into_inner();
    let entitlement = match entitlement_service.entitlement_for(current_user_id(&req)).await {
        Ok(e) => e,
        Err(e) => return Ok(e.error_response()),
    };

    match novel_service
        .update_chapter(&entitlement, novel_id, chapter_id, request.into_inner())
        .await
    {
        Ok(chapter) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "chapter": chapter }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

// 注意：评论与打赏路由也挂在 /novels 前缀下（见 comment/gift 模块），
// 这里不能用 scope，否则前缀会把后注册的资源吞掉返回 404。
pub fn novel_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/novels", web::get().to(list_novels))
        .route("/novels", web::post().to(create_novel))
        .route("/novels/author", web::get().to(list_author_novels))
        .route("/novels/{novel_id}", web::get().to(novel_detail))
        .route("/novels/{novel_id}", web::put().to(update_novel))
        .route("/novels/{novel_id}", web::delete().to(delete_novel))
        .route(
            "/novels/{novel_id}/chapters",
            web::post().to(create_chapter),
        )
        .route(
            "/novels/{novel_id}/chapters/{chapter_id}",
            web::get().to(chapter_view),
        )
        .route(
            "/novels/{novel_id}/chapters/{chapter_id}",
            web::put().to(update_chapter),
        );
}
