use crate::models::*;
use crate::services::ContactService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/contact",
    tag = "contact",
    request_body = ContactFormRequest,
    responses(
        (status = 200, description = "提交成功"),
        (status = 400, description = "缺少必填字段")
    )
)]
pub async fn submit_contact_form(
    contact_service: web::Data<ContactService>,
    request: web::Json<ContactFormRequest>,
) -> Result<HttpResponse> {
    match contact_service.submit(request.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn contact_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/contact", web::post().to(submit_contact_form));
}
