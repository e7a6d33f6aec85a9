use crate::error::AppError;
use crate::middlewares::current_user_id;
use crate::models::*;
use crate::services::{IdentityService, PaymentService, ReconcileService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/membership/plans",
    tag = "payment",
    responses(
        (status = 200, description = "会员计划列表")
    )
)]
pub async fn list_plans(payment_service: web::Data<PaymentService>) -> Result<HttpResponse> {
    match payment_service.list_plans().await {
        Ok(plans) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "plans": plans }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/create-payment-intent",
    tag = "payment",
    request_body = CreateMembershipIntentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "会员支付意图已创建", body = CreateMembershipIntentResponse),
        (status = 401, description = "未授权"),
        (status = 404, description = "计划不存在")
    )
)]
pub async fn create_payment_intent(
    payment_service: web::Data<PaymentService>,
    identity_service: web::Data<IdentityService>,
    req: HttpRequest,
    request: web::Json<CreateMembershipIntentRequest>,
) -> Result<HttpResponse> {
    let identity = identity_service.resolve(current_user_id(&req)).await;
    if !identity.is_authenticated() {
        return Ok(AppError::AuthError("User not authenticated".to_string()).error_response());
    }

    match payment_service
        .create_membership_intent(&identity, request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/gift-payment-intent",
    tag = "payment",
    request_body = GiftIntentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "打赏支付意图已创建", body = GiftIntentResponse),
        (status = 401, description = "未授权"),
        (status = 404, description = "礼物不存在")
    )
)]
pub async fn gift_payment_intent(
    payment_service: web::Data<PaymentService>,
    identity_service: web::Data<IdentityService>,
    req: HttpRequest,
    request: web::Json<GiftIntentRequest>,
) -> Result<HttpResponse> {
    let identity = identity_service.resolve(current_user_id(&req)).await;
    if !identity.is_authenticated() {
        return Ok(AppError::AuthError("User not authenticated".to_string()).error_response());
    }

    match payment_service
        .create_gift_intent(&identity, request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/confirm-payment",
    tag = "payment",
    request_body = ConfirmPaymentRequest,
    responses(
        (status = 200, description = "会员确认结果（active 或仍为 pending）", body = ConfirmPaymentResponse),
        (status = 400, description = "支付引用缺失或非法"),
        (status = 404, description = "会员记录不存在")
    )
)]
pub async fn confirm_payment(
    reconcile_service: web::Data<ReconcileService>,
    request: web::Json<ConfirmPaymentRequest>,
) -> Result<HttpResponse> {
    match reconcile_service
        .confirm_membership(request.user_membership_id)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/confirm-gift-payment",
    tag = "payment",
    request_body = ConfirmGiftPaymentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "打赏确认结果（paid 或仍为 pending）", body = ConfirmGiftPaymentResponse),
        (status = 401, description = "未授权"),
        (status = 404, description = "打赏记录不存在")
    )
)]
pub async fn confirm_gift_payment(
    reconcile_service: web::Data<ReconcileService>,
    req: HttpRequest,
    request: web::Json<ConfirmGiftPaymentRequest>,
) -> Result<HttpResponse> {
    let Some(user_id) = current_user_id(&req) else {
        return Ok(AppError::AuthError("User not authenticated".to_string()).error_response());
    };

    match reconcile_service
        .confirm_gift(user_id, request.chapter_gift_id)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn payment_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/membership/plans", web::get().to(list_plans))
        .route("/create-payment-intent", web::post().to(create_payment_intent))
        .route("/gift-payment-intent", web::post().to(gift_payment_intent))
        .route("/confirm-payment", web::post().to(confirm_payment))
        .route("/confirm-gift-payment", web::post().to(confirm_gift_payment));
}
