use crate::services::session_service;
use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct IdentityRequest {
    pub email: String,
    /// "Employee", "HR" or "Admin"
    pub role: Option<String>,
}

#[utoipa::path(
    post,
    path = "/jwt",
    tag = "Session",
    request_body = IdentityRequest,
    responses(
        (status = 200, description = "Session cookie issued"),
        (status = 500, description = "Token signing failed")
    )
)]
pub async fn issue_token(request: web::Json<IdentityRequest>) -> HttpResponse {
    log::info!("🔐 POST /jwt - email: {}", request.email);

    match session_service::issue_token(&request.email, request.role.as_deref()) {
        Ok(token) => HttpResponse::Ok()
            .cookie(session_service::session_cookie(token))
            .json(serde_json::json!({ "success": true })),
        Err(e) => {
            log::error!("❌ Failed to issue token: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/logout",
    tag = "Session",
    responses(
        (status = 200, description = "Session cookie cleared")
    )
)]
pub async fn logout() -> HttpResponse {
    log::info!("🔓 GET /logout");

    HttpResponse::Ok()
        .cookie(session_service::expired_cookie())
        .json(serde_json::json!({ "success": true }))
}
