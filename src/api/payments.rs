use crate::database::MongoDB;
use crate::models::Payment;
use crate::services::payment_service::{self, PageQuery};
use crate::services::session_service::Claims;
use crate::services::stripe_service::{self, CreateIntentRequest};
use crate::utils::error::AppError;
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse, ResponseError};

#[utoipa::path(
    post,
    path = "/create-payment-intent",
    tag = "Payments",
    request_body = CreateIntentRequest,
    responses(
        (status = 200, description = "Client secret for the pending charge", body = stripe_service::CreateIntentResponse),
        (status = 400, description = "Missing or sub-cent salary"),
        (status = 401, description = "No valid session"),
        (status = 502, description = "Payment gateway unavailable")
    )
)]
pub async fn create_intent(
    req: HttpRequest,
    request: web::Json<CreateIntentRequest>,
) -> HttpResponse {
    let requester = requester_email(&req);
    log::info!("💳 POST /create-payment-intent - requested by {}", requester);

    match stripe_service::create_payment_intent(&request).await {
        Ok(response) => {
            log::info!("✅ Payment intent created for {}", requester);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Payment intent failed for {}: {}", requester, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/payments",
    tag = "Payments",
    responses(
        (status = 200, description = "Payment stored; userUpdated reports whether the employee's flag flipped", body = payment_service::PaymentCreated),
        (status = 400, description = "Invalid salary or pay period"),
        (status = 401, description = "No valid session")
    )
)]
pub async fn create_payment(
    req: HttpRequest,
    db: web::Data<MongoDB>,
    payment: web::Json<Payment>,
) -> HttpResponse {
    let requester = requester_email(&req);
    log::info!(
        "💰 POST /payments - employee {} for {}/{} by {}",
        payment.employee_id,
        payment.pay_month,
        payment.pay_year,
        requester
    );

    match payment_service::create_payment(&db, payment.into_inner()).await {
        Ok(created) => HttpResponse::Ok().json(created),
        Err(e) => {
            log::error!("❌ Failed to create payment: {}", e);
            e.error_response()
        }
    }
}

pub async fn list_payments(req: HttpRequest, db: web::Data<MongoDB>) -> HttpResponse {
    log::info!("💰 GET /payments - requested by {}", requester_email(&req));

    match payment_service::list_all(&db).await {
        Ok(payments) => HttpResponse::Ok().json(payments),
        Err(e) => {
            log::error!("❌ Failed to list payments: {}", e);
            e.error_response()
        }
    }
}

pub async fn get_payment(db: web::Data<MongoDB>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    log::info!("💰 GET /payments/{}", id);

    match payment_service::get_by_id(&db, &id).await {
        Ok(Some(payment)) => HttpResponse::Ok().json(payment),
        Ok(None) => AppError::NotFound(format!("payment {} not found", id)).error_response(),
        Err(e) => {
            log::warn!("❌ Failed to fetch payment {}: {}", id, e);
            e.error_response()
        }
    }
}

pub async fn get_by_slug(db: web::Data<MongoDB>, path: web::Path<String>) -> HttpResponse {
    let slug = path.into_inner();
    log::info!("🔎 GET /details/{}", slug);

    match payment_service::get_by_slug(&db, &slug).await {
        Ok(Some(payment)) => HttpResponse::Ok().json(payment),
        Ok(None) => {
            AppError::NotFound(format!("no payment for slug {}", slug)).error_response()
        }
        Err(e) => {
            log::warn!("❌ Failed to fetch payment by slug {}: {}", slug, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/employee-list",
    tag = "Payments",
    params(
        ("page" = Option<String>, Query, description = "1-based page number"),
        ("limit" = Option<String>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "One page of payments sorted by pay period"),
        (status = 400, description = "Non-positive or non-numeric page parameters")
    )
)]
pub async fn list_paginated(db: web::Data<MongoDB>, query: web::Query<PageQuery>) -> HttpResponse {
    log::info!(
        "📄 GET /employee-list - page: {:?}, limit: {:?}",
        query.page,
        query.limit
    );

    match payment_service::list_paginated(&db, &query).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => {
            log::warn!("❌ Failed to list payments page: {}", e);
            e.error_response()
        }
    }
}

/// Email from the claims AuthMiddleware attached; "anonymous" on the public
/// routes that share these handlers' logging.
fn requester_email(req: &HttpRequest) -> String {
    req.extensions()
        .get::<Claims>()
        .map(|c| c.sub.clone())
        .unwrap_or_else(|| "anonymous".to_string())
}
