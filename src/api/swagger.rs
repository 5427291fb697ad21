use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payroll Service API",
        version = "1.0.0",
        description = "Employee/payroll management backend. \n\n**Authentication:** payment creation, payment listing and payment-intent creation require the `token` session cookie issued by POST /jwt. Everything else is public.",
    ),
    paths(
        // Session
        crate::api::auth::issue_token,
        crate::api::auth::logout,

        // Health
        crate::api::health::health_check,

        // Users
        crate::api::users::create_user,
        crate::api::users::get_user,
        crate::api::users::list_employees,

        // Work sheets
        crate::api::work_sheets::progress,

        // Payments
        crate::api::payments::create_intent,
        crate::api::payments::create_payment,
        crate::api::payments::list_paginated,
    ),
    components(
        schemas(
            crate::api::auth::IdentityRequest,
            crate::api::health::HealthResponse,
            crate::api::users::AdjustSalaryRequest,
            crate::services::user_service::UpdateUserRequest,
            crate::services::stripe_service::CreateIntentRequest,
            crate::services::stripe_service::CreateIntentResponse,
            crate::services::payment_service::PaymentCreated,
        )
    ),
    modifiers(&CookieAuth),
    tags(
        (name = "Session", description = "Session token issue/revoke endpoints. The token is carried in an HTTP-only cookie."),
        (name = "Health", description = "Liveness and health endpoints."),
        (name = "Users", description = "Employee record management."),
        (name = "WorkSheets", description = "Timesheet entries and progress queries."),
        (name = "Payments", description = "Payment records, pagination and payment-intent creation."),
    )
)]
pub struct ApiDoc;

struct CookieAuth;

impl Modify for CookieAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("token"))),
            );
        }
    }
}
