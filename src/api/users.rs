use crate::database::MongoDB;
use crate::models::User;
use crate::services::user_service::{self, CreateUserOutcome, UpdateUserRequest};
use crate::utils::error::AppError;
use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;

#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "User created, or sentinel when the email already exists")
    )
)]
pub async fn create_user(db: web::Data<MongoDB>, user: web::Json<User>) -> HttpResponse {
    log::info!("📝 POST /users - email: {}", user.email);

    match user_service::create_user(&db, user.into_inner()).await {
        Ok(CreateUserOutcome::Created(id)) => {
            log::info!("✅ User created: {}", id.to_hex());
            HttpResponse::Ok().json(serde_json::json!({
                "acknowledged": true,
                "insertedId": id.to_hex(),
            }))
        }
        Ok(CreateUserOutcome::AlreadyExists) => HttpResponse::Ok().json(serde_json::json!({
            "message": "user already exist",
            "insertedId": null,
        })),
        Err(e) => {
            log::error!("❌ Failed to create user: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/user/{email}",
    tag = "Users",
    params(
        ("email" = String, Path, description = "User email")
    ),
    responses(
        (status = 200, description = "User document"),
        (status = 404, description = "No user with that email")
    )
)]
pub async fn get_user(db: web::Data<MongoDB>, path: web::Path<String>) -> HttpResponse {
    let email = path.into_inner();
    log::info!("👤 GET /user/{}", email);

    match user_service::get_user_by_email(&db, &email).await {
        Ok(Some(user)) => HttpResponse::Ok().json(user),
        Ok(None) => AppError::NotFound(format!("user {} not found", email)).error_response(),
        Err(e) => {
            log::error!("❌ Failed to fetch user {}: {}", email, e);
            e.error_response()
        }
    }
}

pub async fn list_verified_employees(db: web::Data<MongoDB>) -> HttpResponse {
    log::info!("👥 GET /verified/employees");

    match user_service::list_verified_employees(&db).await {
        Ok(users) => HttpResponse::Ok().json(users),
        Err(e) => {
            log::error!("❌ Failed to list verified employees: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/employees",
    tag = "Users",
    responses(
        (status = 200, description = "All users with role Employee")
    )
)]
pub async fn list_employees(db: web::Data<MongoDB>) -> HttpResponse {
    log::info!("👥 GET /employees");

    match user_service::list_employees(&db).await {
        Ok(users) => HttpResponse::Ok().json(users),
        Err(e) => {
            log::error!("❌ Failed to list employees: {}", e);
            e.error_response()
        }
    }
}

/// Shared by PATCH /admin/update/{email} and PATCH /employees/update/{email}.
pub async fn update_user(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<UpdateUserRequest>,
) -> HttpResponse {
    let email = path.into_inner();
    log::info!("✏️  PATCH update user {}", email);

    match user_service::update_user_by_email(&db, &email, &request).await {
        Ok(counts) => HttpResponse::Ok().json(counts),
        Err(e) => {
            log::warn!("❌ Failed to update user {}: {}", email, e);
            e.error_response()
        }
    }
}

pub async fn fire_employee(db: web::Data<MongoDB>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    log::info!("🚫 PATCH /employees/fire/{}", id);

    match user_service::fire_employee(&db, &id).await {
        Ok(counts) => HttpResponse::Ok().json(counts),
        Err(e) => {
            log::warn!("❌ Failed to fire employee {}: {}", id, e);
            e.error_response()
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AdjustSalaryRequest {
    pub salary: Option<f64>,
}

pub async fn adjust_salary(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<AdjustSalaryRequest>,
) -> HttpResponse {
    let id = path.into_inner();
    log::info!("💵 PATCH /employees/adjust-salary/{}", id);

    let salary = match request.salary {
        Some(salary) => salary,
        None => {
            return AppError::InvalidRequest("salary is required".to_string()).error_response()
        }
    };

    match user_service::adjust_salary(&db, &id, salary).await {
        Ok(counts) => HttpResponse::Ok().json(counts),
        Err(e) => {
            log::warn!("❌ Failed to adjust salary for {}: {}", id, e);
            e.error_response()
        }
    }
}

pub async fn get_salary(db: web::Data<MongoDB>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    log::info!("💵 GET /employee/{}/salary", id);

    match user_service::get_salary(&db, &id).await {
        Ok(salary) => HttpResponse::Ok().json(serde_json::json!({ "salary": salary })),
        Err(e) => {
            log::warn!("❌ Failed to fetch salary for {}: {}", id, e);
            e.error_response()
        }
    }
}
