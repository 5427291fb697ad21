mod api;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let mongodb_uri =
        env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let database_name = env::var("MONGODB_DATABASE").unwrap_or_else(|_| "payrollDb".to_string());

    log::info!("🚀 Starting Payroll Service...");

    // Initialize MongoDB connection pool
    let db = database::MongoDB::new(&mongodb_uri, &database_name)
        .await
        .expect("Failed to connect to MongoDB");
    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    let cors_origins = env::var("CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173,http://localhost:5174".to_string());

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!(
        "📚 Swagger UI available at: http://{}:{}/swagger-ui/",
        host,
        port
    );

    // Start HTTP server. Auth policy is declarative: the resources wrapped
    // with AuthMiddleware below are the complete protected set.
    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);
        for origin in cors_origins.split(',').map(str::trim).filter(|o| !o.is_empty()) {
            cors = cors.allowed_origin(origin);
        }

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi),
            )
            // Liveness + health
            .route("/", web::get().to(api::health::liveness))
            .route("/health", web::get().to(api::health::health_check))
            // Session
            .route("/jwt", web::post().to(api::auth::issue_token))
            .route("/logout", web::get().to(api::auth::logout))
            // Users
            .route("/users", web::post().to(api::users::create_user))
            .route("/user/{email}", web::get().to(api::users::get_user))
            .route(
                "/verified/employees",
                web::get().to(api::users::list_verified_employees),
            )
            .route("/employees", web::get().to(api::users::list_employees))
            .route(
                "/admin/update/{email}",
                web::patch().to(api::users::update_user),
            )
            .route(
                "/employees/update/{email}",
                web::patch().to(api::users::update_user),
            )
            .route(
                "/employees/fire/{id}",
                web::patch().to(api::users::fire_employee),
            )
            .route(
                "/employees/adjust-salary/{id}",
                web::patch().to(api::users::adjust_salary),
            )
            .route(
                "/employee/{id}/salary",
                web::get().to(api::users::get_salary),
            )
            // Work sheets
            .route(
                "/workSheets",
                web::post().to(api::work_sheets::create_work_sheet),
            )
            .route(
                "/workSheet/{email}",
                web::get().to(api::work_sheets::list_by_email),
            )
            .route("/progress", web::get().to(api::work_sheets::progress))
            // Payments - protected: creation and full listing require a session
            .service(
                web::resource("/payments")
                    .wrap(middleware::AuthMiddleware)
                    .route(web::get().to(api::payments::list_payments))
                    .route(web::post().to(api::payments::create_payment)),
            )
            .service(
                web::resource("/create-payment-intent")
                    .wrap(middleware::AuthMiddleware)
                    .route(web::post().to(api::payments::create_intent)),
            )
            .route("/payments/{id}", web::get().to(api::payments::get_payment))
            .route("/details/{slug}", web::get().to(api::payments::get_by_slug))
            .route(
                "/employee-list",
                web::get().to(api::payments::list_paginated),
            )
            // Messages
            .route("/messageA", web::post().to(api::messages::create_message))
            .route("/messageA", web::get().to(api::messages::list_messages))
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
