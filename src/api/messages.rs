use crate::database::MongoDB;
use crate::services::message_service;
use actix_web::{web, HttpResponse, ResponseError};

pub async fn create_message(
    db: web::Data<MongoDB>,
    payload: web::Json<serde_json::Value>,
) -> HttpResponse {
    log::info!("✉️  POST /messageA");

    match message_service::create_message(&db, &payload).await {
        Ok(id) => HttpResponse::Ok().json(serde_json::json!({
            "acknowledged": true,
            "insertedId": id.to_hex(),
        })),
        Err(e) => {
            log::warn!("❌ Failed to store message: {}", e);
            e.error_response()
        }
    }
}

pub async fn list_messages(db: web::Data<MongoDB>) -> HttpResponse {
    log::info!("✉️  GET /messageA");

    match message_service::list_messages(&db).await {
        Ok(messages) => HttpResponse::Ok().json(messages),
        Err(e) => {
            log::error!("❌ Failed to list messages: {}", e);
            e.error_response()
        }
    }
}
