use crate::database::MongoDB;
use crate::models::WorkSheet;
use crate::services::work_sheet_service::{self, ProgressQuery};
use actix_web::{web, HttpResponse, ResponseError};

pub async fn create_work_sheet(
    db: web::Data<MongoDB>,
    sheet: web::Json<WorkSheet>,
) -> HttpResponse {
    log::info!("🗒️  POST /workSheets - email: {}", sheet.email);

    match work_sheet_service::create_work_sheet(&db, sheet.into_inner()).await {
        Ok(id) => HttpResponse::Ok().json(serde_json::json!({
            "acknowledged": true,
            "insertedId": id.to_hex(),
        })),
        Err(e) => {
            log::error!("❌ Failed to create work sheet: {}", e);
            e.error_response()
        }
    }
}

pub async fn list_by_email(db: web::Data<MongoDB>, path: web::Path<String>) -> HttpResponse {
    let email = path.into_inner();
    log::info!("🗒️  GET /workSheet/{}", email);

    match work_sheet_service::list_by_email(&db, &email).await {
        Ok(sheets) => HttpResponse::Ok().json(sheets),
        Err(e) => {
            log::error!("❌ Failed to list work sheets for {}: {}", email, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/progress",
    tag = "WorkSheets",
    params(
        ("employee" = Option<String>, Query, description = "Exact employee name"),
        ("month" = Option<String>, Query, description = "Month filter, YYYY-MM")
    ),
    responses(
        (status = 200, description = "Work-sheet entries matching the filter"),
        (status = 400, description = "Malformed month parameter")
    )
)]
pub async fn progress(db: web::Data<MongoDB>, query: web::Query<ProgressQuery>) -> HttpResponse {
    log::info!(
        "📈 GET /progress - employee: {:?}, month: {:?}",
        query.employee,
        query.month
    );

    match work_sheet_service::progress(&db, &query).await {
        Ok(sheets) => HttpResponse::Ok().json(sheets),
        Err(e) => {
            log::warn!("❌ Progress query failed: {}", e);
            e.error_response()
        }
    }
}
