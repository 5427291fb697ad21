use crate::{
    database::{self, MongoDB},
    models::WorkSheet,
    utils::error::AppError,
};
use chrono::{Datelike, NaiveDate};
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    pub employee: Option<String>,
    pub month: Option<String>,
}

pub async fn create_work_sheet(db: &MongoDB, mut sheet: WorkSheet) -> Result<ObjectId, AppError> {
    let collection = db.collection::<WorkSheet>(database::WORK_SHEETS);

    sheet._id = None;
    let result = collection
        .insert_one(&sheet)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| AppError::Internal("insert returned no ObjectId".to_string()))
}

pub async fn list_by_email(db: &MongoDB, email: &str) -> Result<Vec<WorkSheet>, AppError> {
    let collection = db.collection::<WorkSheet>(database::WORK_SHEETS);

    let mut cursor = collection
        .find(doc! { "email": email })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let mut sheets = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(sheet) => sheets.push(sheet),
            Err(e) => log::error!("Error reading work sheet: {}", e),
        }
    }

    Ok(sheets)
}

/// First and last day of a "YYYY-MM" month, both inclusive, as ISO strings.
pub fn month_bounds(month: &str) -> Result<(String, String), AppError> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidRequest(format!("month must be YYYY-MM, got '{}'", month)))?;

    let (next_year, next_month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| AppError::InvalidRequest(format!("month out of range: '{}'", month)))?;

    Ok((
        first.format("%Y-%m-%d").to_string(),
        last.format("%Y-%m-%d").to_string(),
    ))
}

/// Filter for /progress: exact match on the employee name, inclusive date
/// range over the requested month. Both parameters are optional.
pub fn build_progress_filter(query: &ProgressQuery) -> Result<Document, AppError> {
    let mut filter = Document::new();

    if let Some(employee) = query.employee.as_deref().filter(|e| !e.is_empty()) {
        filter.insert("name", employee);
    }

    if let Some(month) = query.month.as_deref().filter(|m| !m.is_empty()) {
        let (first, last) = month_bounds(month)?;
        filter.insert("date", doc! { "$gte": first, "$lte": last });
    }

    Ok(filter)
}

pub async fn progress(db: &MongoDB, query: &ProgressQuery) -> Result<Vec<WorkSheet>, AppError> {
    let filter = build_progress_filter(query)?;
    let collection = db.collection::<WorkSheet>(database::WORK_SHEETS);

    let mut cursor = collection
        .find(filter)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let mut sheets = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(sheet) => sheets.push(sheet),
            Err(e) => log::error!("Error reading work sheet: {}", e),
        }
    }

    Ok(sheets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_regular_month() {
        let (first, last) = month_bounds("2024-03").unwrap();
        assert_eq!(first, "2024-03-01");
        assert_eq!(last, "2024-03-31");
    }

    #[test]
    fn month_bounds_leap_february() {
        let (_, last) = month_bounds("2024-02").unwrap();
        assert_eq!(last, "2024-02-29");
        let (_, last) = month_bounds("2023-02").unwrap();
        assert_eq!(last, "2023-02-28");
    }

    #[test]
    fn month_bounds_december_rolls_over_the_year() {
        let (first, last) = month_bounds("2023-12").unwrap();
        assert_eq!(first, "2023-12-01");
        assert_eq!(last, "2023-12-31");
    }

    #[test]
    fn month_bounds_rejects_garbage() {
        assert!(month_bounds("not-a-month").is_err());
        assert!(month_bounds("2024-13").is_err());
        assert!(month_bounds("").is_err());
    }

    #[test]
    fn progress_filter_empty_query_matches_everything() {
        let query = ProgressQuery {
            employee: None,
            month: None,
        };
        assert!(build_progress_filter(&query).unwrap().is_empty());
    }

    #[test]
    fn progress_filter_combines_name_and_range() {
        let query = ProgressQuery {
            employee: Some("Alice".to_string()),
            month: Some("2024-03".to_string()),
        };
        let filter = build_progress_filter(&query).unwrap();
        assert_eq!(filter.get_str("name").unwrap(), "Alice");
        let range = filter.get_document("date").unwrap();
        assert_eq!(range.get_str("$gte").unwrap(), "2024-03-01");
        assert_eq!(range.get_str("$lte").unwrap(), "2024-03-31");
    }

    #[test]
    fn progress_filter_ignores_empty_strings() {
        let query = ProgressQuery {
            employee: Some(String::new()),
            month: Some(String::new()),
        };
        assert!(build_progress_filter(&query).unwrap().is_empty());
    }
}
