use crate::{
    database::{self, MongoDB},
    models::{Payment, User},
    utils::error::AppError,
};
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PaymentCreated {
    #[serde(rename = "insertedId")]
    pub inserted_id: String,
    /// Whether the referenced user's `payment` flag was actually flipped.
    /// The insert and the flag update are two independent writes; a payment
    /// with an unknown employeeId still exists afterwards.
    #[serde(rename = "userUpdated")]
    pub user_updated: bool,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentPage {
    pub payments: Vec<Payment>,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
    pub page: i64,
    pub limit: i64,
}

/// Inserts the payment, then flags the referenced user as paid. No
/// transaction: if the flag update fails after the insert the payment record
/// remains, and the caller sees `userUpdated: false` or an error.
pub async fn create_payment(db: &MongoDB, mut payment: Payment) -> Result<PaymentCreated, AppError> {
    if !payment.salary.is_finite() || payment.salary <= 0.0 {
        return Err(AppError::InvalidRequest(
            "salary must be a positive number".to_string(),
        ));
    }
    if !(1..=12).contains(&payment.pay_month) {
        return Err(AppError::InvalidRequest(format!(
            "payMonth must be in 1..=12, got {}",
            payment.pay_month
        )));
    }

    payment._id = None;
    if payment.created_at.is_none() {
        payment.created_at = Some(BsonDateTime::now());
    }

    let payments = db.collection::<Payment>(database::PAYMENTS);
    let result = payments
        .insert_one(&payment)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    let inserted_id = result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| AppError::Internal("insert returned no ObjectId".to_string()))?;

    let user_updated = match ObjectId::parse_str(&payment.employee_id) {
        Ok(oid) => {
            let users = db.collection::<User>(database::USERS);
            let update = users
                .update_one(doc! { "_id": oid }, doc! { "$set": { "payment": true } })
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            if update.matched_count == 0 {
                log::warn!(
                    "⚠️  Payment {} references unknown employee {}",
                    inserted_id.to_hex(),
                    payment.employee_id
                );
            }
            update.matched_count > 0
        }
        Err(_) => {
            log::warn!(
                "⚠️  Payment {} has a malformed employeeId '{}'",
                inserted_id.to_hex(),
                payment.employee_id
            );
            false
        }
    };

    Ok(PaymentCreated {
        inserted_id: inserted_id.to_hex(),
        user_updated,
    })
}

pub async fn get_by_id(db: &MongoDB, id: &str) -> Result<Option<Payment>, AppError> {
    let oid = ObjectId::parse_str(id)
        .map_err(|_| AppError::InvalidRequest(format!("invalid payment id '{}'", id)))?;
    let collection = db.collection::<Payment>(database::PAYMENTS);

    collection
        .find_one(doc! { "_id": oid })
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// The slug is ambiguous by contract: it matches either the payment's email
/// or its employeeId.
pub fn slug_filter(slug: &str) -> Document {
    doc! {
        "$or": [
            { "email": slug },
            { "employeeId": slug },
        ]
    }
}

pub async fn get_by_slug(db: &MongoDB, slug: &str) -> Result<Option<Payment>, AppError> {
    let collection = db.collection::<Payment>(database::PAYMENTS);

    collection
        .find_one(slug_filter(slug))
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

pub async fn list_all(db: &MongoDB) -> Result<Vec<Payment>, AppError> {
    let collection = db.collection::<Payment>(database::PAYMENTS);

    let mut cursor = collection
        .find(doc! {})
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let mut payments = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(payment) => payments.push(payment),
            Err(e) => log::error!("Error reading payment: {}", e),
        }
    }

    Ok(payments)
}

/// Positive-integer parsing for the page window. Non-numeric, zero or
/// negative input is rejected before any skip/limit arithmetic happens.
pub fn parse_page_params(query: &PageQuery) -> Result<(i64, i64), AppError> {
    let page = match query.page.as_deref() {
        None => 1,
        Some(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|p| *p > 0)
            .ok_or_else(|| {
                AppError::InvalidRequest(format!("page must be a positive integer, got '{}'", raw))
            })?,
    };
    let limit = match query.limit.as_deref() {
        None => 10,
        Some(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|l| *l > 0)
            .ok_or_else(|| {
                AppError::InvalidRequest(format!("limit must be a positive integer, got '{}'", raw))
            })?,
    };
    Ok((page, limit))
}

pub fn total_pages(total: u64, limit: i64) -> u64 {
    (total + limit as u64 - 1) / limit as u64
}

/// Paginated listing sorted ascending by pay period.
pub async fn list_paginated(db: &MongoDB, query: &PageQuery) -> Result<PaymentPage, AppError> {
    let (page, limit) = parse_page_params(query)?;
    let collection = db.collection::<Payment>(database::PAYMENTS);

    let total = collection
        .count_documents(doc! {})
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let options = mongodb::options::FindOptions::builder()
        .sort(doc! { "payYear": 1, "payMonth": 1 })
        .skip(((page - 1) * limit) as u64)
        .limit(limit)
        .build();

    let mut cursor = collection
        .find(doc! {})
        .with_options(options)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let mut payments = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(payment) => payments.push(payment),
            Err(e) => log::error!("Error reading payment: {}", e),
        }
    }

    Ok(PaymentPage {
        payments,
        total,
        total_pages: total_pages(total, limit),
        page,
        limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(String::from),
            limit: limit.map(String::from),
        }
    }

    #[test]
    fn page_params_default_when_absent() {
        assert_eq!(parse_page_params(&query(None, None)).unwrap(), (1, 10));
    }

    #[test]
    fn page_params_parse_positive_integers() {
        assert_eq!(
            parse_page_params(&query(Some("2"), Some("5"))).unwrap(),
            (2, 5)
        );
    }

    #[test]
    fn page_params_reject_bad_input() {
        assert!(parse_page_params(&query(Some("abc"), None)).is_err());
        assert!(parse_page_params(&query(Some("0"), None)).is_err());
        assert!(parse_page_params(&query(Some("-3"), None)).is_err());
        assert!(parse_page_params(&query(None, Some("2.5"))).is_err());
    }

    #[test]
    fn total_pages_is_a_ceiling() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(12, 5), 3);
        assert_eq!(total_pages(1, 10), 1);
    }

    #[test]
    fn slug_filter_matches_email_or_employee_id() {
        let filter = slug_filter("a@x.com");
        let branches = filter.get_array("$or").unwrap();
        assert_eq!(branches.len(), 2);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn payment_flags_referenced_user_as_paid() {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db = MongoDB::new(&uri, "payrollDb_test").await.unwrap();

        let email = format!("{}@test.local", uuid::Uuid::new_v4());
        let user = User {
            _id: None,
            email: email.clone(),
            name: Some("Paid".to_string()),
            role: Some("Employee".to_string()),
            status: true,
            salary: Some(900.0),
            payment: None,
            fired: None,
            created_at: None,
        };
        let outcome = crate::services::user_service::create_user(&db, user)
            .await
            .unwrap();
        let user_id = match outcome {
            crate::services::user_service::CreateUserOutcome::Created(id) => id,
            _ => panic!("user should have been created"),
        };

        let payment = Payment {
            _id: None,
            employee_id: user_id.to_hex(),
            email: Some(email.clone()),
            name: None,
            salary: 900.0,
            pay_month: 3,
            pay_year: 2024,
            transaction_id: None,
            created_at: None,
        };
        let created = create_payment(&db, payment).await.unwrap();
        assert!(created.user_updated);

        let reloaded = crate::services::user_service::get_user_by_email(&db, &email)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.payment, Some(true));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn payment_with_unknown_employee_still_exists() {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db = MongoDB::new(&uri, "payrollDb_test").await.unwrap();

        let payment = Payment {
            _id: None,
            employee_id: ObjectId::new().to_hex(),
            email: None,
            name: None,
            salary: 100.0,
            pay_month: 1,
            pay_year: 2024,
            transaction_id: None,
            created_at: None,
        };
        let created = create_payment(&db, payment).await.unwrap();
        assert!(!created.user_updated);

        let stored = get_by_id(&db, &created.inserted_id).await.unwrap();
        assert!(stored.is_some());
    }
}
