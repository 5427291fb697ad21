use crate::{
    database::{self, MongoDB},
    models::User,
    utils::error::AppError,
};
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum CreateUserOutcome {
    Created(ObjectId),
    AlreadyExists,
}

/// Partial update body. Only the fields present are written ($set semantics);
/// everything else on the document is untouched.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub status: Option<bool>,
    pub salary: Option<f64>,
    pub payment: Option<bool>,
    pub fired: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct UpdateCounts {
    #[serde(rename = "matchedCount")]
    pub matched_count: u64,
    #[serde(rename = "modifiedCount")]
    pub modified_count: u64,
}

/// Idempotent user creation: posting an email that already exists is a no-op
/// reported through `AlreadyExists`, not an error. The unique index on
/// `users.email` closes the race between the existence check and the insert,
/// so a concurrent duplicate surfaces as a duplicate-key write error here.
pub async fn create_user(db: &MongoDB, mut user: User) -> Result<CreateUserOutcome, AppError> {
    let collection = db.collection::<User>(database::USERS);

    let existing = collection
        .find_one(doc! { "email": &user.email })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    if existing.is_some() {
        return Ok(CreateUserOutcome::AlreadyExists);
    }

    user._id = None;
    if user.created_at.is_none() {
        user.created_at = Some(BsonDateTime::now());
    }

    match collection.insert_one(&user).await {
        Ok(result) => {
            let id = result
                .inserted_id
                .as_object_id()
                .ok_or_else(|| AppError::Internal("insert returned no ObjectId".to_string()))?;
            Ok(CreateUserOutcome::Created(id))
        }
        Err(e) if is_duplicate_key(&e) => Ok(CreateUserOutcome::AlreadyExists),
        Err(e) => Err(AppError::Database(e.to_string())),
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};
    matches!(
        &*err.kind,
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == 11000
    )
}

pub async fn get_user_by_email(db: &MongoDB, email: &str) -> Result<Option<User>, AppError> {
    let collection = db.collection::<User>(database::USERS);

    collection
        .find_one(doc! { "email": email })
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Users with the verified flag set.
pub async fn list_verified_employees(db: &MongoDB) -> Result<Vec<User>, AppError> {
    let collection = db.collection::<User>(database::USERS);

    let mut cursor = collection
        .find(doc! { "status": true })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let mut users = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(user) => users.push(user),
            Err(e) => log::error!("Error reading user: {}", e),
        }
    }

    Ok(users)
}

pub async fn list_employees(db: &MongoDB) -> Result<Vec<User>, AppError> {
    let collection = db.collection::<User>(database::USERS);

    let mut cursor = collection
        .find(doc! { "role": "Employee" })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let mut users = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(user) => users.push(user),
            Err(e) => log::error!("Error reading user: {}", e),
        }
    }

    Ok(users)
}

/// Builds the `$set` document from the fields present in the request.
/// An empty update is a client error, not a silent no-op.
pub fn build_update_document(request: &UpdateUserRequest) -> Result<Document, AppError> {
    let mut set = Document::new();
    if let Some(name) = &request.name {
        set.insert("name", name.clone());
    }
    if let Some(role) = &request.role {
        set.insert("role", role.clone());
    }
    if let Some(status) = request.status {
        set.insert("status", status);
    }
    if let Some(salary) = request.salary {
        set.insert("salary", salary);
    }
    if let Some(payment) = request.payment {
        set.insert("payment", payment);
    }
    if let Some(fired) = request.fired {
        set.insert("fired", fired);
    }

    if set.is_empty() {
        return Err(AppError::InvalidRequest("no fields to update".to_string()));
    }

    Ok(set)
}

pub async fn update_user_by_email(
    db: &MongoDB,
    email: &str,
    request: &UpdateUserRequest,
) -> Result<UpdateCounts, AppError> {
    let set = build_update_document(request)?;
    let collection = db.collection::<User>(database::USERS);

    let result = collection
        .update_one(doc! { "email": email }, doc! { "$set": set })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound(format!("user {} not found", email)));
    }

    Ok(UpdateCounts {
        matched_count: result.matched_count,
        modified_count: result.modified_count,
    })
}

/// Marks a user as fired by `_id`.
pub async fn fire_employee(db: &MongoDB, id: &str) -> Result<UpdateCounts, AppError> {
    let oid = ObjectId::parse_str(id)
        .map_err(|_| AppError::InvalidRequest(format!("invalid employee id '{}'", id)))?;
    let collection = db.collection::<User>(database::USERS);

    let result = collection
        .update_one(doc! { "_id": oid }, doc! { "$set": { "fired": true } })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound(format!("user {} not found", id)));
    }

    Ok(UpdateCounts {
        matched_count: result.matched_count,
        modified_count: result.modified_count,
    })
}

pub async fn adjust_salary(db: &MongoDB, id: &str, salary: f64) -> Result<UpdateCounts, AppError> {
    if !salary.is_finite() || salary <= 0.0 {
        return Err(AppError::InvalidRequest(
            "salary must be a positive number".to_string(),
        ));
    }

    let oid = ObjectId::parse_str(id)
        .map_err(|_| AppError::InvalidRequest(format!("invalid employee id '{}'", id)))?;
    let collection = db.collection::<User>(database::USERS);

    let result = collection
        .update_one(doc! { "_id": oid }, doc! { "$set": { "salary": salary } })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound(format!("user {} not found", id)));
    }

    Ok(UpdateCounts {
        matched_count: result.matched_count,
        modified_count: result.modified_count,
    })
}

pub async fn get_salary(db: &MongoDB, id: &str) -> Result<Option<f64>, AppError> {
    let oid = ObjectId::parse_str(id)
        .map_err(|_| AppError::InvalidRequest(format!("invalid employee id '{}'", id)))?;
    let collection = db.collection::<User>(database::USERS);

    let user = collection
        .find_one(doc! { "_id": oid })
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound(format!("user {} not found", id)))?;

    Ok(user.salary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_request() -> UpdateUserRequest {
        UpdateUserRequest {
            name: None,
            role: None,
            status: None,
            salary: None,
            payment: None,
            fired: None,
        }
    }

    #[test]
    fn update_document_contains_only_present_fields() {
        let request = UpdateUserRequest {
            status: Some(true),
            salary: Some(1200.0),
            ..empty_request()
        };
        let set = build_update_document(&request).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get_bool("status").unwrap(), true);
        assert_eq!(set.get_f64("salary").unwrap(), 1200.0);
        assert!(set.get("name").is_none());
    }

    #[test]
    fn empty_update_is_rejected() {
        assert!(build_update_document(&empty_request()).is_err());
    }

    #[test]
    fn false_and_zero_values_are_still_written() {
        let request = UpdateUserRequest {
            status: Some(false),
            fired: Some(false),
            ..empty_request()
        };
        let set = build_update_document(&request).unwrap();
        assert_eq!(set.get_bool("status").unwrap(), false);
        assert_eq!(set.get_bool("fired").unwrap(), false);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn duplicate_email_returns_already_exists() {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db = MongoDB::new(&uri, "payrollDb_test").await.unwrap();

        let email = format!("{}@test.local", uuid::Uuid::new_v4());
        let user = User {
            _id: None,
            email: email.clone(),
            name: Some("Test".to_string()),
            role: Some("Employee".to_string()),
            status: false,
            salary: None,
            payment: None,
            fired: None,
            created_at: None,
        };

        let first = create_user(&db, user.clone()).await.unwrap();
        assert!(matches!(first, CreateUserOutcome::Created(_)));

        let second = create_user(&db, user).await.unwrap();
        assert!(matches!(second, CreateUserOutcome::AlreadyExists));
    }
}
