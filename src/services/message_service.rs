use crate::{
    database::{self, MongoDB},
    utils::error::AppError,
};
use futures::stream::StreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, DateTime as BsonDateTime, Document};

/// Messages are free-form: the JSON body is stored verbatim as a document.
/// Non-object bodies cannot become documents and are rejected.
pub async fn create_message(
    db: &MongoDB,
    payload: &serde_json::Value,
) -> Result<ObjectId, AppError> {
    let mut document = bson::to_document(payload)
        .map_err(|_| AppError::InvalidRequest("message body must be a JSON object".to_string()))?;
    document.remove("_id");
    document.insert("created_at", BsonDateTime::now());

    let collection = db.collection::<Document>(database::MESSAGES);
    let result = collection
        .insert_one(document)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| AppError::Internal("insert returned no ObjectId".to_string()))
}

pub async fn list_messages(db: &MongoDB) -> Result<Vec<Document>, AppError> {
    let collection = db.collection::<Document>(database::MESSAGES);

    let mut cursor = collection
        .find(doc! {})
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let mut messages = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(message) => messages.push(message),
            Err(e) => log::error!("Error reading message: {}", e),
        }
    }

    Ok(messages)
}
