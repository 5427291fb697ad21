use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Employee/HR/Admin account. `email` is the natural key and carries a unique
/// index; everything else is merge-updated field by field.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub _id: Option<ObjectId>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// "Employee", "HR" or "Admin"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Verified flag, flipped by HR through the update endpoints
    #[serde(default)]
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    /// Set to true by the payment path once a payment references this user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fired: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub created_at: Option<BsonDateTime>,
}
