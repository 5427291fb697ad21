use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Payment record for one employee and one pay period. Field names stay in
/// camelCase on the wire because the frontend contract predates this service.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct Payment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub _id: Option<ObjectId>,
    /// Hex string of the referenced user `_id`
    #[serde(rename = "employeeId")]
    pub employee_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub salary: f64,
    #[serde(rename = "payMonth")]
    pub pay_month: i32,
    #[serde(rename = "payYear")]
    pub pay_year: i32,
    #[serde(rename = "transactionId", skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub created_at: Option<BsonDateTime>,
}
