use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Timesheet entry. Insert-only: there are no update or delete endpoints.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WorkSheet {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    /// ISO date, "YYYY-MM-DD". Stored as a string so the month-range filter
    /// can compare lexicographically.
    pub date: String,
}
