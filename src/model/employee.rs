use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub rank: Option<String>,
    pub status: String,
    /// Slot on the edge sensor holding this employee's biometric template (1-127).
    pub template_id: Option<i64>,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}
