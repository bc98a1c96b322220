use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Append-only audit entry, one per event received. Never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceLog {
    pub id: i64,
    pub employee_id: i64,
    pub device_id: Option<String>,
    pub template_id: i64,
    pub outcome: String,
    pub reason: Option<String>,
    pub risk_level: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub timestamp: DateTime<Utc>,
}
