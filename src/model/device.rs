use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An edge clock-in terminal. Rows are created implicitly on first contact
/// (auto-enrollment); the registry owns `status`/`last_seen` and the last
/// reported position, while the friendly name and permitted zone are only
/// touched by administrator edits.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: i64,
    /// Stable hardware identifier reported by the device itself.
    pub device_id: String,
    pub name: String,
    pub status: String,
    pub last_seen: Option<DateTime<Utc>>,
    pub last_lat: Option<f64>,
    pub last_lng: Option<f64>,
    // Permitted zone: center + radius in meters. All three present = geofence on.
    pub allowed_lat: Option<f64>,
    pub allowed_lng: Option<f64>,
    pub allowed_radius: Option<f64>,
}

impl Device {
    pub fn geofence(&self) -> Option<(f64, f64, f64)> {
        match (self.allowed_lat, self.allowed_lng, self.allowed_radius) {
            (Some(lat), Some(lng), Some(radius)) => Some((lat, lng, radius)),
            _ => None,
        }
    }
}
