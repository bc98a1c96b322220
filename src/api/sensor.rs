use crate::{
    config::Config,
    error::PipelineError,
    pipeline::{AppState, device_registry, identity},
};
use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::info;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SensorReport {
    /// Free-form device status; `ENROLL_SUCCESS`/`ENROLL_FAILED` resolve a
    /// pending enrollment.
    pub status: Option<String>,
    pub message: Option<String>,
    pub secret: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub device_id: Option<String>,
}

/// Device heartbeat / command poll
///
/// The heartbeat and location sample are recorded before the secret check:
/// position telemetry is accepted from any device that knows the endpoint,
/// while the status report and command channel stay behind the secret.
#[utoipa::path(
    post,
    path = "/sensor/update",
    request_body = SensorReport,
    responses(
        (status = 200, description = "Command for the device", body = Object,
            example = json!({"command": "ENROLL", "targetId": 7})),
        (status = 401, description = "Secret mismatch"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Sensor"
)]
pub async fn update(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    state: web::Data<AppState>,
    payload: web::Json<SensorReport>,
) -> Result<HttpResponse, PipelineError> {
    let report = payload.into_inner();
    let now = Utc::now();

    let point = match (report.lat, report.lng) {
        (Some(lat), Some(lng)) => Some((lat, lng)),
        _ => None,
    };

    if let Some(device_id) = report.device_id.as_deref() {
        device_registry::record_heartbeat(pool.get_ref(), device_id, point, now).await?;
    }

    if !identity::secret_matches(&report.secret, &config.sensor_secret) {
        return Err(PipelineError::Unauthorized);
    }

    let mut enrollment = state.enrollment.lock().await;
    match report.status.as_deref() {
        Some("ENROLL_SUCCESS") => {
            info!(device_id = ?report.device_id, "device reported enrollment success");
            enrollment.resolve(true, report.message.as_deref());
        }
        Some("ENROLL_FAILED") => {
            info!(device_id = ?report.device_id, "device reported enrollment failure");
            enrollment.resolve(false, report.message.as_deref());
        }
        _ => {}
    }

    let (command, target_id) = enrollment.command();
    Ok(HttpResponse::Ok().json(json!({
        "command": command,
        "targetId": target_id,
    })))
}

/// Next free template slot
///
/// Lowest unused ID in 1..=127; 409 once the sensor's capacity is exhausted.
#[utoipa::path(
    get,
    path = "/sensor/next-id",
    responses(
        (status = 200, description = "Next free slot", body = Object, example = json!({"nextId": 3})),
        (status = 409, description = "All 127 slots in use"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Sensor"
)]
pub async fn next_template_id(
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, PipelineError> {
    let used: Vec<i64> =
        sqlx::query_scalar("SELECT template_id FROM employees WHERE template_id IS NOT NULL")
            .fetch_all(pool.get_ref())
            .await?;

    match identity::lowest_free_template_id(&used) {
        Some(next_id) => Ok(HttpResponse::Ok().json(json!({ "nextId": next_id }))),
        None => Ok(HttpResponse::Conflict().json(json!({
            "error": "No free template slots"
        }))),
    }
}
