use crate::{
    config::Config,
    error::PipelineError,
    model::{attendance::AttendanceRecord, attendance_log::AttendanceLog},
    pipeline::{
        AppState, audit,
        audit::{AuditEntry, RejectReason, RiskLevel},
        device_registry,
        device_registry::DeviceLookup,
        geofence,
        geofence::GeofenceOutcome,
        identity, session,
        session::Transition,
        spoofing,
        spoofing::SpeedOutcome,
    },
};
use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, warn};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEvent {
    /// Template slot resolved by the edge sensor (1-127).
    #[schema(example = 5)]
    pub template_id: i64,
    pub secret: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Absent for QR-code clock-ins.
    pub device_id: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceAccepted {
    #[schema(example = "Welcome In, John!")]
    pub message: String,
    pub user: String,
    /// Absent when the event was debounced and nothing changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance: Option<AttendanceRecord>,
}

/// Submit attendance event
///
/// The device-facing ingestion pipeline: identity resolution, device
/// registry, geofence, anti-spoofing, then the debounced session toggle.
#[utoipa::path(
    post,
    path = "/attendance",
    request_body = AttendanceEvent,
    responses(
        (status = 200, description = "Event accepted or debounced", body = AttendanceAccepted),
        (status = 401, description = "Secret mismatch"),
        (status = 403, description = "Rejected by geofence or anti-spoofing policy"),
        (status = 404, description = "No employee with that template ID"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn submit_event(
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    state: web::Data<AppState>,
    payload: web::Json<AttendanceEvent>,
) -> Result<HttpResponse, PipelineError> {
    let event = payload.into_inner();
    let now = Utc::now();

    // Secret gate first: a mismatch must leave no trace in the store.
    if !identity::secret_matches(&event.secret, &config.sensor_secret) {
        return Err(PipelineError::Unauthorized);
    }

    let employee = identity::resolve(pool.get_ref(), event.template_id).await?;

    let point = match (event.lat, event.lng) {
        (Some(lat), Some(lng)) => Some((lat, lng)),
        _ => None,
    };

    // Device association; unknown hardware is auto-enrolled by policy.
    let device = match event.device_id.as_deref() {
        Some(device_id) => Some(match device_registry::lookup(pool.get_ref(), device_id).await? {
            DeviceLookup::Known(d) => device_registry::mark_seen(pool.get_ref(), &d, now).await?,
            DeviceLookup::Unknown(id) => {
                device_registry::auto_enroll(pool.get_ref(), &id, now).await?
            }
        }),
        None => None,
    };
    let device_id = device.as_ref().map(|d| d.device_id.as_str());

    if let Some(device) = &device {
        if let GeofenceOutcome::Outside { distance_m } = geofence::check(device, point) {
            warn!(
                employee_id = employee.id,
                device_id = %device.device_id,
                distance_m,
                "event outside geofence"
            );
            audit::record(
                pool.get_ref(),
                &AuditEntry::rejected(
                    employee.id,
                    event.template_id,
                    device_id,
                    point,
                    RejectReason::OutsideGeofence,
                ),
                now,
            )
            .await?;
            return Err(PipelineError::OutsideGeofence);
        }
    }

    if let Some(point) = point {
        let prev = spoofing::last_observation(pool.get_ref(), employee.id).await?;
        if let SpeedOutcome::Impossible { speed_kmh } =
            spoofing::check(prev.as_ref(), point, now, config.max_speed_kmh)
        {
            warn!(
                employee_id = employee.id,
                speed_kmh, "implied travel speed is not physically possible"
            );
            audit::record(
                pool.get_ref(),
                &AuditEntry::rejected(
                    employee.id,
                    event.template_id,
                    device_id,
                    Some(point),
                    RejectReason::ImpossibleSpeed,
                ),
                now,
            )
            .await?;
            return Err(PipelineError::ImpossibleSpeed);
        }
    }

    // Session toggle: serialized per employee, inside one transaction.
    let today = session::local_date(now, config.tz_offset_hours);
    let lock = state.session_locks.for_employee(employee.id);
    let _guard = lock.lock().await;

    let mut tx = pool.begin().await?;
    let current = session::current_record(&mut tx, employee.id, today).await?;
    let transition = session::decide(current.as_ref(), now, config.debounce_seconds);

    let (message, attendance) = match transition {
        Transition::Debounced => ("Ignored (Too soon)".to_string(), None),
        Transition::OpenNew => {
            let ctx = session::SessionContext {
                device_id,
                lat: event.lat,
                lng: event.lng,
                risk_level: RiskLevel::Low.as_ref(),
            };
            let record = session::open_session(&mut tx, &employee, today, now, &ctx).await?;
            (format!("Welcome In, {}!", employee.name), Some(record))
        }
        Transition::Close { record_id } => {
            let record = session::close_session(&mut tx, record_id, now).await?;
            (format!("Goodbye, {}!", employee.name), Some(record))
        }
    };
    tx.commit().await?;
    drop(_guard);

    // Debounced acks are no-ops and stay out of the audit trail.
    if attendance.is_some() {
        audit::record(
            pool.get_ref(),
            &AuditEntry::accepted(employee.id, event.template_id, device_id, point),
            now,
        )
        .await?;
        info!(employee_id = employee.id, %message, "attendance event accepted");
    }

    Ok(HttpResponse::Ok().json(AttendanceAccepted {
        message,
        user: employee.name,
        attendance,
    }))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LogQuery {
    pub limit: Option<u32>,
}

/// Attendance audit trail
///
/// Most recent entries first. This is the read surface powering monitoring
/// and map views; rejected events appear here alongside accepted ones.
#[utoipa::path(
    get,
    path = "/api/attendance-log",
    params(("limit", Query, description = "Max entries, default 100")),
    responses(
        (status = 200, description = "Recent audit entries", body = [AttendanceLog]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_logs(
    pool: web::Data<SqlitePool>,
    query: web::Query<LogQuery>,
) -> Result<HttpResponse, PipelineError> {
    let limit = i64::from(query.limit.unwrap_or(100).clamp(1, 500));

    let logs = sqlx::query_as::<_, AttendanceLog>(
        "SELECT * FROM attendance_log ORDER BY timestamp DESC, id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(logs))
}
