use crate::pipeline::{AppState, enrollment::EnrollmentStatus};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartEnrollment {
    /// Template slot to capture into; negative means "clear the slot".
    #[schema(example = 7)]
    pub target_id: i64,
}

/// Start enrollment
///
/// Places the system into enrollment mode; the device picks the command up
/// on its next `/sensor/update` poll.
#[utoipa::path(
    post,
    path = "/api/enrollment/start",
    request_body = StartEnrollment,
    responses(
        (status = 200, description = "Enrollment mode armed", body = EnrollmentStatus)
    ),
    tag = "Enrollment"
)]
pub async fn start(
    state: web::Data<AppState>,
    payload: web::Json<StartEnrollment>,
) -> impl Responder {
    let mut enrollment = state.enrollment.lock().await;
    enrollment.start(payload.target_id);
    info!(target_id = payload.target_id, "enrollment mode armed");
    HttpResponse::Ok().json(enrollment.status())
}

/// Enrollment status
///
/// Polled by the admin UI until `active` drops back to false.
#[utoipa::path(
    get,
    path = "/api/enrollment/status",
    responses((status = 200, body = EnrollmentStatus)),
    tag = "Enrollment"
)]
pub async fn status(state: web::Data<AppState>) -> impl Responder {
    let enrollment = state.enrollment.lock().await;
    HttpResponse::Ok().json(enrollment.status())
}

/// Cancel enrollment
#[utoipa::path(
    post,
    path = "/api/enrollment/cancel",
    responses((status = 200, description = "State force-cleared", body = EnrollmentStatus)),
    tag = "Enrollment"
)]
pub async fn cancel(state: web::Data<AppState>) -> impl Responder {
    let mut enrollment = state.enrollment.lock().await;
    enrollment.cancel();
    info!("enrollment cancelled by administrator");
    HttpResponse::Ok().json(enrollment.status())
}
