use crate::{error::PipelineError, model::device::Device};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDevice {
    pub name: Option<String>,
    pub allowed_lat: Option<f64>,
    pub allowed_lng: Option<f64>,
    /// Geofence radius in meters.
    pub allowed_radius: Option<f64>,
}

/// List devices
#[utoipa::path(
    get,
    path = "/api/devices",
    responses((status = 200, description = "All registered devices", body = [Device])),
    tag = "Device"
)]
pub async fn list_devices(pool: web::Data<SqlitePool>) -> Result<HttpResponse, PipelineError> {
    let devices = sqlx::query_as::<_, Device>("SELECT * FROM devices ORDER BY id")
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(devices))
}

/// Update device
///
/// Administrator edits of the friendly name and permitted zone. This is the
/// only writer of device rows outside the registry itself.
#[utoipa::path(
    put,
    path = "/api/devices/{id}",
    params(("id", Path, description = "Device row ID")),
    request_body = UpdateDevice,
    responses(
        (status = 200, description = "Updated device", body = Device),
        (status = 404, description = "Device not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Device"
)]
pub async fn update_device(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<UpdateDevice>,
) -> Result<HttpResponse, PipelineError> {
    let id = path.into_inner();

    let device = sqlx::query_as::<_, Device>(
        r#"
        UPDATE devices
        SET name = COALESCE(?, name),
            allowed_lat = COALESCE(?, allowed_lat),
            allowed_lng = COALESCE(?, allowed_lng),
            allowed_radius = COALESCE(?, allowed_radius)
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&payload.name)
    .bind(payload.allowed_lat)
    .bind(payload.allowed_lng)
    .bind(payload.allowed_radius)
    .bind(id)
    .fetch_optional(pool.get_ref())
    .await?;

    match device {
        Some(device) => Ok(HttpResponse::Ok().json(device)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Device not found"
        }))),
    }
}
