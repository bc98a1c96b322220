use crate::model::device::Device;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::info;

/// Result of resolving a reported hardware ID. Whether an unknown device gets
/// auto-created is the caller's policy decision, not a lookup side effect.
pub enum DeviceLookup {
    Known(Device),
    Unknown(String),
}

pub async fn lookup(pool: &SqlitePool, device_id: &str) -> Result<DeviceLookup, sqlx::Error> {
    let device = sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE device_id = ?")
        .bind(device_id)
        .fetch_optional(pool)
        .await?;

    Ok(match device {
        Some(d) => DeviceLookup::Known(d),
        None => DeviceLookup::Unknown(device_id.to_string()),
    })
}

/// Create a row for a first-contact device. Intentionally permissive: the
/// control plane, not the data plane, polices which devices are legitimate.
pub async fn auto_enroll(
    pool: &SqlitePool,
    device_id: &str,
    now: DateTime<Utc>,
) -> Result<Device, sqlx::Error> {
    info!(device_id, "auto-enrolling unknown device");

    sqlx::query_as::<_, Device>(
        r#"
        INSERT INTO devices (device_id, name, status, last_seen)
        VALUES (?, ?, 'Online', ?)
        RETURNING *
        "#,
    )
    .bind(device_id)
    .bind(format!("Device {device_id}"))
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Refresh heartbeat bookkeeping for a known device.
pub async fn mark_seen(
    pool: &SqlitePool,
    device: &Device,
    now: DateTime<Utc>,
) -> Result<Device, sqlx::Error> {
    sqlx::query_as::<_, Device>(
        "UPDATE devices SET last_seen = ?, status = 'Online' WHERE id = ? RETURNING *",
    )
    .bind(now)
    .bind(device.id)
    .fetch_one(pool)
    .await
}

/// Heartbeat path: upsert the device and record its reported position when
/// one is attached.
pub async fn record_heartbeat(
    pool: &SqlitePool,
    device_id: &str,
    position: Option<(f64, f64)>,
    now: DateTime<Utc>,
) -> Result<Device, sqlx::Error> {
    let device = match lookup(pool, device_id).await? {
        DeviceLookup::Known(d) => d,
        DeviceLookup::Unknown(id) => auto_enroll(pool, &id, now).await?,
    };

    let (lat, lng) = match position {
        Some((lat, lng)) => (Some(lat), Some(lng)),
        None => (None, None),
    };

    sqlx::query_as::<_, Device>(
        r#"
        UPDATE devices
        SET last_seen = ?,
            status = 'Online',
            last_lat = COALESCE(?, last_lat),
            last_lng = COALESCE(?, last_lng)
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(now)
    .bind(lat)
    .bind(lng)
    .bind(device.id)
    .fetch_one(pool)
    .await
}
