use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use strum_macros::{AsRefStr, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    OutsideGeofence,
    ImpossibleSpeed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    High,
}

/// One audit row, written for every terminal pipeline outcome, policy
/// rejections included. Auth and identity failures have no employee to
/// attribute and never reach this point.
pub struct AuditEntry<'a> {
    pub employee_id: i64,
    pub device_id: Option<&'a str>,
    pub template_id: i64,
    pub outcome: Outcome,
    pub reason: Option<RejectReason>,
    pub risk_level: RiskLevel,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl<'a> AuditEntry<'a> {
    pub fn accepted(
        employee_id: i64,
        template_id: i64,
        device_id: Option<&'a str>,
        point: Option<(f64, f64)>,
    ) -> Self {
        Self {
            employee_id,
            device_id,
            template_id,
            outcome: Outcome::Accepted,
            reason: None,
            risk_level: RiskLevel::Low,
            lat: point.map(|p| p.0),
            lng: point.map(|p| p.1),
        }
    }

    pub fn rejected(
        employee_id: i64,
        template_id: i64,
        device_id: Option<&'a str>,
        point: Option<(f64, f64)>,
        reason: RejectReason,
    ) -> Self {
        Self {
            employee_id,
            device_id,
            template_id,
            outcome: Outcome::Rejected,
            reason: Some(reason),
            risk_level: RiskLevel::High,
            lat: point.map(|p| p.0),
            lng: point.map(|p| p.1),
        }
    }
}

pub async fn record(
    pool: &SqlitePool,
    entry: &AuditEntry<'_>,
    at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO attendance_log
            (employee_id, device_id, template_id, outcome, reason, risk_level, lat, lng, timestamp)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(entry.employee_id)
    .bind(entry.device_id)
    .bind(entry.template_id)
    .bind(entry.outcome.as_ref())
    .bind(entry.reason.map(|r| r.as_ref().to_string()))
    .bind(entry.risk_level.as_ref())
    .bind(entry.lat)
    .bind(entry.lng)
    .bind(at)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_spellings() {
        assert_eq!(Outcome::Accepted.to_string(), "ACCEPTED");
        assert_eq!(RejectReason::OutsideGeofence.to_string(), "OUTSIDE_GEOFENCE");
        assert_eq!(RejectReason::ImpossibleSpeed.to_string(), "IMPOSSIBLE_SPEED");
        assert_eq!(RiskLevel::High.to_string(), "HIGH");
    }
}
