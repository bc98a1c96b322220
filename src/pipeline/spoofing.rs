use crate::pipeline::geo;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// Most recent coordinate-bearing audit entry for an employee, any outcome.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Observation {
    pub lat: f64,
    pub lng: f64,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpeedOutcome {
    /// No prior observation, or a non-positive time delta (clock skew).
    Skipped,
    Plausible { speed_kmh: f64 },
    Impossible { speed_kmh: f64 },
}

pub async fn last_observation(
    pool: &SqlitePool,
    employee_id: i64,
) -> Result<Option<Observation>, sqlx::Error> {
    sqlx::query_as::<_, Observation>(
        r#"
        SELECT lat, lng, timestamp AS at
        FROM attendance_log
        WHERE employee_id = ? AND lat IS NOT NULL AND lng IS NOT NULL
        ORDER BY timestamp DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await
}

/// Compare a new coordinate against the employee's previous one. First
/// observations are trusted; simultaneous or skewed timestamps skip the
/// check instead of dividing by a non-positive delta.
pub fn check(
    prev: Option<&Observation>,
    point: (f64, f64),
    now: DateTime<Utc>,
    max_speed_kmh: f64,
) -> SpeedOutcome {
    let Some(prev) = prev else {
        return SpeedOutcome::Skipped;
    };

    let elapsed_hours = now.signed_duration_since(prev.at).num_milliseconds() as f64 / 3_600_000.0;
    if elapsed_hours <= 0.0 {
        return SpeedOutcome::Skipped;
    }

    let distance_km = geo::haversine_km(point.0, point.1, prev.lat, prev.lng);
    let speed_kmh = distance_km / elapsed_hours;

    if speed_kmh > max_speed_kmh {
        SpeedOutcome::Impossible { speed_kmh }
    } else {
        SpeedOutcome::Plausible { speed_kmh }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const ALGIERS: (f64, f64) = (36.7538, 3.0588);
    const PARIS: (f64, f64) = (48.8566, 2.3522);

    fn observation_at(point: (f64, f64), at: DateTime<Utc>) -> Observation {
        Observation {
            lat: point.0,
            lng: point.1,
            at,
        }
    }

    #[test]
    fn first_observation_is_trusted() {
        assert_eq!(check(None, PARIS, Utc::now(), 800.0), SpeedOutcome::Skipped);
    }

    #[test]
    fn non_positive_elapsed_time_skips() {
        let now = Utc::now();
        let future = observation_at(ALGIERS, now + Duration::seconds(5));
        assert_eq!(check(Some(&future), PARIS, now, 800.0), SpeedOutcome::Skipped);

        let simultaneous = observation_at(ALGIERS, now);
        assert_eq!(
            check(Some(&simultaneous), PARIS, now, 800.0),
            SpeedOutcome::Skipped
        );
    }

    #[test]
    fn speed_boundary_799_accepted_801_rejected() {
        let now = Utc::now();
        let distance_km = geo::haversine_km(PARIS.0, PARIS.1, ALGIERS.0, ALGIERS.1);

        // Pick the elapsed time so implied speed lands exactly on each side.
        let hours_at_799 = distance_km / 799.0;
        let prev = observation_at(
            ALGIERS,
            now - Duration::milliseconds((hours_at_799 * 3_600_000.0) as i64),
        );
        assert!(matches!(
            check(Some(&prev), PARIS, now, 800.0),
            SpeedOutcome::Plausible { .. }
        ));

        let hours_at_801 = distance_km / 801.0;
        let prev = observation_at(
            ALGIERS,
            now - Duration::milliseconds((hours_at_801 * 3_600_000.0) as i64),
        );
        assert!(matches!(
            check(Some(&prev), PARIS, now, 800.0),
            SpeedOutcome::Impossible { .. }
        ));
    }

    #[test]
    fn slow_local_movement_is_plausible() {
        let now = Utc::now();
        let prev = observation_at((36.75, 3.05), now - Duration::hours(1));
        match check(Some(&prev), (36.80, 3.05), now, 800.0) {
            SpeedOutcome::Plausible { speed_kmh } => assert!(speed_kmh < 10.0),
            other => panic!("expected Plausible, got {other:?}"),
        }
    }
}
