use crate::model::{attendance::AttendanceRecord, employee::Employee};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};
use sqlx::{Sqlite, Transaction};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// What an incoming event does to the employee's session for today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// No session yet, or the last one is closed and past the debounce
    /// window: start a new record.
    OpenNew,
    /// The last session is open and past the debounce window: close it.
    Close { record_id: i64 },
    /// Repeat scan inside the debounce window of the relevant edge.
    /// Acknowledged but ignored; not an error.
    Debounced,
}

/// Calendar date of `now` in the server's reporting timezone.
pub fn local_date(now: DateTime<Utc>, tz_offset_hours: i32) -> NaiveDate {
    let offset =
        FixedOffset::east_opt(tz_offset_hours * 3600).unwrap_or_else(|| Utc.fix());
    now.with_timezone(&offset).date_naive()
}

/// Decide the transition from the current record for (employee, date).
///
/// The debounce window is evaluated per edge: against `check_out_time` when
/// re-opening after a closed session, against `check_in_time` when closing an
/// open one. It absorbs device-side retransmissions of a single physical scan.
pub fn decide(
    current: Option<&AttendanceRecord>,
    now: DateTime<Utc>,
    debounce_seconds: i64,
) -> Transition {
    let too_soon =
        |edge: DateTime<Utc>| now.signed_duration_since(edge) < Duration::seconds(debounce_seconds);

    match current {
        None => Transition::OpenNew,
        Some(record) => match record.check_out_time {
            Some(checked_out) if too_soon(checked_out) => Transition::Debounced,
            Some(_) => Transition::OpenNew,
            None if too_soon(record.check_in_time) => Transition::Debounced,
            None => Transition::Close {
                record_id: record.id,
            },
        },
    }
}

/// The current record for the explicit composite key (employee, date): the
/// row with the latest check-in. Earlier closed rows for the same day are
/// history and never revisited.
pub async fn current_record(
    tx: &mut Transaction<'_, Sqlite>,
    employee_id: i64,
    date: NaiveDate,
) -> Result<Option<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT * FROM attendance
        WHERE employee_id = ? AND date = ?
        ORDER BY check_in_time DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(employee_id)
    .bind(date)
    .fetch_optional(&mut **tx)
    .await
}

pub struct SessionContext<'a> {
    pub device_id: Option<&'a str>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub risk_level: &'a str,
}

pub async fn open_session(
    tx: &mut Transaction<'_, Sqlite>,
    employee: &Employee,
    date: NaiveDate,
    now: DateTime<Utc>,
    ctx: &SessionContext<'_>,
) -> Result<AttendanceRecord, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(
        r#"
        INSERT INTO attendance (employee_id, date, check_in_time, device_id, lat, lng, risk_level)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(employee.id)
    .bind(date)
    .bind(now)
    .bind(ctx.device_id)
    .bind(ctx.lat)
    .bind(ctx.lng)
    .bind(ctx.risk_level)
    .fetch_one(&mut **tx)
    .await
}

pub async fn close_session(
    tx: &mut Transaction<'_, Sqlite>,
    record_id: i64,
    now: DateTime<Utc>,
) -> Result<AttendanceRecord, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(
        "UPDATE attendance SET check_out_time = ? WHERE id = ? RETURNING *",
    )
    .bind(now)
    .bind(record_id)
    .fetch_one(&mut **tx)
    .await
}

/// Per-employee async locks. Two events for the same employee arriving
/// concurrently must not both read the same session state; the read-decide-
/// write sequence runs under this lock in addition to its transaction.
#[derive(Default)]
pub struct SessionLocks {
    inner: std::sync::Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    pub fn for_employee(&self, employee_id: i64) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(employee_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        check_in: DateTime<Utc>,
        check_out: Option<DateTime<Utc>>,
    ) -> AttendanceRecord {
        AttendanceRecord {
            id: 42,
            employee_id: 1,
            date: check_in.date_naive(),
            check_in_time: check_in,
            check_out_time: check_out,
            device_id: None,
            lat: None,
            lng: None,
            risk_level: "LOW".into(),
        }
    }

    #[test]
    fn no_session_opens() {
        assert_eq!(decide(None, Utc::now(), 30), Transition::OpenNew);
    }

    #[test]
    fn open_session_past_debounce_closes() {
        let now = Utc::now();
        let rec = record(now - Duration::seconds(60), None);
        assert_eq!(
            decide(Some(&rec), now, 30),
            Transition::Close { record_id: 42 }
        );
    }

    #[test]
    fn open_session_within_debounce_is_ignored() {
        let now = Utc::now();
        let rec = record(now - Duration::seconds(10), None);
        assert_eq!(decide(Some(&rec), now, 30), Transition::Debounced);
    }

    #[test]
    fn closed_session_past_debounce_opens_again() {
        let now = Utc::now();
        let rec = record(
            now - Duration::seconds(3600),
            Some(now - Duration::seconds(31)),
        );
        assert_eq!(decide(Some(&rec), now, 30), Transition::OpenNew);
    }

    #[test]
    fn closed_session_within_debounce_is_ignored() {
        let now = Utc::now();
        let rec = record(
            now - Duration::seconds(3600),
            Some(now - Duration::seconds(10)),
        );
        assert_eq!(decide(Some(&rec), now, 30), Transition::Debounced);
    }

    #[test]
    fn debounce_is_per_edge_not_per_record() {
        // A record checked in long ago but checked out just now must debounce
        // on the check-out edge, not sail through on the check-in one.
        let now = Utc::now();
        let rec = record(now - Duration::hours(8), Some(now - Duration::seconds(2)));
        assert_eq!(decide(Some(&rec), now, 30), Transition::Debounced);
    }

    #[test]
    fn zero_debounce_always_toggles() {
        let now = Utc::now();
        let open = record(now, None);
        assert_eq!(decide(Some(&open), now, 0), Transition::Close { record_id: 42 });
    }

    #[test]
    fn day_boundary_follows_reporting_timezone() {
        let now = "2026-08-28T23:30:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(
            local_date(now, 0),
            NaiveDate::from_ymd_opt(2026, 8, 28).unwrap()
        );
        assert_eq!(
            local_date(now, 1),
            NaiveDate::from_ymd_opt(2026, 8, 29).unwrap()
        );
    }
}
