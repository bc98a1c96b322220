use crate::error::PipelineError;
use crate::model::employee::Employee;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

/// Sensor template slots are numbered 1..=127.
pub const TEMPLATE_ID_MIN: i64 = 1;
pub const TEMPLATE_ID_MAX: i64 = 127;

/// Compare the device-supplied secret against the configured one. Both sides
/// are hashed first so the comparison works on fixed-size digests and its
/// cost does not depend on how much of the secret matched.
pub fn secret_matches(provided: &str, expected: &str) -> bool {
    Sha256::digest(provided.as_bytes()) == Sha256::digest(expected.as_bytes())
}

/// Map a device-reported template ID to an employee record. No side effects.
pub async fn resolve(pool: &SqlitePool, template_id: i64) -> Result<Employee, PipelineError> {
    sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE template_id = ?")
        .bind(template_id)
        .fetch_optional(pool)
        .await?
        .ok_or(PipelineError::IdentityNotFound)
}

/// Lowest unused slot in 1..=127, or None when the sensor is full.
///
/// Deliberately not `max + 1` with wraparound: wrapping hands out the lowest
/// slot numbers again without checking whether they still belong to an active
/// employee, which silently collides with that employee's stored template.
pub fn lowest_free_template_id(used: &[i64]) -> Option<i64> {
    (TEMPLATE_ID_MIN..=TEMPLATE_ID_MAX).find(|id| !used.contains(id))
}
