use serde::Serialize;
use utoipa::ToSchema;

/// Negative target passed to `start` means "clear the sensor's memory slot"
/// instead of capturing a new template.
pub const CLEAR_SLOT_TARGET: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentPhase {
    Idle,
    AwaitingCapture { target_id: i64 },
    AwaitingClear,
}

/// Command handed to a polling device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorCommand {
    Idle,
    Enroll,
    Empty,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnrollmentStatus {
    pub active: bool,
    pub message: String,
}

/// Singleton enrollment coordinator. Set by an administrator, cleared by the
/// owning device reporting success/failure or by explicit cancellation.
#[derive(Debug, Clone)]
pub struct Enrollment {
    phase: EnrollmentPhase,
    message: String,
}

impl Enrollment {
    pub fn new() -> Self {
        Self {
            phase: EnrollmentPhase::Idle,
            message: "Enrollment idle.".to_string(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase != EnrollmentPhase::Idle
    }

    pub fn start(&mut self, target_id: i64) {
        if target_id < 0 {
            self.phase = EnrollmentPhase::AwaitingClear;
            self.message = "Waiting for device to clear its template memory...".to_string();
        } else {
            self.phase = EnrollmentPhase::AwaitingCapture { target_id };
            self.message = format!("Waiting for device to capture template {target_id}...");
        }
    }

    /// Command for the device poll, with the capture target when relevant.
    pub fn command(&self) -> (SensorCommand, Option<i64>) {
        match self.phase {
            EnrollmentPhase::Idle => (SensorCommand::Idle, None),
            EnrollmentPhase::AwaitingCapture { target_id } => {
                (SensorCommand::Enroll, Some(target_id))
            }
            EnrollmentPhase::AwaitingClear => (SensorCommand::Empty, None),
        }
    }

    /// Device reported the outcome of the pending operation. A report while
    /// idle is stale and ignored.
    pub fn resolve(&mut self, success: bool, detail: Option<&str>) {
        if !self.is_active() {
            return;
        }
        self.phase = EnrollmentPhase::Idle;
        self.message = match (success, detail) {
            (_, Some(detail)) => detail.to_string(),
            (true, None) => "Enrollment completed successfully.".to_string(),
            (false, None) => "Enrollment failed on device.".to_string(),
        };
    }

    pub fn cancel(&mut self) {
        self.phase = EnrollmentPhase::Idle;
        self.message = "Enrollment cancelled.".to_string();
    }

    pub fn status(&self) -> EnrollmentStatus {
        EnrollmentStatus {
            active: self.is_active(),
            message: self.message.clone(),
        }
    }
}

impl Default for Enrollment {
    fn default() -> Self {
        Self::new()
    }
}
