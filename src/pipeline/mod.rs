pub mod audit;
pub mod device_registry;
pub mod enrollment;
pub mod geo;
pub mod geofence;
pub mod identity;
pub mod session;
pub mod spoofing;

use enrollment::Enrollment;
use session::SessionLocks;
use tokio::sync::Mutex;

/// In-process state shared across workers: the singleton enrollment FSM and
/// the per-employee locks serializing session transitions.
pub struct AppState {
    pub enrollment: Mutex<Enrollment>,
    pub session_locks: SessionLocks,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            enrollment: Mutex::new(Enrollment::new()),
            session_locks: SessionLocks::default(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
