pub mod attendance;
pub mod attendance_log;
pub mod device;
pub mod employee;
