pub mod attendance;
pub mod device;
pub mod employee;
pub mod enrollment;
pub mod sensor;
