use crate::api;
use crate::model::{
    attendance::AttendanceRecord, attendance_log::AttendanceLog, device::Device,
    employee::Employee,
};
use crate::pipeline::enrollment::{EnrollmentStatus, SensorCommand};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::attendance::submit_event,
        api::attendance::list_logs,
        api::sensor::update,
        api::sensor::next_template_id,
        api::enrollment::start,
        api::enrollment::status,
        api::enrollment::cancel,
        api::device::list_devices,
        api::device::update_device,
        api::employee::list_employees,
        api::employee::get_employee,
        api::employee::update_employee,
    ),
    components(schemas(
        api::attendance::AttendanceEvent,
        api::attendance::AttendanceAccepted,
        api::sensor::SensorReport,
        api::enrollment::StartEnrollment,
        api::device::UpdateDevice,
        api::employee::UpdateEmployee,
        Employee,
        Device,
        AttendanceRecord,
        AttendanceLog,
        EnrollmentStatus,
        SensorCommand,
    )),
    tags(
        (name = "Attendance", description = "Attendance event ingestion"),
        (name = "Sensor", description = "Device heartbeat and command polling"),
        (name = "Enrollment", description = "Biometric enrollment control plane"),
        (name = "Device", description = "Device administration"),
        (name = "Employee", description = "Employee read/update surface")
    )
)]
pub struct ApiDoc;
