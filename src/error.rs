use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;
use tracing::error;

/// Terminal outcomes of the ingestion pipeline that surface as HTTP errors.
///
/// Debounced events are not represented here: an "ignored, too soon"
/// acknowledgement is a successful response, not a failure.
#[derive(Debug, Display)]
pub enum PipelineError {
    #[display(fmt = "Unauthorized")]
    Unauthorized,

    #[display(fmt = "User not found")]
    IdentityNotFound,

    #[display(fmt = "Attendance Rejected: Outside Geofence Zone")]
    OutsideGeofence,

    #[display(fmt = "Attendance Rejected: Impossible Location Jump")]
    ImpossibleSpeed,

    #[display(fmt = "Internal Server Error")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for PipelineError {
    fn from(e: sqlx::Error) -> Self {
        PipelineError::Database(e)
    }
}

impl ResponseError for PipelineError {
    fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::Unauthorized => StatusCode::UNAUTHORIZED,
            PipelineError::IdentityNotFound => StatusCode::NOT_FOUND,
            PipelineError::OutsideGeofence | PipelineError::ImpossibleSpeed => {
                StatusCode::FORBIDDEN
            }
            PipelineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let PipelineError::Database(e) = self {
            // The device only gets a terse error; keep the cause server-side.
            error!(error = %e, "data store failure");
        }

        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_bodies_match_the_device_contract() {
        assert_eq!(PipelineError::Unauthorized.to_string(), "Unauthorized");
        assert_eq!(PipelineError::IdentityNotFound.to_string(), "User not found");
        assert_eq!(
            PipelineError::OutsideGeofence.to_string(),
            "Attendance Rejected: Outside Geofence Zone"
        );
        assert_eq!(
            PipelineError::ImpossibleSpeed.to_string(),
            "Attendance Rejected: Impossible Location Jump"
        );
        assert_eq!(PipelineError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(PipelineError::OutsideGeofence.status_code(), StatusCode::FORBIDDEN);
    }
}
