use axum::{http::StatusCode, Json};
use dam_assets::ServiceError;
use dam_database::DatabaseError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
        }
    }
}

/// Map service failures onto the HTTP status taxonomy
pub fn service_error(err: ServiceError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match &err {
        ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        ServiceError::Authorization(_) => (StatusCode::FORBIDDEN, "forbidden"),
        ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        ServiceError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
        ServiceError::Storage(_) => (StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable"),
        ServiceError::Database(DatabaseError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, "not_found")
        }
        ServiceError::Database(DatabaseError::DuplicateEntry(_))
        | ServiceError::Database(DatabaseError::ImmutableRecord(_)) => {
            (StatusCode::CONFLICT, "conflict")
        }
        ServiceError::Database(_) => {
            tracing::error!("Database failure reached the API boundary: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        }
    };

    (status, Json(ErrorResponse::new(code, &err.to_string())))
}
