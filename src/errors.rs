use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::production::TrackingError;

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Body returned for every failed request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Not Found",
    "message": "Order not found",
    "request_id": "0f8e7c1a-2b7d-4a55-9a43-3f0f7d0d6c11",
    "timestamp": "2025-11-04T10:30:00+00:00"
}))]
pub struct ErrorResponse {
    /// HTTP status category
    #[schema(example = "Not Found")]
    pub error: String,
    /// Human-readable error description
    #[schema(example = "Order not found")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("{0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::SerializationError(err.to_string())
    }
}

impl From<TrackingError> for ServiceError {
    fn from(err: TrackingError) -> Self {
        ServiceError::NotFound(err.to_string())
    }
}

impl ServiceError {
    pub fn order_not_found() -> Self {
        ServiceError::NotFound("Order not found".to_string())
    }

    pub fn project_not_found() -> Self {
        ServiceError::NotFound("Project not found".to_string())
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::DatabaseError(_) | Self::SerializationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::SerializationError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "Request failed");
        }

        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            details: None,
            request_id: current_request_id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn tracking_errors_map_to_not_found() {
        let order = ServiceError::from(TrackingError::OrderNotFound("ORD-1".into()));
        assert_eq!(order.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(order.response_message(), "Order not found");

        let stage = ServiceError::from(TrackingError::StageNotFound {
            order_id: "ORD-1".into(),
            stage: "painting".into(),
        });
        assert_eq!(stage.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(stage.response_message(), "Process not found");
    }

    #[test]
    fn internal_details_are_hidden() {
        let err = ServiceError::DatabaseError(DbErr::Custom("disk I/O error at /var/db".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.response_message(), "Database error");

        let err = ServiceError::SerializationError("expected object at line 1".into());
        assert_eq!(err.response_message(), "Internal server error");
    }

    #[test]
    fn unavailable_maps_to_503() {
        let err = ServiceError::ServiceUnavailable("storage unreachable".into());
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.response_message(), "Service unavailable: storage unreachable");
    }

    #[tokio::test]
    async fn response_body_carries_status_and_message() {
        let response = ServiceError::BadRequest("Invalid export target".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Bad Request");
        assert_eq!(json["message"], "Invalid export target");
        assert!(json.get("request_id").is_none());
        assert!(json["timestamp"].is_string());
    }
}
