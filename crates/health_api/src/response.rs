//! Result envelope shared by every endpoint.
//!
//! Success: `{ "isSuccess": true, "value": .., "statusCode": n }`.
//! Failure: `{ "isSuccess": false, "error": { "type", "message", "details"? }, "statusCode": n }`.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use health_core::ServiceError;
use log::error;
use serde::Serialize;
use serde_json::Value;

const INTERNAL_ERROR_MESSAGE: &str = "an unexpected error occurred";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub is_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    pub status_code: u16,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Reason name reported as `error.type`.
pub fn reason_name(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "BadRequest",
        StatusCode::NOT_FOUND => "NotFound",
        StatusCode::METHOD_NOT_ALLOWED => "MethodNotAllowed",
        StatusCode::CONFLICT => "Conflict",
        StatusCode::PAYLOAD_TOO_LARGE => "PayloadTooLarge",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UnsupportedMediaType",
        StatusCode::UNPROCESSABLE_ENTITY => "UnprocessableContent",
        _ => "InternalServerError",
    }
}

pub fn success<T: Serialize>(status: StatusCode, value: T) -> Response {
    let body = Envelope {
        is_success: true,
        value: Some(value),
        error: None,
        status_code: status.as_u16(),
    };
    (status, Json(body)).into_response()
}

pub fn ok<T: Serialize>(value: T) -> Response {
    success(StatusCode::OK, value)
}

/// 201 with a relative `Location` pointing at the new resource.
pub fn created<T: Serialize>(location: String, value: T) -> Response {
    let mut response = success(StatusCode::CREATED, value);
    match HeaderValue::from_str(&location) {
        Ok(location) => {
            response.headers_mut().insert(header::LOCATION, location);
        }
        Err(err) => {
            error!("event=location_header module=http status=error error={err}");
        }
    }
    response
}

pub fn failure(status: StatusCode, message: impl Into<String>, details: Option<Value>) -> Response {
    let body: Envelope<()> = Envelope {
        is_success: false,
        value: None,
        error: Some(ErrorBody {
            kind: reason_name(status),
            message: message.into(),
            details,
        }),
        status_code: status.as_u16(),
    };
    (status, Json(body)).into_response()
}

/// Failure produced by an HTTP handler.
#[derive(Debug)]
pub enum ApiError {
    Service(ServiceError),
    /// Extractor rejected the request before it reached the mediator.
    Rejected { status: StatusCode, message: String },
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Service(err) => service_status(err),
            Self::Rejected { status, .. } => *status,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

/// HTTP status for a use-case failure.
pub fn service_status(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::Domain(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Repo(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Service(ServiceError::Validation(errors)) => {
                let details = serde_json::to_value(&errors).ok();
                failure(status, ServiceError::Validation(errors).to_string(), details)
            }
            // Internal failures are already logged by the pipeline; keep storage
            // details out of the response.
            Self::Service(err) if !err.is_client_error() => {
                failure(status, INTERNAL_ERROR_MESSAGE, None)
            }
            Self::Service(err) => failure(status, err.to_string(), None),
            Self::Rejected { message, .. } | Self::NotFound(message) => {
                failure(status, message, None)
            }
            Self::Internal(message) => {
                error!("event=http_internal_error module=http status=error error={message}");
                failure(status, INTERNAL_ERROR_MESSAGE, None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use health_core::{DomainError, ValidationErrors};

    #[test]
    fn maps_service_errors_to_statuses() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "name cannot be empty");
        assert_eq!(
            service_status(&ServiceError::Validation(errors)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            service_status(&ServiceError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            service_status(&ServiceError::Conflict("x".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            service_status(&ServiceError::Domain(DomainError::EmptyName)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn reason_names_follow_status_phrases() {
        assert_eq!(reason_name(StatusCode::UNPROCESSABLE_ENTITY), "UnprocessableContent");
        assert_eq!(reason_name(StatusCode::CONFLICT), "Conflict");
        assert_eq!(reason_name(StatusCode::BAD_GATEWAY), "InternalServerError");
    }

    #[test]
    fn failure_envelope_omits_absent_fields() {
        let body: Envelope<()> = Envelope {
            is_success: false,
            value: None,
            error: Some(ErrorBody {
                kind: "NotFound",
                message: "health plan not found".to_string(),
                details: None,
            }),
            status_code: 404,
        };
        let json = serde_json::to_value(&body).expect("serialize envelope");
        assert_eq!(
            json,
            serde_json::json!({
                "isSuccess": false,
                "error": { "type": "NotFound", "message": "health plan not found" },
                "statusCode": 404
            })
        );
    }
}
