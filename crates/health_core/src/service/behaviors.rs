//! Pipeline behaviors wrapped around every request.

use crate::logging::sanitize_message;
use crate::service::mediator::{Request, Validator};
use crate::service::{ServiceError, ServiceResult};
use log::{error, info, warn};
use std::time::Instant;

const MAX_LOGGED_ERROR_CHARS: usize = 200;

/// Logs start and finish of a request with its duration.
pub fn log_request<T>(
    request_name: &str,
    next: impl FnOnce() -> ServiceResult<T>,
) -> ServiceResult<T> {
    let started_at = Instant::now();
    info!("event=request_start module=service status=start request={request_name}");

    let result = next();

    info!(
        "event=request_finish module=service status={} request={} duration_ms={}",
        if result.is_ok() { "ok" } else { "error" },
        request_name,
        started_at.elapsed().as_millis()
    );
    result
}

/// Short-circuits with `ServiceError::Validation` when the request's
/// validator reports any field error.
pub fn validate_request<R: Request>(request: &R) -> ServiceResult<()> {
    let errors = R::Validator::default().validate(request);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Validation(errors))
    }
}

/// Logs a failed request without altering the error.
pub fn notify_failure(request_name: &str, err: &ServiceError) {
    let message = sanitize_message(&err.to_string(), MAX_LOGGED_ERROR_CHARS);
    if err.is_client_error() {
        warn!(
            "event=request_failed module=service status=error request={} error_kind={} error={}",
            request_name,
            err.kind(),
            message
        );
    } else {
        error!(
            "event=request_failed module=service status=error request={} error_kind={} error={}",
            request_name,
            err.kind(),
            message
        );
    }
}
