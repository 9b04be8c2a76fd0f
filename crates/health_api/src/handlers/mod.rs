//! Route handlers.
//!
//! Handlers translate HTTP input into mediator requests and run the
//! synchronous pipeline on the blocking pool.

pub mod beneficiaries;
pub mod health_plans;

use crate::response::{self, ApiError};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use health_core::service::Request;
use health_core::Mediator;
use serde::Serialize;
use uuid::Uuid;

const RESOURCE_NOT_FOUND: &str = "resource not found";

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub message: &'static str,
    pub version: &'static str,
}

pub async fn ping() -> Response {
    response::ok(PingResponse {
        message: health_core::ping(),
        version: health_core::core_version(),
    })
}

/// Unknown routes answer with the failure envelope.
pub async fn not_found() -> ApiError {
    ApiError::NotFound(RESOURCE_NOT_FOUND.to_string())
}

/// Known routes called with an unsupported method.
pub async fn method_not_allowed() -> Response {
    response::failure(StatusCode::METHOD_NOT_ALLOWED, "method not allowed", None)
}

/// Runs `request` through the mediator off the async executor.
pub(crate) async fn send<R: Request>(
    mediator: &Mediator,
    request: R,
) -> Result<R::Response, ApiError> {
    let mediator = mediator.clone();
    tokio::task::spawn_blocking(move || mediator.send(request))
        .await
        .map_err(|err| ApiError::Internal(format!("request task failed: {err}")))?
        .map_err(ApiError::from)
}

/// Path ids that are not UUIDs do not match any resource.
pub(crate) fn path_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(RESOURCE_NOT_FOUND.to_string()))
}

pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        })
}

pub(crate) fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        })
}
