//! HTTP surface for health plans and beneficiaries.
//!
//! # Responsibility
//! - Map routes onto mediator requests.
//! - Wrap every outcome in the result envelope.
//!
//! # Invariants
//! - Every response carries the security headers and an envelope body,
//!   including 404 and 405 answers from the router itself.
//! - The mediator never runs on an async worker thread.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod requests;
pub mod response;

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use health_core::Mediator;

pub use config::{ConfigError, ServerConfig};
pub use response::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub mediator: Mediator,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(mediator: Mediator) -> Self {
        Self {
            mediator,
            max_body_bytes: config::DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

pub fn build_router(state: AppState) -> Router {
    use handlers::{beneficiaries, health_plans};

    Router::new()
        .route("/ping", get(handlers::ping).fallback(handlers::method_not_allowed))
        .route(
            "/api/health-plans",
            get(health_plans::list_health_plans)
                .post(health_plans::create_health_plan)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/health-plans/:id",
            get(health_plans::get_health_plan)
                .put(health_plans::update_health_plan)
                .delete(health_plans::delete_health_plan)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/health-plans/:id/beneficiaries",
            get(beneficiaries::list_beneficiaries)
                .post(beneficiaries::create_beneficiary)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/beneficiaries/:id",
            get(beneficiaries::get_beneficiary)
                .put(beneficiaries::update_beneficiary)
                .delete(beneficiaries::delete_beneficiary)
                .fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .layer(from_fn(middleware::security_headers))
        .layer(from_fn(middleware::access_log))
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .with_state(state)
}
