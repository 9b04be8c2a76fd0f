//! Use-case layer: requests, handlers and the mediator pipeline.
//!
//! # Responsibility
//! - Route every command/query through logging and validation behaviors.
//! - Translate repository and domain failures into use-case outcomes.
//!
//! # Invariants
//! - Handlers never run for requests that fail validation.
//! - Each request gets a fresh unit of work; pending changes never leak
//!   between requests.

use crate::model::error::DomainError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod behaviors;
pub mod beneficiaries;
pub mod health_plans;
pub mod mediator;
pub mod pagination;
pub mod validation;

pub use mediator::{Mediator, NoValidation, Request, RequestHandler, Validator};
pub use pagination::{KeysetPagedResult, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use validation::ValidationErrors;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure outcome of a request.
#[derive(Debug)]
pub enum ServiceError {
    /// Request data rejected before the handler ran.
    Validation(ValidationErrors),
    NotFound(String),
    Conflict(String),
    /// Request passed validation but broke a domain rule.
    Domain(DomainError),
    Repo(RepoError),
}

impl ServiceError {
    /// Stable short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Domain(_) => "domain",
            Self::Repo(_) => "repo",
        }
    }

    /// Whether the caller, not the server, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NotFound(_) | Self::Conflict(_) | Self::Domain(_)
        )
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(_) => write!(f, "invalid request data"),
            Self::NotFound(message) | Self::Conflict(message) => write!(f, "{message}"),
            Self::Domain(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Domain(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        Self::Domain(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(format!("entity not found: {id}")),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

/// Success payload for requests that return no data. Serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct EmptyResult {}
