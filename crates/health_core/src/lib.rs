//! Core domain logic for the health plan registry.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::beneficiary::{Beneficiary, Status};
pub use model::entity::{AuditStamps, Entity, EntityId};
pub use model::error::DomainError;
pub use model::health_plan::HealthPlan;
pub use model::value_objects::{AnsRegistrationCode, BirthDate, Cpf, Name};
pub use repo::beneficiary_repo::{BeneficiaryFilter, BeneficiaryPredicate, BeneficiaryRepository};
pub use repo::health_plan_repo::{HealthPlanFilter, HealthPlanPredicate, HealthPlanRepository};
pub use repo::interceptors::{AuditInterceptor, CaseInterceptor, Interceptors};
pub use repo::unit_of_work::{SqliteUnitOfWork, UnitOfWork};
pub use repo::{RepoError, RepoResult, Repository};
pub use service::{
    EmptyResult, KeysetPagedResult, Mediator, ServiceError, ServiceResult, ValidationErrors,
};

/// Minimal liveness probe.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
