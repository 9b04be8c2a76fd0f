//! Beneficiary commands and queries.

use crate::model::beneficiary::{Beneficiary, Status};
use crate::service::ServiceError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub mod create;
pub mod delete;
pub mod get_by_id;
pub mod list;
pub mod update;

pub use create::CreateBeneficiaryCommand;
pub use delete::DeleteBeneficiaryCommand;
pub use get_by_id::GetBeneficiaryByIdQuery;
pub use list::GetBeneficiariesQuery;
pub use update::UpdateBeneficiaryCommand;

pub(crate) const BENEFICIARY_ID_EMPTY: &str = "beneficiary id cannot be empty";

pub(crate) fn beneficiary_not_found() -> ServiceError {
    ServiceError::NotFound("beneficiary not found".to_string())
}

pub(crate) fn cpf_in_use() -> ServiceError {
    ServiceError::Conflict("CPF is already registered".to_string())
}

/// Beneficiary as exposed to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryView {
    pub id: Uuid,
    pub full_name: String,
    /// Formatted as `XXX.XXX.XXX-XX`.
    pub cpf: String,
    pub status: Status,
    /// Formatted as `dd/mm/yyyy`.
    pub birth_date: String,
    pub age: i32,
    pub health_plan_id: Uuid,
    pub creation_date: DateTime<Utc>,
    pub modification_date: Option<DateTime<Utc>>,
}

impl From<&Beneficiary> for BeneficiaryView {
    fn from(beneficiary: &Beneficiary) -> Self {
        Self {
            id: beneficiary.id,
            full_name: beneficiary.full_name.to_string(),
            cpf: beneficiary.cpf.to_string(),
            status: beneficiary.status,
            birth_date: beneficiary.birth_date.to_string(),
            age: beneficiary.birth_date.age(),
            health_plan_id: beneficiary.health_plan_id,
            creation_date: beneficiary.audit.created_at,
            modification_date: beneficiary.audit.updated_at,
        }
    }
}
