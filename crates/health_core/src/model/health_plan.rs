//! Health plan aggregate.
//!
//! # Invariants
//! - `name` and `ans_registration_code` are always valid value objects.
//! - `beneficiaries` is only populated by reads that ask for it; it is never
//!   written back by the plan repository.

use crate::model::beneficiary::Beneficiary;
use crate::model::entity::{AuditStamps, Entity, EntityId};
use crate::model::error::DomainError;
use crate::model::value_objects::{AnsRegistrationCode, Name};
use uuid::Uuid;

/// Registered health plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthPlan {
    pub id: EntityId,
    pub name: Name,
    pub ans_registration_code: AnsRegistrationCode,
    pub beneficiaries: Vec<Beneficiary>,
    pub audit: AuditStamps,
}

impl HealthPlan {
    /// Creates a plan with a generated id and fresh audit stamps.
    pub fn create(name: &str, ans_registration_code: &str) -> Result<Self, DomainError> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: Name::create(name)?,
            ans_registration_code: AnsRegistrationCode::create(ans_registration_code)?,
            beneficiaries: Vec::new(),
            audit: AuditStamps::new(),
        })
    }

    /// Rebuilds a plan from already validated parts.
    pub fn from_parts(
        id: EntityId,
        name: Name,
        ans_registration_code: AnsRegistrationCode,
        audit: AuditStamps,
    ) -> Self {
        Self {
            id,
            name,
            ans_registration_code,
            beneficiaries: Vec::new(),
            audit,
        }
    }

    pub fn update_name(&mut self, name: &str) -> Result<(), DomainError> {
        self.name = Name::create(name)?;
        Ok(())
    }

    pub fn update_ans_code(&mut self, ans_code: &str) -> Result<(), DomainError> {
        self.ans_registration_code = AnsRegistrationCode::create(ans_code)?;
        Ok(())
    }
}

impl Entity for HealthPlan {
    fn id(&self) -> EntityId {
        self.id
    }

    fn audit(&self) -> &AuditStamps {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditStamps {
        &mut self.audit
    }
}
