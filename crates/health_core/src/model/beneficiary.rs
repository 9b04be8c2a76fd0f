//! Beneficiary entity enrolled under a health plan.

use crate::model::entity::{AuditStamps, Entity, EntityId};
use crate::model::error::DomainError;
use crate::model::value_objects::{BirthDate, Cpf, Name};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Enrollment status. Persisted and serialized by variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Active" => Ok(Self::Active),
            "Inactive" => Ok(Self::Inactive),
            other => Err(format!("unknown beneficiary status `{other}`")),
        }
    }
}

/// Person enrolled under a health plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beneficiary {
    pub id: EntityId,
    pub full_name: Name,
    pub cpf: Cpf,
    pub status: Status,
    pub birth_date: BirthDate,
    pub health_plan_id: EntityId,
    pub audit: AuditStamps,
}

impl Beneficiary {
    /// Creates an active beneficiary with a generated id.
    pub fn create(
        full_name: &str,
        cpf: &str,
        birth_date: NaiveDate,
        health_plan_id: EntityId,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id: Uuid::new_v4(),
            full_name: Name::create(full_name)?,
            cpf: Cpf::create(cpf)?,
            status: Status::Active,
            birth_date: BirthDate::create(birth_date)?,
            health_plan_id,
            audit: AuditStamps::new(),
        })
    }

    pub fn update_status(&mut self, status: Status) {
        self.status = status;
    }

    pub fn update_health_plan_id(&mut self, health_plan_id: EntityId) {
        self.health_plan_id = health_plan_id;
    }

    pub fn update_full_name(&mut self, full_name: &str) -> Result<(), DomainError> {
        self.full_name = Name::create(full_name)?;
        Ok(())
    }

    pub fn update_cpf(&mut self, cpf: &str) -> Result<(), DomainError> {
        self.cpf = Cpf::create(cpf)?;
        Ok(())
    }

    pub fn update_birth_date(&mut self, birth_date: NaiveDate) -> Result<(), DomainError> {
        self.birth_date = BirthDate::create(birth_date)?;
        Ok(())
    }
}

impl Entity for Beneficiary {
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
