//! Wire shapes for request bodies and query strings.

use chrono::NaiveDate;
use health_core::service::beneficiaries::{
    CreateBeneficiaryCommand, GetBeneficiariesQuery, UpdateBeneficiaryCommand,
};
use health_core::service::health_plans::{
    CreateHealthPlanCommand, GetHealthPlansQuery, UpdateHealthPlanCommand,
};
use health_core::service::DEFAULT_PAGE_SIZE;
use health_core::{BeneficiaryFilter, HealthPlanFilter, Status};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHealthPlanRequest {
    pub name: Option<String>,
    pub ans_registration_code: Option<String>,
}

impl From<CreateHealthPlanRequest> for CreateHealthPlanCommand {
    fn from(value: CreateHealthPlanRequest) -> Self {
        Self {
            name: value.name,
            ans_registration_code: value.ans_registration_code,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHealthPlanRequest {
    pub new_name: Option<String>,
    pub new_ans_registration_code: Option<String>,
}

impl UpdateHealthPlanRequest {
    pub fn into_command(self, health_plan_id: Uuid) -> UpdateHealthPlanCommand {
        UpdateHealthPlanCommand {
            health_plan_id,
            new_name: self.new_name,
            new_ans_registration_code: self.new_ans_registration_code,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthPlanListParams {
    pub name: Option<String>,
    pub ans_code: Option<String>,
    pub page_size: Option<u32>,
    pub after_key: Option<Uuid>,
}

impl From<HealthPlanListParams> for GetHealthPlansQuery {
    fn from(value: HealthPlanListParams) -> Self {
        Self {
            filter: HealthPlanFilter {
                name: value.name,
                ans_code: value.ans_code,
            },
            page_size: value.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            after_key: value.after_key,
        }
    }
}

/// Birth dates travel as ISO `YYYY-MM-DD`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBeneficiaryRequest {
    pub full_name: Option<String>,
    pub cpf: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl CreateBeneficiaryRequest {
    pub fn into_command(self, health_plan_id: Uuid) -> CreateBeneficiaryCommand {
        CreateBeneficiaryCommand {
            health_plan_id,
            full_name: self.full_name,
            cpf: self.cpf,
            birth_date: self.birth_date,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBeneficiaryRequest {
    pub new_full_name: Option<String>,
    pub new_cpf: Option<String>,
    pub new_birth_date: Option<NaiveDate>,
    pub new_status: Option<Status>,
    pub new_health_plan_id: Option<Uuid>,
}

impl UpdateBeneficiaryRequest {
    pub fn into_command(self, beneficiary_id: Uuid) -> UpdateBeneficiaryCommand {
        UpdateBeneficiaryCommand {
            beneficiary_id,
            new_full_name: self.new_full_name,
            new_cpf: self.new_cpf,
            new_birth_date: self.new_birth_date,
            new_status: self.new_status,
            new_health_plan_id: self.new_health_plan_id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryListParams {
    pub full_name: Option<String>,
    pub cpf: Option<String>,
    pub page_size: Option<u32>,
    pub after_key: Option<Uuid>,
}

impl BeneficiaryListParams {
    pub fn into_query(self, health_plan_id: Uuid) -> GetBeneficiariesQuery {
        GetBeneficiariesQuery {
            health_plan_id,
            filter: BeneficiaryFilter {
                full_name: self.full_name,
                cpf: self.cpf,
            },
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            after_key: self.after_key,
        }
    }
}
