use crate::model::beneficiary::Beneficiary;
use crate::model::health_plan::HealthPlan;
use crate::repo::health_plan_repo::HealthPlanRepository;
use crate::repo::unit_of_work::UnitOfWork;
use crate::service::health_plans::{health_plan_not_found, HEALTH_PLAN_ID_EMPTY};
use crate::service::mediator::{Request, RequestHandler, Validator};
use crate::service::validation::ValidationErrors;
use crate::service::ServiceResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Loads one plan with its live beneficiaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetHealthPlanByIdQuery {
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiarySummary {
    pub id: Uuid,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthPlanDetails {
    pub name: String,
    pub ans_registration_code: String,
    pub beneficiaries: Vec<BeneficiarySummary>,
    pub creation_date: DateTime<Utc>,
    pub modification_date: Option<DateTime<Utc>>,
}

impl From<&Beneficiary> for BeneficiarySummary {
    fn from(beneficiary: &Beneficiary) -> Self {
        Self {
            id: beneficiary.id,
            full_name: beneficiary.full_name.to_string(),
        }
    }
}

impl From<&HealthPlan> for HealthPlanDetails {
    fn from(plan: &HealthPlan) -> Self {
        Self {
            name: plan.name.to_string(),
            ans_registration_code: plan.ans_registration_code.to_string(),
            beneficiaries: plan.beneficiaries.iter().map(BeneficiarySummary::from).collect(),
            creation_date: plan.audit.created_at,
            modification_date: plan.audit.updated_at,
        }
    }
}

impl Request for GetHealthPlanByIdQuery {
    type Response = HealthPlanDetails;
    type Handler = GetHealthPlanByIdHandler;
    type Validator = GetHealthPlanByIdValidator;
    const NAME: &'static str = "GetHealthPlanByIdQuery";
}

#[derive(Debug, Default)]
pub struct GetHealthPlanByIdValidator;

impl Validator<GetHealthPlanByIdQuery> for GetHealthPlanByIdValidator {
    fn validate(&self, request: &GetHealthPlanByIdQuery) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.not_nil("id", request.id, HEALTH_PLAN_ID_EMPTY);
        errors
    }
}

#[derive(Debug, Default)]
pub struct GetHealthPlanByIdHandler;

impl RequestHandler<GetHealthPlanByIdQuery> for GetHealthPlanByIdHandler {
    fn handle(
        &self,
        uow: &mut dyn UnitOfWork,
        request: GetHealthPlanByIdQuery,
    ) -> ServiceResult<HealthPlanDetails> {
        let plan = uow
            .health_plans()
            .get_by_id_with_beneficiaries(request.id)?
            .ok_or_else(health_plan_not_found)?;
        Ok(HealthPlanDetails::from(&plan))
    }
}
