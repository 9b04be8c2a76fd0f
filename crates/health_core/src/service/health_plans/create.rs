use crate::model::health_plan::HealthPlan;
use crate::repo::health_plan_repo::{HealthPlanPredicate, HealthPlanRepository};
use crate::repo::Repository;
use crate::repo::unit_of_work::UnitOfWork;
use crate::service::health_plans::{ans_code_format_rules, name_format_rules};
use crate::service::mediator::{Request, RequestHandler, Validator};
use crate::service::validation::ValidationErrors;
use crate::service::{ServiceError, ServiceResult};
use serde::Serialize;
use uuid::Uuid;

/// Registers a new health plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateHealthPlanCommand {
    pub name: Option<String>,
    pub ans_registration_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHealthPlanResponse {
    pub id: Uuid,
    pub name: String,
    pub ans_code: String,
}

impl From<&HealthPlan> for CreateHealthPlanResponse {
    fn from(plan: &HealthPlan) -> Self {
        Self {
            id: plan.id,
            name: plan.name.to_string(),
            ans_code: plan.ans_registration_code.to_string(),
        }
    }
}

impl Request for CreateHealthPlanCommand {
    type Response = CreateHealthPlanResponse;
    type Handler = CreateHealthPlanHandler;
    type Validator = CreateHealthPlanValidator;
    const NAME: &'static str = "CreateHealthPlanCommand";
}

#[derive(Debug, Default)]
pub struct CreateHealthPlanValidator;

impl Validator<CreateHealthPlanCommand> for CreateHealthPlanValidator {
    fn validate(&self, request: &CreateHealthPlanCommand) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        errors
            .rule_for("name", request.name.as_deref())
            .not_null("health plan name is required")
            .not_empty("name cannot be empty");
        name_format_rules(&mut errors, "name", request.name.as_deref());

        errors
            .rule_for("ansRegistrationCode", request.ans_registration_code.as_deref())
            .not_null("ANS registration code is required")
            .not_empty("ANS registration code cannot be empty");
        ans_code_format_rules(
            &mut errors,
            "ansRegistrationCode",
            request.ans_registration_code.as_deref(),
        );

        errors
    }
}

#[derive(Debug, Default)]
pub struct CreateHealthPlanHandler;

impl RequestHandler<CreateHealthPlanCommand> for CreateHealthPlanHandler {
    fn handle(
        &self,
        uow: &mut dyn UnitOfWork,
        request: CreateHealthPlanCommand,
    ) -> ServiceResult<CreateHealthPlanResponse> {
        let name = request.name.unwrap_or_default();
        let ans_code = request.ans_registration_code.unwrap_or_default();

        let probes = [
            (
                HealthPlanPredicate::NameEquals(name.clone()),
                "health plan name is already in use",
            ),
            (
                HealthPlanPredicate::AnsCodeEquals(ans_code.clone()),
                "ANS code is already in use",
            ),
        ];
        for (predicate, message) in &probes {
            if uow.health_plans().exists(predicate)? {
                return Err(ServiceError::Conflict((*message).to_string()));
            }
        }

        let plan = HealthPlan::create(&name, &ans_code)?;
        uow.health_plans().create(&plan);
        uow.save_changes()?;

        Ok(CreateHealthPlanResponse::from(&plan))
    }
}
