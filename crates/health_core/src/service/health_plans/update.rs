use crate::model::health_plan::HealthPlan;
use crate::repo::health_plan_repo::{HealthPlanPredicate, HealthPlanRepository};
use crate::repo::Repository;
use crate::repo::unit_of_work::UnitOfWork;
use crate::service::health_plans::{
    ans_code_format_rules, changed_value, health_plan_not_found, name_format_rules,
    HEALTH_PLAN_ID_EMPTY,
};
use crate::service::mediator::{Request, RequestHandler, Validator};
use crate::service::validation::{non_blank, ValidationErrors};
use crate::service::{ServiceError, ServiceResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Renames a plan and/or changes its ANS code.
///
/// Blank fields and values equal (ignoring case) to the current ones are
/// left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateHealthPlanCommand {
    pub health_plan_id: Uuid,
    pub new_name: Option<String>,
    pub new_ans_registration_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHealthPlanResponse {
    pub id: Uuid,
    pub name: String,
    pub ans_code: String,
    pub creation_date: DateTime<Utc>,
}

impl From<&HealthPlan> for UpdateHealthPlanResponse {
    fn from(plan: &HealthPlan) -> Self {
        Self {
            id: plan.id,
            name: plan.name.to_string(),
            ans_code: plan.ans_registration_code.to_string(),
            creation_date: plan.audit.created_at,
        }
    }
}

impl Request for UpdateHealthPlanCommand {
    type Response = UpdateHealthPlanResponse;
    type Handler = UpdateHealthPlanHandler;
    type Validator = UpdateHealthPlanValidator;
    const NAME: &'static str = "UpdateHealthPlanCommand";
}

#[derive(Debug, Default)]
pub struct UpdateHealthPlanValidator;

impl Validator<UpdateHealthPlanCommand> for UpdateHealthPlanValidator {
    fn validate(&self, request: &UpdateHealthPlanCommand) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.not_nil("healthPlanId", request.health_plan_id, HEALTH_PLAN_ID_EMPTY);
        name_format_rules(&mut errors, "newName", non_blank(request.new_name.as_deref()));
        ans_code_format_rules(
            &mut errors,
            "newAnsRegistrationCode",
            non_blank(request.new_ans_registration_code.as_deref()),
        );
        errors
    }
}

#[derive(Debug, Default)]
pub struct UpdateHealthPlanHandler;

impl RequestHandler<UpdateHealthPlanCommand> for UpdateHealthPlanHandler {
    fn handle(
        &self,
        uow: &mut dyn UnitOfWork,
        request: UpdateHealthPlanCommand,
    ) -> ServiceResult<UpdateHealthPlanResponse> {
        let mut plan = uow
            .health_plans()
            .get_by_id(request.health_plan_id)?
            .ok_or_else(health_plan_not_found)?;

        if let Some(new_name) = changed_value(plan.name.value(), request.new_name.as_deref()) {
            if uow
                .health_plans()
                .exists(&HealthPlanPredicate::NameEquals(new_name.to_string()))?
            {
                return Err(ServiceError::Conflict(
                    "health plan name is already in use".to_string(),
                ));
            }
            plan.update_name(new_name)?;
        }

        if let Some(new_code) = changed_value(
            plan.ans_registration_code.value(),
            request.new_ans_registration_code.as_deref(),
        ) {
            if uow
                .health_plans()
                .exists(&HealthPlanPredicate::AnsCodeEquals(new_code.to_string()))?
            {
                return Err(ServiceError::Conflict(
                    "health plan ANS registration code is already in use".to_string(),
                ));
            }
            plan.update_ans_code(new_code)?;
        }

        uow.health_plans().update(&plan);
        uow.save_changes()?;

        Ok(UpdateHealthPlanResponse::from(&plan))
    }
}
