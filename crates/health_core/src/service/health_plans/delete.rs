use crate::repo::unit_of_work::UnitOfWork;
use crate::repo::Repository;
use crate::service::health_plans::{health_plan_not_found, HEALTH_PLAN_ID_EMPTY};
use crate::service::mediator::{Request, RequestHandler, Validator};
use crate::service::validation::ValidationErrors;
use crate::service::{EmptyResult, ServiceResult};
use uuid::Uuid;

/// Soft-deletes a plan. Its beneficiaries are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteHealthPlanCommand {
    pub health_plan_id: Uuid,
}

impl Request for DeleteHealthPlanCommand {
    type Response = EmptyResult;
    type Handler = DeleteHealthPlanHandler;
    type Validator = DeleteHealthPlanValidator;
    const NAME: &'static str = "DeleteHealthPlanCommand";
}

#[derive(Debug, Default)]
pub struct DeleteHealthPlanValidator;

impl Validator<DeleteHealthPlanCommand> for DeleteHealthPlanValidator {
    fn validate(&self, request: &DeleteHealthPlanCommand) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.not_nil("healthPlanId", request.health_plan_id, HEALTH_PLAN_ID_EMPTY);
        errors
    }
}

#[derive(Debug, Default)]
pub struct DeleteHealthPlanHandler;

impl RequestHandler<DeleteHealthPlanCommand> for DeleteHealthPlanHandler {
    fn handle(
        &self,
        uow: &mut dyn UnitOfWork,
        request: DeleteHealthPlanCommand,
    ) -> ServiceResult<EmptyResult> {
        let plan = uow
            .health_plans()
            .get_by_id(request.health_plan_id)?
            .ok_or_else(health_plan_not_found)?;

        uow.health_plans().delete(&plan);
        uow.save_changes()?;
        Ok(EmptyResult {})
    }
}
