use crate::repo::unit_of_work::UnitOfWork;
use crate::repo::Repository;
use crate::service::beneficiaries::{beneficiary_not_found, BENEFICIARY_ID_EMPTY};
use crate::service::mediator::{Request, RequestHandler, Validator};
use crate::service::validation::ValidationErrors;
use crate::service::{EmptyResult, ServiceResult};
use uuid::Uuid;

/// Soft-deletes a beneficiary, freeing its CPF for reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteBeneficiaryCommand {
    pub beneficiary_id: Uuid,
}

impl Request for DeleteBeneficiaryCommand {
    type Response = EmptyResult;
    type Handler = DeleteBeneficiaryHandler;
    type Validator = DeleteBeneficiaryValidator;
    const NAME: &'static str = "DeleteBeneficiaryCommand";
}

#[derive(Debug, Default)]
pub struct DeleteBeneficiaryValidator;

impl Validator<DeleteBeneficiaryCommand> for DeleteBeneficiaryValidator {
    fn validate(&self, request: &DeleteBeneficiaryCommand) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.not_nil("beneficiaryId", request.beneficiary_id, BENEFICIARY_ID_EMPTY);
        errors
    }
}

#[derive(Debug, Default)]
pub struct DeleteBeneficiaryHandler;

impl RequestHandler<DeleteBeneficiaryCommand> for DeleteBeneficiaryHandler {
    fn handle(
        &self,
        uow: &mut dyn UnitOfWork,
        request: DeleteBeneficiaryCommand,
    ) -> ServiceResult<EmptyResult> {
        let beneficiary = uow
            .beneficiaries()
            .get_by_id(request.beneficiary_id)?
            .ok_or_else(beneficiary_not_found)?;

        uow.beneficiaries().delete(&beneficiary);
        uow.save_changes()?;
        Ok(EmptyResult {})
    }
}
