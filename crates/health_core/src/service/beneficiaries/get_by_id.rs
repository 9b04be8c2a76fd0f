use crate::repo::unit_of_work::UnitOfWork;
use crate::repo::Repository;
use crate::service::beneficiaries::{beneficiary_not_found, BeneficiaryView, BENEFICIARY_ID_EMPTY};
use crate::service::mediator::{Request, RequestHandler, Validator};
use crate::service::validation::ValidationErrors;
use crate::service::ServiceResult;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetBeneficiaryByIdQuery {
    pub id: Uuid,
}

impl Request for GetBeneficiaryByIdQuery {
    type Response = BeneficiaryView;
    type Handler = GetBeneficiaryByIdHandler;
    type Validator = GetBeneficiaryByIdValidator;
    const NAME: &'static str = "GetBeneficiaryByIdQuery";
}

#[derive(Debug, Default)]
pub struct GetBeneficiaryByIdValidator;

impl Validator<GetBeneficiaryByIdQuery> for GetBeneficiaryByIdValidator {
    fn validate(&self, request: &GetBeneficiaryByIdQuery) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.not_nil("id", request.id, BENEFICIARY_ID_EMPTY);
        errors
    }
}

#[derive(Debug, Default)]
pub struct GetBeneficiaryByIdHandler;

impl RequestHandler<GetBeneficiaryByIdQuery> for GetBeneficiaryByIdHandler {
    fn handle(
        &self,
        uow: &mut dyn UnitOfWork,
        request: GetBeneficiaryByIdQuery,
    ) -> ServiceResult<BeneficiaryView> {
        uow.beneficiaries()
            .get_by_id(request.id)?
            .map(|beneficiary| BeneficiaryView::from(&beneficiary))
            .ok_or_else(beneficiary_not_found)
    }
}
