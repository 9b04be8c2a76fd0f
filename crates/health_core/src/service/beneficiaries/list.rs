use crate::repo::beneficiary_repo::{BeneficiaryFilter, BeneficiaryRepository};
use crate::repo::unit_of_work::UnitOfWork;
use crate::repo::Repository;
use crate::service::beneficiaries::BeneficiaryView;
use crate::service::health_plans::list::page_size_rule;
use crate::service::health_plans::{health_plan_not_found, HEALTH_PLAN_ID_EMPTY};
use crate::service::mediator::{Request, RequestHandler, Validator};
use crate::service::pagination::{KeysetPagedResult, DEFAULT_PAGE_SIZE};
use crate::service::validation::ValidationErrors;
use crate::service::ServiceResult;
use uuid::Uuid;

/// Lists the live beneficiaries of one plan, one keyset page at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetBeneficiariesQuery {
    pub health_plan_id: Uuid,
    pub filter: BeneficiaryFilter,
    pub page_size: u32,
    pub after_key: Option<Uuid>,
}

impl GetBeneficiariesQuery {
    pub fn for_plan(health_plan_id: Uuid) -> Self {
        Self {
            health_plan_id,
            filter: BeneficiaryFilter::default(),
            page_size: DEFAULT_PAGE_SIZE,
            after_key: None,
        }
    }
}

impl Request for GetBeneficiariesQuery {
    type Response = KeysetPagedResult<BeneficiaryView>;
    type Handler = GetBeneficiariesHandler;
    type Validator = GetBeneficiariesValidator;
    const NAME: &'static str = "GetBeneficiariesQuery";
}

#[derive(Debug, Default)]
pub struct GetBeneficiariesValidator;

impl Validator<GetBeneficiariesQuery> for GetBeneficiariesValidator {
    fn validate(&self, request: &GetBeneficiariesQuery) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.not_nil("healthPlanId", request.health_plan_id, HEALTH_PLAN_ID_EMPTY);
        page_size_rule(&mut errors, request.page_size);
        errors
    }
}

#[derive(Debug, Default)]
pub struct GetBeneficiariesHandler;

impl RequestHandler<GetBeneficiariesQuery> for GetBeneficiariesHandler {
    fn handle(
        &self,
        uow: &mut dyn UnitOfWork,
        request: GetBeneficiariesQuery,
    ) -> ServiceResult<KeysetPagedResult<BeneficiaryView>> {
        let plan = uow
            .health_plans()
            .get_by_id(request.health_plan_id)?
            .ok_or_else(health_plan_not_found)?;

        let beneficiaries = uow.beneficiaries().get_paged_by_health_plan(
            plan.id,
            &request.filter,
            request.page_size,
            request.after_key,
        )?;
        let items = beneficiaries.iter().map(BeneficiaryView::from).collect();

        Ok(KeysetPagedResult::create(
            items,
            request.page_size,
            |view: &BeneficiaryView| view.id,
            request.after_key.is_some(),
        ))
    }
}
