use crate::model::health_plan::HealthPlan;
use crate::repo::health_plan_repo::{HealthPlanFilter, HealthPlanRepository};
use crate::repo::unit_of_work::UnitOfWork;
use crate::service::mediator::{Request, RequestHandler, Validator};
use crate::service::pagination::{KeysetPagedResult, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::service::validation::ValidationErrors;
use crate::service::ServiceResult;
use serde::Serialize;
use uuid::Uuid;

/// Lists live plans one keyset page at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetHealthPlansQuery {
    pub filter: HealthPlanFilter,
    pub page_size: u32,
    pub after_key: Option<Uuid>,
}

impl Default for GetHealthPlansQuery {
    fn default() -> Self {
        Self {
            filter: HealthPlanFilter::default(),
            page_size: DEFAULT_PAGE_SIZE,
            after_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthPlanListItem {
    pub id: Uuid,
    pub name: String,
    pub ans_registration_code: String,
}

impl From<HealthPlan> for HealthPlanListItem {
    fn from(plan: HealthPlan) -> Self {
        Self {
            id: plan.id,
            name: plan.name.to_string(),
            ans_registration_code: plan.ans_registration_code.to_string(),
        }
    }
}

impl Request for GetHealthPlansQuery {
    type Response = KeysetPagedResult<HealthPlanListItem>;
    type Handler = GetHealthPlansHandler;
    type Validator = GetHealthPlansValidator;
    const NAME: &'static str = "GetHealthPlansQuery";
}

#[derive(Debug, Default)]
pub struct GetHealthPlansValidator;

impl Validator<GetHealthPlansQuery> for GetHealthPlansValidator {
    fn validate(&self, request: &GetHealthPlansQuery) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        page_size_rule(&mut errors, request.page_size);
        errors
    }
}

pub(crate) fn page_size_rule(errors: &mut ValidationErrors, page_size: u32) {
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        errors.add(
            "pageSize",
            format!("page size must be between 1 and {MAX_PAGE_SIZE}"),
        );
    }
}

#[derive(Debug, Default)]
pub struct GetHealthPlansHandler;

impl RequestHandler<GetHealthPlansQuery> for GetHealthPlansHandler {
    fn handle(
        &self,
        uow: &mut dyn UnitOfWork,
        request: GetHealthPlansQuery,
    ) -> ServiceResult<KeysetPagedResult<HealthPlanListItem>> {
        let plans = uow.health_plans().get_paged(
            &request.filter,
            request.page_size,
            request.after_key,
        )?;
        let items = plans.into_iter().map(HealthPlanListItem::from).collect();

        Ok(KeysetPagedResult::create(
            items,
            request.page_size,
            |item: &HealthPlanListItem| item.id,
            request.after_key.is_some(),
        ))
    }
}
