use crate::model::beneficiary::Beneficiary;
use crate::repo::beneficiary_repo::{BeneficiaryPredicate, BeneficiaryRepository};
use crate::repo::unit_of_work::UnitOfWork;
use crate::repo::Repository;
use crate::service::beneficiaries::{cpf_in_use, BeneficiaryView};
use crate::service::health_plans::{health_plan_not_found, name_format_rules, HEALTH_PLAN_ID_EMPTY};
use crate::service::mediator::{Request, RequestHandler, Validator};
use crate::service::validation::ValidationErrors;
use crate::service::ServiceResult;
use chrono::NaiveDate;
use uuid::Uuid;

/// Enrolls a new beneficiary under an existing plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBeneficiaryCommand {
    pub health_plan_id: Uuid,
    pub full_name: Option<String>,
    pub cpf: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl Request for CreateBeneficiaryCommand {
    type Response = BeneficiaryView;
    type Handler = CreateBeneficiaryHandler;
    type Validator = CreateBeneficiaryValidator;
    const NAME: &'static str = "CreateBeneficiaryCommand";
}

#[derive(Debug, Default)]
pub struct CreateBeneficiaryValidator;

impl Validator<CreateBeneficiaryCommand> for CreateBeneficiaryValidator {
    fn validate(&self, request: &CreateBeneficiaryCommand) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.not_nil("healthPlanId", request.health_plan_id, HEALTH_PLAN_ID_EMPTY);

        errors
            .rule_for("fullName", request.full_name.as_deref())
            .not_null("beneficiary full name is required")
            .not_empty("full name cannot be empty");
        name_format_rules(&mut errors, "fullName", request.full_name.as_deref());

        errors
            .rule_for("cpf", request.cpf.as_deref())
            .not_null("CPF is required")
            .not_empty("CPF cannot be empty");

        if request.birth_date.is_none() {
            errors.add("birthDate", "birth date is required");
        }

        errors
    }
}

#[derive(Debug, Default)]
pub struct CreateBeneficiaryHandler;

impl RequestHandler<CreateBeneficiaryCommand> for CreateBeneficiaryHandler {
    fn handle(
        &self,
        uow: &mut dyn UnitOfWork,
        request: CreateBeneficiaryCommand,
    ) -> ServiceResult<BeneficiaryView> {
        let plan = uow
            .health_plans()
            .get_by_id(request.health_plan_id)?
            .ok_or_else(health_plan_not_found)?;

        let birth_date = request.birth_date.unwrap_or_default();
        let beneficiary = Beneficiary::create(
            request.full_name.as_deref().unwrap_or_default(),
            request.cpf.as_deref().unwrap_or_default(),
            birth_date,
            plan.id,
        )?;

        if uow
            .beneficiaries()
            .exists(&BeneficiaryPredicate::CpfEquals(beneficiary.cpf.value().to_string()))?
        {
            return Err(cpf_in_use());
        }

        uow.beneficiaries().create(&beneficiary);
        uow.save_changes()?;
        Ok(BeneficiaryView::from(&beneficiary))
    }
}
