use crate::model::beneficiary::Status;
use crate::model::value_objects::Cpf;
use crate::repo::beneficiary_repo::{BeneficiaryPredicate, BeneficiaryRepository};
use crate::repo::unit_of_work::UnitOfWork;
use crate::repo::Repository;
use crate::service::beneficiaries::{
    beneficiary_not_found, cpf_in_use, BeneficiaryView, BENEFICIARY_ID_EMPTY,
};
use crate::service::health_plans::{
    changed_value, health_plan_not_found, name_format_rules, HEALTH_PLAN_ID_EMPTY,
};
use crate::service::mediator::{Request, RequestHandler, Validator};
use crate::service::validation::{non_blank, ValidationErrors};
use crate::service::ServiceResult;
use chrono::NaiveDate;
use uuid::Uuid;

/// Partially updates a beneficiary; absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBeneficiaryCommand {
    pub beneficiary_id: Uuid,
    pub new_full_name: Option<String>,
    pub new_cpf: Option<String>,
    pub new_birth_date: Option<NaiveDate>,
    pub new_status: Option<Status>,
    pub new_health_plan_id: Option<Uuid>,
}

impl UpdateBeneficiaryCommand {
    /// Command that changes nothing, for field-by-field construction.
    pub fn for_beneficiary(beneficiary_id: Uuid) -> Self {
        Self {
            beneficiary_id,
            new_full_name: None,
            new_cpf: None,
            new_birth_date: None,
            new_status: None,
            new_health_plan_id: None,
        }
    }
}

impl Request for UpdateBeneficiaryCommand {
    type Response = BeneficiaryView;
    type Handler = UpdateBeneficiaryHandler;
    type Validator = UpdateBeneficiaryValidator;
    const NAME: &'static str = "UpdateBeneficiaryCommand";
}

#[derive(Debug, Default)]
pub struct UpdateBeneficiaryValidator;

impl Validator<UpdateBeneficiaryCommand> for UpdateBeneficiaryValidator {
    fn validate(&self, request: &UpdateBeneficiaryCommand) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.not_nil("beneficiaryId", request.beneficiary_id, BENEFICIARY_ID_EMPTY);
        name_format_rules(
            &mut errors,
            "newFullName",
            non_blank(request.new_full_name.as_deref()),
        );
        if let Some(plan_id) = request.new_health_plan_id {
            errors.not_nil("newHealthPlanId", plan_id, HEALTH_PLAN_ID_EMPTY);
        }
        errors
    }
}

#[derive(Debug, Default)]
pub struct UpdateBeneficiaryHandler;

impl RequestHandler<UpdateBeneficiaryCommand> for UpdateBeneficiaryHandler {
    fn handle(
        &self,
        uow: &mut dyn UnitOfWork,
        request: UpdateBeneficiaryCommand,
    ) -> ServiceResult<BeneficiaryView> {
        let mut beneficiary = uow
            .beneficiaries()
            .get_by_id(request.beneficiary_id)?
            .ok_or_else(beneficiary_not_found)?;

        if let Some(new_name) =
            changed_value(beneficiary.full_name.value(), request.new_full_name.as_deref())
        {
            beneficiary.update_full_name(new_name)?;
        }

        if let Some(new_cpf) = non_blank(request.new_cpf.as_deref()) {
            if Cpf::sanitize(new_cpf) != beneficiary.cpf.value() {
                if uow
                    .beneficiaries()
                    .exists(&BeneficiaryPredicate::CpfEquals(new_cpf.to_string()))?
                {
                    return Err(cpf_in_use());
                }
                beneficiary.update_cpf(new_cpf)?;
            }
        }

        if let Some(new_birth_date) = request.new_birth_date {
            if new_birth_date != beneficiary.birth_date.value() {
                beneficiary.update_birth_date(new_birth_date)?;
            }
        }

        if let Some(new_status) = request.new_status {
            beneficiary.update_status(new_status);
        }

        if let Some(new_plan_id) = request.new_health_plan_id {
            if new_plan_id != beneficiary.health_plan_id {
                let plan = uow
                    .health_plans()
                    .get_by_id(new_plan_id)?
                    .ok_or_else(health_plan_not_found)?;
                beneficiary.update_health_plan_id(plan.id);
            }
        }

        uow.beneficiaries().update(&beneficiary);
        uow.save_changes()?;
        Ok(BeneficiaryView::from(&beneficiary))
    }
}
