//! Health plan commands and queries.

use crate::model::value_objects::{AnsRegistrationCode, Name, NAME_RE};
use crate::service::validation::ValidationErrors;
use crate::service::ServiceError;
use once_cell::sync::Lazy;
use regex::Regex;

pub mod create;
pub mod delete;
pub mod get_by_id;
pub mod list;
pub mod update;

pub use create::{CreateHealthPlanCommand, CreateHealthPlanResponse};
pub use delete::DeleteHealthPlanCommand;
pub use get_by_id::{BeneficiarySummary, GetHealthPlanByIdQuery, HealthPlanDetails};
pub use list::{GetHealthPlansQuery, HealthPlanListItem};
pub use update::{UpdateHealthPlanCommand, UpdateHealthPlanResponse};

static ANS_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[1-9]\d*$").expect("valid ANS regex"));

pub(crate) const HEALTH_PLAN_ID_EMPTY: &str = "health plan id cannot be empty";

pub(crate) fn name_length_message() -> String {
    format!(
        "name must contain between {} and {} characters",
        Name::MIN_LENGTH,
        Name::MAX_LENGTH
    )
}

pub(crate) const NAME_PATTERN_MESSAGE: &str = "name cannot contain digits or special characters";

pub(crate) fn health_plan_not_found() -> ServiceError {
    ServiceError::NotFound("health plan not found".to_string())
}

/// Length and pattern rules shared by create and update.
fn ans_code_format_rules(errors: &mut ValidationErrors, field: &str, value: Option<&str>) {
    let length_message = format!(
        "ANS registration code must contain exactly {} characters",
        AnsRegistrationCode::CODE_LENGTH
    );
    errors
        .rule_for(field, value)
        .length(
            AnsRegistrationCode::CODE_LENGTH,
            AnsRegistrationCode::CODE_LENGTH,
            &length_message,
        )
        .matches(
            &ANS_CODE_RE,
            "ANS code must contain only digits and cannot start with zero",
        );
}

pub(crate) fn name_format_rules(errors: &mut ValidationErrors, field: &str, value: Option<&str>) {
    errors
        .rule_for(field, value)
        .length(Name::MIN_LENGTH, Name::MAX_LENGTH, &name_length_message())
        .matches(&NAME_RE, NAME_PATTERN_MESSAGE);
}

/// Returns the trimmed new value unless it is blank or equal, ignoring case,
/// to `current`.
pub(crate) fn changed_value<'a>(current: &str, new_value: Option<&'a str>) -> Option<&'a str> {
    let candidate = new_value?.trim();
    if candidate.is_empty() || crate::db::casefold(candidate) == crate::db::casefold(current) {
        return None;
    }
    Some(candidate)
}

#[cfg(test)]
mod tests {
    use super::{changed_value, name_format_rules, NAME_PATTERN_MESSAGE};
    use crate::model::value_objects::Name;
    use crate::service::validation::ValidationErrors;

    #[test]
    fn name_rules_agree_with_the_domain_pattern() {
        for candidate in ["Plano Saúde", "Ana-Maria d'Ávila", "Plano 1", "Plano  Duplo", "Plano_Ouro"] {
            let mut errors = ValidationErrors::new();
            name_format_rules(&mut errors, "name", Some(candidate));
            let pattern_rejected = errors
                .get("name")
                .is_some_and(|messages| messages.iter().any(|m| m.as_str() == NAME_PATTERN_MESSAGE));
            assert_eq!(
                pattern_rejected,
                !Name::matches_pattern(candidate),
                "disagreement on `{candidate}`"
            );
        }
    }

    #[test]
    fn changed_value_skips_blank_and_case_only_changes() {
        assert_eq!(changed_value("Plano Saúde", None), None);
        assert_eq!(changed_value("Plano Saúde", Some("   ")), None);
        assert_eq!(changed_value("Plano Saúde", Some(" PLANO SAÚDE ")), None);
        assert_eq!(
            changed_value("Plano Saúde", Some(" Plano Vida ")),
            Some("Plano Vida")
        );
    }
}
