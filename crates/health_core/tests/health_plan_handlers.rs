use chrono::NaiveDate;
use health_core::db::open_db_in_memory;
use health_core::service::beneficiaries::{CreateBeneficiaryCommand, GetBeneficiaryByIdQuery};
use health_core::service::health_plans::{
    CreateHealthPlanCommand, CreateHealthPlanResponse, DeleteHealthPlanCommand,
    GetHealthPlanByIdQuery, GetHealthPlansQuery, UpdateHealthPlanCommand,
};
use health_core::{DomainError, HealthPlanFilter, Mediator, ServiceError};
use uuid::Uuid;

fn mediator() -> Mediator {
    Mediator::new(open_db_in_memory().unwrap())
}

fn create_command(name: &str, code: &str) -> CreateHealthPlanCommand {
    CreateHealthPlanCommand {
        name: Some(name.to_string()),
        ans_registration_code: Some(code.to_string()),
    }
}

fn create_plan(mediator: &Mediator, name: &str, code: &str) -> CreateHealthPlanResponse {
    mediator.send(create_command(name, code)).unwrap()
}

fn update_command(id: Uuid, name: Option<&str>, code: Option<&str>) -> UpdateHealthPlanCommand {
    UpdateHealthPlanCommand {
        health_plan_id: id,
        new_name: name.map(str::to_string),
        new_ans_registration_code: code.map(str::to_string),
    }
}

#[test]
fn create_returns_formatted_ans_code() {
    let mediator = mediator();
    let created = create_plan(&mediator, "Plano Ouro", "123456");

    assert!(!created.id.is_nil());
    assert_eq!(created.name, "Plano Ouro");
    assert_eq!(created.ans_code, "ANS-123456");
}

#[test]
fn create_reports_every_missing_field() {
    let err = mediator()
        .send(CreateHealthPlanCommand::default())
        .unwrap_err();

    let ServiceError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["ansRegistrationCode", "name"]);
    assert_eq!(
        errors.get("name").unwrap(),
        &[
            "health plan name is required".to_string(),
            "name cannot be empty".to_string()
        ]
    );
}

#[test]
fn create_validates_format_rules() {
    let err = mediator()
        .send(create_command("Plano 1", "012345"))
        .unwrap_err();

    let ServiceError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert_eq!(
        errors.get("name").unwrap(),
        &["name cannot contain digits or special characters".to_string()]
    );
    assert_eq!(
        errors.get("ansRegistrationCode").unwrap(),
        &["ANS code must contain only digits and cannot start with zero".to_string()]
    );
}

#[test]
fn create_with_five_character_name_passes_validation_but_fails_domain_rule() {
    let err = mediator().send(create_command("Maria", "123456")).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::InvalidNameLength { min: 5, max: 255 })
    ));
}

#[test]
fn create_conflicts_on_name_ignoring_case_and_on_code() {
    let mediator = mediator();
    create_plan(&mediator, "Plano Saúde", "123456");

    let by_name = mediator
        .send(create_command("PLANO SAÚDE", "654321"))
        .unwrap_err();
    assert!(matches!(by_name, ServiceError::Conflict(ref message) if message.contains("name")));

    let by_code = mediator
        .send(create_command("Plano Vida", "123456"))
        .unwrap_err();
    assert!(matches!(by_code, ServiceError::Conflict(ref message) if message.contains("ANS")));
}

#[test]
fn update_applies_changed_fields() {
    let mediator = mediator();
    let created = create_plan(&mediator, "Plano Ouro", "123456");

    let updated = mediator
        .send(update_command(created.id, Some("Plano Prata"), Some("654321")))
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Plano Prata");
    assert_eq!(updated.ans_code, "ANS-654321");

    let details = mediator
        .send(GetHealthPlanByIdQuery { id: created.id })
        .unwrap();
    assert_eq!(details.name, "Plano Prata");
    assert!(details.modification_date.is_some());
}

#[test]
fn update_skips_blank_and_case_only_changes() {
    let mediator = mediator();
    let created = create_plan(&mediator, "Plano Ouro", "123456");

    let updated = mediator
        .send(update_command(created.id, Some("PLANO OURO"), Some("  ")))
        .unwrap();
    assert_eq!(updated.name, "Plano Ouro");
    assert_eq!(updated.ans_code, "ANS-123456");
}

#[test]
fn update_conflicts_with_another_live_plan() {
    let mediator = mediator();
    create_plan(&mediator, "Plano Ouro", "123456");
    let other = create_plan(&mediator, "Plano Prata", "654321");

    let err = mediator
        .send(update_command(other.id, Some("plano ouro"), None))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let err = mediator
        .send(update_command(other.id, None, Some("123456")))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[test]
fn update_missing_plan_is_not_found() {
    let err = mediator()
        .send(update_command(Uuid::new_v4(), Some("Plano Novo"), None))
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test]
fn nil_ids_fail_validation() {
    let mediator = mediator();
    assert!(matches!(
        mediator.send(GetHealthPlanByIdQuery { id: Uuid::nil() }),
        Err(ServiceError::Validation(_))
    ));
    assert!(matches!(
        mediator.send(DeleteHealthPlanCommand {
            health_plan_id: Uuid::nil()
        }),
        Err(ServiceError::Validation(_))
    ));
}

#[test]
fn delete_hides_plan_and_frees_its_name() {
    let mediator = mediator();
    let created = create_plan(&mediator, "Plano Ouro", "123456");

    mediator
        .send(DeleteHealthPlanCommand {
            health_plan_id: created.id,
        })
        .unwrap();

    assert!(matches!(
        mediator.send(GetHealthPlanByIdQuery { id: created.id }),
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        mediator.send(DeleteHealthPlanCommand {
            health_plan_id: created.id
        }),
        Err(ServiceError::NotFound(_))
    ));
    create_plan(&mediator, "Plano Ouro", "123456");
}

#[test]
fn delete_soft_deletes_plan_with_enrolled_beneficiaries() {
    let mediator = mediator();
    let created = create_plan(&mediator, "Plano Ouro", "123456");
    let enrolled = mediator
        .send(CreateBeneficiaryCommand {
            health_plan_id: created.id,
            full_name: Some("Maria Silva".to_string()),
            cpf: Some("529.982.247-25".to_string()),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1),
        })
        .unwrap();

    mediator
        .send(DeleteHealthPlanCommand {
            health_plan_id: created.id,
        })
        .unwrap();

    assert!(matches!(
        mediator.send(GetHealthPlanByIdQuery { id: created.id }),
        Err(ServiceError::NotFound(_))
    ));
    let beneficiary = mediator
        .send(GetBeneficiaryByIdQuery { id: enrolled.id })
        .unwrap();
    assert_eq!(beneficiary.health_plan_id, created.id);
}

#[test]
fn get_by_id_lists_beneficiaries_by_name() {
    let mediator = mediator();
    let created = create_plan(&mediator, "Plano Ouro", "123456");
    for (name, cpf) in [("Zilda Rocha", "12345678909"), ("Ana Souza", "52998224725")] {
        mediator
            .send(CreateBeneficiaryCommand {
                health_plan_id: created.id,
                full_name: Some(name.to_string()),
                cpf: Some(cpf.to_string()),
                birth_date: NaiveDate::from_ymd_opt(1980, 6, 1),
            })
            .unwrap();
    }

    let details = mediator
        .send(GetHealthPlanByIdQuery { id: created.id })
        .unwrap();
    assert_eq!(details.ans_registration_code, "ANS-123456");
    assert_eq!(
        details
            .beneficiaries
            .iter()
            .map(|b| b.full_name.as_str())
            .collect::<Vec<_>>(),
        vec!["Ana Souza", "Zilda Rocha"]
    );
    assert!(details.modification_date.is_none());
}

#[test]
fn list_walks_pages_with_keyset_cursor() {
    let mediator = mediator();
    let mut expected = Vec::new();
    for (index, name) in ["Plano Alfa", "Plano Beta", "Plano Gama", "Plano Delta", "Plano Sigma"]
        .iter()
        .enumerate()
    {
        expected.push(create_plan(&mediator, name, &format!("10000{}", index + 1)).id);
    }
    expected.sort();

    let mut seen = Vec::new();
    let mut after_key = None;
    let mut pages = 0;
    loop {
        let page = mediator
            .send(GetHealthPlansQuery {
                filter: HealthPlanFilter::default(),
                page_size: 2,
                after_key,
            })
            .unwrap();
        pages += 1;
        assert_eq!(page.has_previous_page, after_key.is_some());
        assert_eq!(page.count, page.items.len());
        seen.extend(page.items.iter().map(|item| item.id));
        if !page.has_next_page {
            assert!(page.next_key.is_none());
            break;
        }
        after_key = page.next_key;
    }

    assert_eq!(pages, 3);
    assert_eq!(seen, expected);
}

#[test]
fn list_filters_by_name_and_code() {
    let mediator = mediator();
    create_plan(&mediator, "Plano Saúde Total", "123456");
    create_plan(&mediator, "Plano Vida", "654321");

    let page = mediator
        .send(GetHealthPlansQuery {
            filter: HealthPlanFilter {
                name: Some("saúde".to_string()),
                ans_code: None,
            },
            ..GetHealthPlansQuery::default()
        })
        .unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.items[0].name, "Plano Saúde Total");
    assert_eq!(page.items[0].ans_registration_code, "ANS-123456");

    let page = mediator
        .send(GetHealthPlansQuery {
            filter: HealthPlanFilter {
                name: None,
                ans_code: Some("543".to_string()),
            },
            ..GetHealthPlansQuery::default()
        })
        .unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.items[0].name, "Plano Vida");
}

#[test]
fn list_rejects_out_of_range_page_size() {
    let mediator = mediator();
    for page_size in [0, 101] {
        let err = mediator
            .send(GetHealthPlansQuery {
                page_size,
                ..GetHealthPlansQuery::default()
            })
            .unwrap_err();
        let ServiceError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.get("pageSize").is_some());
    }
}
