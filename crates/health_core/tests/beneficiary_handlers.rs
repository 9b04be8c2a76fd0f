use chrono::{Datelike, Duration, NaiveDate, Utc};
use health_core::db::open_db_in_memory;
use health_core::service::beneficiaries::{
    BeneficiaryView, CreateBeneficiaryCommand, DeleteBeneficiaryCommand, GetBeneficiariesQuery,
    GetBeneficiaryByIdQuery, UpdateBeneficiaryCommand,
};
use health_core::service::health_plans::CreateHealthPlanCommand;
use health_core::{BeneficiaryFilter, DomainError, Mediator, ServiceError, Status};
use uuid::Uuid;

fn mediator() -> Mediator {
    Mediator::new(open_db_in_memory().unwrap())
}

fn create_plan(mediator: &Mediator, name: &str, code: &str) -> Uuid {
    mediator
        .send(CreateHealthPlanCommand {
            name: Some(name.to_string()),
            ans_registration_code: Some(code.to_string()),
        })
        .unwrap()
        .id
}

fn birth() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 5, 17).unwrap()
}

fn create_command(plan_id: Uuid, name: &str, cpf: &str) -> CreateBeneficiaryCommand {
    CreateBeneficiaryCommand {
        health_plan_id: plan_id,
        full_name: Some(name.to_string()),
        cpf: Some(cpf.to_string()),
        birth_date: Some(birth()),
    }
}

fn enroll(mediator: &Mediator, plan_id: Uuid, name: &str, cpf: &str) -> BeneficiaryView {
    mediator.send(create_command(plan_id, name, cpf)).unwrap()
}

#[test]
fn create_returns_formatted_view() {
    let mediator = mediator();
    let plan_id = create_plan(&mediator, "Plano Ouro", "123456");

    let view = enroll(&mediator, plan_id, "Maria Silva", "52998224725");
    assert_eq!(view.full_name, "Maria Silva");
    assert_eq!(view.cpf, "529.982.247-25");
    assert_eq!(view.status, Status::Active);
    assert_eq!(view.birth_date, "17/05/1990");
    assert_eq!(view.age, Utc::now().year() - 1990);
    assert_eq!(view.health_plan_id, plan_id);
    assert!(view.modification_date.is_none());
}

#[test]
fn create_requires_every_field() {
    let err = mediator()
        .send(CreateBeneficiaryCommand {
            health_plan_id: Uuid::nil(),
            full_name: None,
            cpf: Some("  ".to_string()),
            birth_date: None,
        })
        .unwrap_err();

    let ServiceError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert_eq!(
        errors.fields().collect::<Vec<_>>(),
        vec!["birthDate", "cpf", "fullName", "healthPlanId"]
    );
    assert_eq!(errors.get("cpf").unwrap(), &["CPF cannot be empty".to_string()]);
}

#[test]
fn create_under_missing_plan_is_not_found() {
    let err = mediator()
        .send(create_command(Uuid::new_v4(), "Maria Silva", "52998224725"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test]
fn create_surfaces_domain_errors() {
    let mediator = mediator();
    let plan_id = create_plan(&mediator, "Plano Ouro", "123456");

    let err = mediator
        .send(create_command(plan_id, "Maria Silva", "12345678900"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::InvalidCpfChecksum)));

    let mut future = create_command(plan_id, "Maria Silva", "52998224725");
    future.birth_date = Some(Utc::now().date_naive() + Duration::days(2));
    let err = mediator.send(future).unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::FutureBirthDate)));
}

#[test]
fn create_conflicts_on_live_cpf_only() {
    let mediator = mediator();
    let plan_id = create_plan(&mediator, "Plano Ouro", "123456");
    let first = enroll(&mediator, plan_id, "Maria Silva", "52998224725");

    let err = mediator
        .send(create_command(plan_id, "Maria Souza", "529.982.247-25"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    mediator
        .send(DeleteBeneficiaryCommand {
            beneficiary_id: first.id,
        })
        .unwrap();
    enroll(&mediator, plan_id, "Maria Souza", "529.982.247-25");
}

#[test]
fn update_changes_fields_and_moves_plan() {
    let mediator = mediator();
    let gold = create_plan(&mediator, "Plano Ouro", "123456");
    let silver = create_plan(&mediator, "Plano Prata", "654321");
    let view = enroll(&mediator, gold, "Maria Silva", "52998224725");

    let mut command = UpdateBeneficiaryCommand::for_beneficiary(view.id);
    command.new_full_name = Some("Maria Souza".to_string());
    command.new_cpf = Some("123.456.789-09".to_string());
    command.new_birth_date = NaiveDate::from_ymd_opt(1985, 12, 25);
    command.new_status = Some(Status::Inactive);
    command.new_health_plan_id = Some(silver);

    let updated = mediator.send(command).unwrap();
    assert_eq!(updated.full_name, "Maria Souza");
    assert_eq!(updated.cpf, "123.456.789-09");
    assert_eq!(updated.birth_date, "25/12/1985");
    assert_eq!(updated.status, Status::Inactive);
    assert_eq!(updated.health_plan_id, silver);

    let loaded = mediator
        .send(GetBeneficiaryByIdQuery { id: view.id })
        .unwrap();
    assert_eq!(loaded.health_plan_id, silver);
    assert!(loaded.modification_date.is_some());
}

#[test]
fn update_rejects_cpf_of_another_beneficiary_and_unknown_plan() {
    let mediator = mediator();
    let plan_id = create_plan(&mediator, "Plano Ouro", "123456");
    enroll(&mediator, plan_id, "Maria Silva", "52998224725");
    let other = enroll(&mediator, plan_id, "Joana Lima", "12345678909");

    let mut command = UpdateBeneficiaryCommand::for_beneficiary(other.id);
    command.new_cpf = Some("52998224725".to_string());
    assert!(matches!(mediator.send(command), Err(ServiceError::Conflict(_))));

    let mut command = UpdateBeneficiaryCommand::for_beneficiary(other.id);
    command.new_health_plan_id = Some(Uuid::new_v4());
    assert!(matches!(mediator.send(command), Err(ServiceError::NotFound(_))));

    let mut command = UpdateBeneficiaryCommand::for_beneficiary(other.id);
    command.new_cpf = Some("123.456.789-09".to_string());
    let unchanged = mediator.send(command).unwrap();
    assert_eq!(unchanged.cpf, "123.456.789-09");
}

#[test]
fn update_validates_new_name_format() {
    let mut command = UpdateBeneficiaryCommand::for_beneficiary(Uuid::new_v4());
    command.new_full_name = Some("Ma".to_string());
    let err = mediator().send(command).unwrap_err();

    let ServiceError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert!(errors.get("newFullName").is_some());
}

#[test]
fn delete_hides_beneficiary() {
    let mediator = mediator();
    let plan_id = create_plan(&mediator, "Plano Ouro", "123456");
    let view = enroll(&mediator, plan_id, "Maria Silva", "52998224725");

    mediator
        .send(DeleteBeneficiaryCommand {
            beneficiary_id: view.id,
        })
        .unwrap();

    assert!(matches!(
        mediator.send(GetBeneficiaryByIdQuery { id: view.id }),
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        mediator.send(DeleteBeneficiaryCommand {
            beneficiary_id: view.id
        }),
        Err(ServiceError::NotFound(_))
    ));
}

#[test]
fn list_pages_beneficiaries_of_one_plan() {
    let mediator = mediator();
    let gold = create_plan(&mediator, "Plano Ouro", "123456");
    let silver = create_plan(&mediator, "Plano Prata", "654321");
    let mut expected = vec![
        enroll(&mediator, gold, "Ana Souza", "52998224725").id,
        enroll(&mediator, gold, "Bruno Lima", "12345678909").id,
        enroll(&mediator, gold, "Carla Dias", "11144477735").id,
    ];
    enroll(&mediator, silver, "Diego Alves", "93541134780");
    expected.sort();

    let mut query = GetBeneficiariesQuery::for_plan(gold);
    query.page_size = 2;
    let first = mediator.send(query.clone()).unwrap();
    assert_eq!(first.count, 2);
    assert!(first.has_next_page);
    assert!(!first.has_previous_page);

    query.after_key = first.next_key;
    let second = mediator.send(query).unwrap();
    assert_eq!(second.count, 1);
    assert!(!second.has_next_page);
    assert!(second.has_previous_page);

    let seen: Vec<Uuid> = first
        .items
        .iter()
        .chain(second.items.iter())
        .map(|view| view.id)
        .collect();
    assert_eq!(seen, expected);
}

#[test]
fn list_filters_by_name_and_cpf() {
    let mediator = mediator();
    let plan_id = create_plan(&mediator, "Plano Ouro", "123456");
    enroll(&mediator, plan_id, "Ângela Souza", "52998224725");
    enroll(&mediator, plan_id, "Bruno Lima", "12345678909");

    let mut query = GetBeneficiariesQuery::for_plan(plan_id);
    query.filter = BeneficiaryFilter {
        full_name: Some("ÂNGELA".to_string()),
        cpf: None,
    };
    let page = mediator.send(query).unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.items[0].full_name, "Ângela Souza");

    let mut query = GetBeneficiariesQuery::for_plan(plan_id);
    query.filter = BeneficiaryFilter {
        full_name: None,
        cpf: Some("456.789".to_string()),
    };
    let page = mediator.send(query).unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.items[0].full_name, "Bruno Lima");
}

#[test]
fn list_for_missing_plan_is_not_found() {
    let err = mediator()
        .send(GetBeneficiariesQuery::for_plan(Uuid::new_v4()))
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
