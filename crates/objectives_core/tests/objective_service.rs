use chrono::NaiveDate;
use objectives_core::db::open_db_in_memory;
use objectives_core::{
    NewObjective, Objective, ObjectiveService, RecurrenceRule, ServiceError,
    SqliteObjectiveRepository, TenantKey, ValidationError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn tenant(key: &str) -> TenantKey {
    TenantKey::new(key).unwrap()
}

fn request(name: &str, recurrence: RecurrenceRule) -> NewObjective {
    NewObjective {
        name: name.to_string(),
        description: String::new(),
        recurrence,
    }
}

#[test]
fn create_assigns_id_and_persists() {
    let conn = open_db_in_memory().unwrap();
    let service = ObjectiveService::new(SqliteObjectiveRepository::try_new(&conn).unwrap());
    let owner = tenant("user-a");

    let created = service
        .create_objective(&owner, request("Drink water", RecurrenceRule::weekly([2, 4, 6]).unwrap()))
        .unwrap();

    assert!(!created.id().is_nil());
    assert_eq!(created.tenant_key(), &owner);
    assert_eq!(service.get_objective(&owner, created.id()).unwrap(), created);
    assert_eq!(service.list_objectives(&owner).unwrap(), vec![created]);
}

#[test]
fn create_with_empty_name_fails_validation() {
    let conn = open_db_in_memory().unwrap();
    let service = ObjectiveService::new(SqliteObjectiveRepository::try_new(&conn).unwrap());
    let owner = tenant("user-a");

    let err = service
        .create_objective(&owner, request("", RecurrenceRule::always()))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ValidationError::EmptyName)));
    assert!(service.list_objectives(&owner).unwrap().is_empty());
}

#[test]
fn complete_then_incomplete_keeps_single_entry() {
    let conn = open_db_in_memory().unwrap();
    let service = ObjectiveService::new(SqliteObjectiveRepository::try_new(&conn).unwrap());
    let owner = tenant("user-a");
    let monday = date(2024, 1, 1);

    let created = service
        .create_objective(&owner, request("Drink water", RecurrenceRule::weekly([2, 4, 6]).unwrap()))
        .unwrap();

    let completed = service.mark_completed(&owner, created.id(), monday).unwrap();
    assert!(completed.is_completed_on(monday));
    let completed_again = service.mark_completed(&owner, created.id(), monday).unwrap();
    assert_eq!(completed_again, completed);

    let reverted = service.mark_incomplete(&owner, created.id(), monday).unwrap();
    assert!(!reverted.is_completed_on(monday));
    assert_eq!(reverted.completion_len(), 1);

    let stored = service.get_objective(&owner, created.id()).unwrap();
    assert_eq!(stored.completion_log().get(monday), Some(false));
}

#[test]
fn mark_incomplete_without_prior_entry_records_explicit_false() {
    let conn = open_db_in_memory().unwrap();
    let service = ObjectiveService::new(SqliteObjectiveRepository::try_new(&conn).unwrap());
    let owner = tenant("user-a");
    let day = date(2024, 3, 9);

    let created = service
        .create_objective(&owner, request("Run", RecurrenceRule::always()))
        .unwrap();
    let updated = service.mark_incomplete(&owner, created.id(), day).unwrap();
    assert_eq!(updated.completion_log().get(day), Some(false));
}

#[test]
fn completion_on_missing_objective_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = ObjectiveService::new(SqliteObjectiveRepository::try_new(&conn).unwrap());
    let owner = tenant("user-a");
    let stray = Objective::create("stray", "", RecurrenceRule::always(), owner.clone()).unwrap();

    let err = service
        .mark_completed(&owner, stray.id(), date(2024, 1, 1))
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(id) if id == stray.id()));
}

#[test]
fn update_replaces_whole_record() {
    let conn = open_db_in_memory().unwrap();
    let service = ObjectiveService::new(SqliteObjectiveRepository::try_new(&conn).unwrap());
    let owner = tenant("user-a");

    let created = service
        .create_objective(&owner, request("Read", RecurrenceRule::always()))
        .unwrap();

    let mut payload = created.clone();
    payload.name = "Read 20 pages".to_string();
    payload.recurrence = RecurrenceRule::monthly([1, 15]).unwrap();
    payload.set_completion(date(2024, 1, 15), true);

    let updated = service
        .update_objective(&owner, created.id(), payload.clone())
        .unwrap();
    assert_eq!(updated, payload);
    assert_eq!(service.get_objective(&owner, created.id()).unwrap(), payload);
}

#[test]
fn update_with_mismatched_id_leaves_stored_record_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let service = ObjectiveService::new(SqliteObjectiveRepository::try_new(&conn).unwrap());
    let owner = tenant("user-a");

    let target = service
        .create_objective(&owner, request("Target", RecurrenceRule::always()))
        .unwrap();
    let other = Objective::create("Other", "", RecurrenceRule::always(), owner.clone()).unwrap();

    let err = service
        .update_objective(&owner, target.id(), other.clone())
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::IdentityMismatch { target: t, payload: p } if t == target.id() && p == other.id()
    ));
    assert_eq!(service.get_objective(&owner, target.id()).unwrap(), target);
}

#[test]
fn update_with_blank_name_fails_before_lookup() {
    let conn = open_db_in_memory().unwrap();
    let service = ObjectiveService::new(SqliteObjectiveRepository::try_new(&conn).unwrap());
    let owner = tenant("user-a");

    let mut payload = Objective::create("Ghost", "", RecurrenceRule::always(), owner.clone()).unwrap();
    payload.name = String::new();

    let err = service
        .update_objective(&owner, payload.id(), payload.clone())
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ValidationError::EmptyName)));
}

#[test]
fn update_missing_objective_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = ObjectiveService::new(SqliteObjectiveRepository::try_new(&conn).unwrap());
    let owner = tenant("user-a");
    let payload = Objective::create("Ghost", "", RecurrenceRule::always(), owner.clone()).unwrap();

    let err = service
        .update_objective(&owner, payload.id(), payload.clone())
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test]
fn delete_is_scoped_to_tenant() {
    let conn = open_db_in_memory().unwrap();
    let service = ObjectiveService::new(SqliteObjectiveRepository::try_new(&conn).unwrap());
    let alice = tenant("alice");
    let bob = tenant("bob");

    let created = service
        .create_objective(&alice, request("Private", RecurrenceRule::always()))
        .unwrap();

    assert!(matches!(
        service.delete_objective(&bob, created.id()),
        Err(ServiceError::NotFound(_))
    ));
    service.delete_objective(&alice, created.id()).unwrap();
    assert!(matches!(
        service.get_objective(&alice, created.id()),
        Err(ServiceError::NotFound(_))
    ));
}

#[test]
fn due_listings_agree_between_storage_and_memory() {
    let conn = open_db_in_memory().unwrap();
    let service = ObjectiveService::new(SqliteObjectiveRepository::try_new(&conn).unwrap());
    let owner = tenant("user-a");

    service
        .create_objective(&owner, request("Daily", RecurrenceRule::always()))
        .unwrap();
    service
        .create_objective(&owner, request("Weekdays", RecurrenceRule::weekly(2..=6).unwrap()))
        .unwrap();
    service
        .create_objective(&owner, request("Payday", RecurrenceRule::monthly([1, 15]).unwrap()))
        .unwrap();

    // 2024-01-01 is a Monday and the first of the month.
    let monday = date(2024, 1, 1);
    let due_memory = service.list_due_today(&owner, monday).unwrap();
    let due_storage = service.list_due_on(&owner, monday).unwrap();
    assert_eq!(due_memory.len(), 3);
    assert_eq!(due_memory, due_storage);

    // 2024-01-06 is a Saturday.
    let saturday = date(2024, 1, 6);
    let names: Vec<String> = service
        .list_due_on(&owner, saturday)
        .unwrap()
        .into_iter()
        .map(|objective| objective.name)
        .collect();
    assert_eq!(names, vec!["Daily".to_string()]);
    assert_eq!(service.list_due_today(&owner, saturday).unwrap().len(), 1);
}
