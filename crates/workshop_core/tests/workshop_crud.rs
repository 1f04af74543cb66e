use workshop_core::db::open_db_in_memory;
use workshop_core::{
    RegistrationEngine, SqliteRegistrationRepository, SqliteWorkshopRepository, ValidationError,
    WorkshopDraft, WorkshopService, WorkshopServiceError, WorkshopUpdate,
};

fn draft(title: &str, scheduled_at: &str, capacity: i64) -> WorkshopDraft {
    WorkshopDraft {
        title: title.to_string(),
        description: "desc".to_string(),
        scheduled_at: scheduled_at.to_string(),
        capacity,
        organizer_id: "org1".to_string(),
        organizer_name: "Organizer".to_string(),
    }
}

#[test]
fn create_and_get_reports_zero_counts() {
    let conn = open_db_in_memory().unwrap();
    let service = WorkshopService::new(SqliteWorkshopRepository::new(&conn));

    let created = service
        .create_workshop(draft("Rust", "2025-12-15T14:00:00", 10))
        .unwrap();
    let loaded = service.get_workshop(&created.id).unwrap();
    assert_eq!(loaded.workshop, created);
    assert_eq!(loaded.enrolled, 0);
    assert_eq!(loaded.waitlist, 0);
    assert_eq!(loaded.seats_left(), 10);
}

#[test]
fn create_rejects_invalid_input() {
    let conn = open_db_in_memory().unwrap();
    let service = WorkshopService::new(SqliteWorkshopRepository::new(&conn));

    let err = service
        .create_workshop(draft("", "2025-12-15T14:00:00", 10))
        .unwrap_err();
    assert!(matches!(
        err,
        WorkshopServiceError::Validation(ValidationError::MissingField("title"))
    ));

    let err = service
        .create_workshop(draft("Rust", "2025-12-15T14:00:00", -1))
        .unwrap_err();
    assert!(matches!(
        err,
        WorkshopServiceError::Validation(ValidationError::InvalidCapacity(-1))
    ));
}

#[test]
fn list_is_ordered_by_schedule_and_carries_counts() {
    let conn = open_db_in_memory().unwrap();
    let service = WorkshopService::new(SqliteWorkshopRepository::new(&conn));
    let later = service
        .create_workshop(draft("Later", "2025-12-20T10:00:00", 1))
        .unwrap();
    let sooner = service
        .create_workshop(draft("Sooner", "2025-12-01T10:00:00", 1))
        .unwrap();

    let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));
    engine.register(&later.id, "A", "a@example.com").unwrap();
    engine.register(&later.id, "B", "b@example.com").unwrap();

    let listed = service.list_workshops().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].workshop.id, sooner.id);
    assert_eq!(listed[1].workshop.id, later.id);
    assert_eq!((listed[1].enrolled, listed[1].waitlist), (1, 1));
}

#[test]
fn update_replaces_fields_without_demoting() {
    let conn = open_db_in_memory().unwrap();
    let service = WorkshopService::new(SqliteWorkshopRepository::new(&conn));
    let created = service
        .create_workshop(draft("Rust", "2025-12-15T14:00:00", 2))
        .unwrap();
    let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));
    engine.register(&created.id, "A", "a@example.com").unwrap();
    engine.register(&created.id, "B", "b@example.com").unwrap();

    let updated = service
        .update_workshop(
            &created.id,
            WorkshopUpdate {
                title: "Rust, again".to_string(),
                description: "new".to_string(),
                scheduled_at: "2026-01-10T09:30".to_string(),
                capacity: 1,
            },
        )
        .unwrap();
    assert_eq!(updated.workshop.title, "Rust, again");
    assert_eq!(updated.workshop.capacity, 1);
    assert_eq!(updated.enrolled, 2);
    assert_eq!(updated.seats_left(), 0);
}

#[test]
fn update_unknown_workshop_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = WorkshopService::new(SqliteWorkshopRepository::new(&conn));
    let err = service
        .update_workshop(
            "missing",
            WorkshopUpdate {
                title: "T".to_string(),
                description: "D".to_string(),
                scheduled_at: "2026-01-10T09:30:00".to_string(),
                capacity: 3,
            },
        )
        .unwrap_err();
    assert!(matches!(err, WorkshopServiceError::WorkshopNotFound(id) if id == "missing"));
}

#[test]
fn delete_cascades_registrations() {
    let conn = open_db_in_memory().unwrap();
    let service = WorkshopService::new(SqliteWorkshopRepository::new(&conn));
    let created = service
        .create_workshop(draft("Rust", "2025-12-15T14:00:00", 1))
        .unwrap();
    let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));
    engine.register(&created.id, "A", "a@example.com").unwrap();
    engine.register(&created.id, "B", "b@example.com").unwrap();

    service.delete_workshop(&created.id).unwrap();

    assert!(matches!(
        service.get_workshop(&created.id),
        Err(WorkshopServiceError::WorkshopNotFound(_))
    ));
    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM registrations;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);

    assert!(matches!(
        service.delete_workshop(&created.id),
        Err(WorkshopServiceError::WorkshopNotFound(_))
    ));
}
