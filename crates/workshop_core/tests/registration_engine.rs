use chrono::DateTime;
use rusqlite::Connection;
use workshop_core::db::{open_db, open_db_in_memory};
use workshop_core::{
    Registration, RegistrationEngine, RegistrationError, RegistrationRepository,
    RegistrationStats, RegistrationStatus, RepoError, RepoResult, SqliteRegistrationRepository,
    SqliteWorkshopRepository, WorkshopDraft, WorkshopService, WorkshopUpdate,
};

fn create_workshop(conn: &Connection, capacity: i64) -> String {
    let service = WorkshopService::new(SqliteWorkshopRepository::new(conn));
    service
        .create_workshop(WorkshopDraft {
            title: "Rust 101".to_string(),
            description: "Ownership and borrowing".to_string(),
            scheduled_at: "2025-12-15T14:00:00".to_string(),
            capacity,
            organizer_id: "org1".to_string(),
            organizer_name: "Organizer".to_string(),
        })
        .unwrap()
        .id
}

fn set_capacity(conn: &Connection, workshop_id: &str, capacity: i64) {
    let service = WorkshopService::new(SqliteWorkshopRepository::new(conn));
    service
        .update_workshop(
            workshop_id,
            WorkshopUpdate {
                title: "Rust 101".to_string(),
                description: "Ownership and borrowing".to_string(),
                scheduled_at: "2025-12-15T14:00:00".to_string(),
                capacity,
            },
        )
        .unwrap();
}

fn email(name: &str) -> String {
    format!("{}@example.com", name.to_lowercase())
}

fn status_of(
    engine: &RegistrationEngine<SqliteRegistrationRepository<'_>>,
    workshop_id: &str,
    name: &str,
) -> Option<RegistrationStatus> {
    engine
        .check_registration(workshop_id, &email(name))
        .unwrap()
        .registration
        .map(|registration| registration.status)
}

#[test]
fn registrations_fill_capacity_then_waitlist() {
    let conn = open_db_in_memory().unwrap();
    let workshop_id = create_workshop(&conn, 3);
    let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));

    for name in ["A", "B", "C"] {
        let registration = engine.register(&workshop_id, name, &email(name)).unwrap();
        assert_eq!(registration.status, RegistrationStatus::Enrolled);
    }
    let fourth = engine.register(&workshop_id, "D", &email("D")).unwrap();
    assert_eq!(fourth.status, RegistrationStatus::Waitlist);

    assert_eq!(
        engine.stats(&workshop_id).unwrap(),
        RegistrationStats {
            enrolled: 3,
            waitlist: 1
        }
    );
}

#[test]
fn zero_capacity_waitlists_first_registration() {
    let conn = open_db_in_memory().unwrap();
    let workshop_id = create_workshop(&conn, 0);
    let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));

    let first = engine.register(&workshop_id, "A", &email("A")).unwrap();
    assert_eq!(first.status, RegistrationStatus::Waitlist);
}

#[test]
fn duplicate_registration_is_rejected_without_second_record() {
    let conn = open_db_in_memory().unwrap();
    let workshop_id = create_workshop(&conn, 5);
    let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));

    engine.register(&workshop_id, "A", &email("A")).unwrap();
    let err = engine
        .register(&workshop_id, "A again", &email("A"))
        .unwrap_err();
    assert!(matches!(
        err,
        RegistrationError::DuplicateRegistration { .. }
    ));
    assert_eq!(engine.list_registrations(&workshop_id).unwrap().len(), 1);
}

#[test]
fn same_email_may_register_for_different_workshops() {
    let conn = open_db_in_memory().unwrap();
    let first = create_workshop(&conn, 1);
    let second = create_workshop(&conn, 1);
    let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));

    engine.register(&first, "A", &email("A")).unwrap();
    let other = engine.register(&second, "A", &email("A")).unwrap();
    assert_eq!(other.status, RegistrationStatus::Enrolled);
}

#[test]
fn register_for_unknown_workshop_fails() {
    let conn = open_db_in_memory().unwrap();
    let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));

    let err = engine.register("nope", "A", &email("A")).unwrap_err();
    assert!(matches!(err, RegistrationError::WorkshopNotFound(id) if id == "nope"));
}

#[test]
fn register_validates_name_and_email() {
    let conn = open_db_in_memory().unwrap();
    let workshop_id = create_workshop(&conn, 1);
    let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));

    let missing_name = engine.register(&workshop_id, "  ", "a@example.com").unwrap_err();
    assert!(matches!(missing_name, RegistrationError::Validation(_)));

    let bad_email = engine.register(&workshop_id, "A", "not-an-email").unwrap_err();
    assert!(matches!(bad_email, RegistrationError::Validation(_)));
    assert!(engine.list_registrations(&workshop_id).unwrap().is_empty());
}

#[test]
fn capacity_two_scenario_promotes_in_order() {
    let conn = open_db_in_memory().unwrap();
    let workshop_id = create_workshop(&conn, 2);
    let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));

    for name in ["A", "B", "C", "D"] {
        engine.register(&workshop_id, name, &email(name)).unwrap();
    }
    assert_eq!(status_of(&engine, &workshop_id, "C"), Some(RegistrationStatus::Waitlist));
    assert_eq!(status_of(&engine, &workshop_id, "D"), Some(RegistrationStatus::Waitlist));

    let outcome = engine.cancel(&workshop_id, &email("A")).unwrap();
    assert!(outcome.promoted());
    let promoted = outcome.promoted.unwrap();
    assert_eq!(promoted.participant_email, email("C"));
    assert_eq!(promoted.status, RegistrationStatus::Enrolled);
    assert_eq!(status_of(&engine, &workshop_id, "C"), Some(RegistrationStatus::Enrolled));
    assert_eq!(status_of(&engine, &workshop_id, "D"), Some(RegistrationStatus::Waitlist));

    let outcome = engine.cancel(&workshop_id, &email("D")).unwrap();
    assert!(!outcome.promoted());
    assert_eq!(outcome.cancelled.status, RegistrationStatus::Waitlist);

    assert_eq!(status_of(&engine, &workshop_id, "A"), None);
    assert_eq!(status_of(&engine, &workshop_id, "B"), Some(RegistrationStatus::Enrolled));
    assert_eq!(status_of(&engine, &workshop_id, "C"), Some(RegistrationStatus::Enrolled));
    assert_eq!(
        engine.stats(&workshop_id).unwrap(),
        RegistrationStats {
            enrolled: 2,
            waitlist: 0
        }
    );
}

#[test]
fn promotion_picks_earliest_registered_at_not_latest_insert() {
    let conn = open_db_in_memory().unwrap();
    let workshop_id = create_workshop(&conn, 1);
    let repo = SqliteRegistrationRepository::new(&conn);
    let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));

    engine.register(&workshop_id, "A", &email("A")).unwrap();
    // Inserted later, but stamped earlier than "Late".
    repo.insert_registration(&waitlisted(&workshop_id, "late-row", "Late", 2_000))
        .unwrap();
    repo.insert_registration(&waitlisted(&workshop_id, "early-row", "Early", 1_000))
        .unwrap();

    let outcome = engine.cancel(&workshop_id, &email("A")).unwrap();
    let promoted = outcome.promoted.expect("one registration should be promoted");
    assert_eq!(promoted.id, "early-row");
    assert_eq!(
        promoted.registered_at,
        DateTime::from_timestamp_millis(1_000).unwrap(),
        "promotion must keep the original registration time"
    );
    assert_eq!(status_of(&engine, &workshop_id, "Late"), Some(RegistrationStatus::Waitlist));
}

#[test]
fn equal_timestamps_promote_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let workshop_id = create_workshop(&conn, 1);
    let repo = SqliteRegistrationRepository::new(&conn);
    let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));

    engine.register(&workshop_id, "A", &email("A")).unwrap();
    repo.insert_registration(&waitlisted(&workshop_id, "zz-first", "First", 5_000))
        .unwrap();
    repo.insert_registration(&waitlisted(&workshop_id, "aa-second", "Second", 5_000))
        .unwrap();

    let outcome = engine.cancel(&workshop_id, &email("A")).unwrap();
    assert_eq!(outcome.promoted.unwrap().id, "zz-first");
}

#[test]
fn cancelling_enrolled_without_waitlist_frees_a_seat() {
    let conn = open_db_in_memory().unwrap();
    let workshop_id = create_workshop(&conn, 2);
    let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));

    engine.register(&workshop_id, "A", &email("A")).unwrap();
    engine.register(&workshop_id, "B", &email("B")).unwrap();

    let outcome = engine.cancel(&workshop_id, &email("A")).unwrap();
    assert!(!outcome.promoted());
    assert_eq!(engine.stats(&workshop_id).unwrap().enrolled, 1);

    let next = engine.register(&workshop_id, "C", &email("C")).unwrap();
    assert_eq!(next.status, RegistrationStatus::Enrolled);
}

#[test]
fn cancelling_waitlisted_leaves_others_untouched() {
    let conn = open_db_in_memory().unwrap();
    let workshop_id = create_workshop(&conn, 1);
    let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));

    for name in ["A", "B", "C"] {
        engine.register(&workshop_id, name, &email(name)).unwrap();
    }
    let before: Vec<_> = engine
        .list_registrations(&workshop_id)
        .unwrap()
        .into_iter()
        .filter(|registration| registration.participant_email != email("B"))
        .collect();

    let outcome = engine.cancel(&workshop_id, &email("B")).unwrap();
    assert!(!outcome.promoted());
    assert_eq!(engine.list_registrations(&workshop_id).unwrap(), before);
}

#[test]
fn cancelling_missing_registration_fails_and_mutates_nothing() {
    let conn = open_db_in_memory().unwrap();
    let workshop_id = create_workshop(&conn, 1);
    let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));
    engine.register(&workshop_id, "A", &email("A")).unwrap();
    engine.register(&workshop_id, "B", &email("B")).unwrap();
    let before = engine.list_registrations(&workshop_id).unwrap();

    let err = engine.cancel(&workshop_id, &email("Z")).unwrap_err();
    assert!(matches!(
        err,
        RegistrationError::RegistrationNotFound { .. }
    ));
    assert_eq!(engine.list_registrations(&workshop_id).unwrap(), before);
}

#[test]
fn enrolled_count_never_exceeds_capacity_through_churn() {
    let conn = open_db_in_memory().unwrap();
    let workshop_id = create_workshop(&conn, 3);
    let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));

    for round in 0..10 {
        engine
            .register(&workshop_id, "P", &format!("p{round}@example.com"))
            .unwrap();
        if round % 3 == 2 {
            engine
                .cancel(&workshop_id, &format!("p{}@example.com", round - 1))
                .unwrap();
        }
        let stats = engine.stats(&workshop_id).unwrap();
        assert!(stats.enrolled <= 3, "round {round}: {stats:?}");
    }
}

#[test]
fn check_registration_reports_presence() {
    let conn = open_db_in_memory().unwrap();
    let workshop_id = create_workshop(&conn, 1);
    let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));

    assert!(!engine
        .check_registration(&workshop_id, &email("A"))
        .unwrap()
        .is_registered());
    let created = engine.register(&workshop_id, "A", &email("A")).unwrap();
    let check = engine.check_registration(&workshop_id, &email("A")).unwrap();
    assert!(check.is_registered());
    assert_eq!(check.registration, Some(created));
}

#[test]
fn promotion_failure_still_commits_cancellation() {
    let conn = open_db_in_memory().unwrap();
    let workshop_id = create_workshop(&conn, 1);
    {
        let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));
        engine.register(&workshop_id, "A", &email("A")).unwrap();
        engine.register(&workshop_id, "B", &email("B")).unwrap();
    }

    let engine = RegistrationEngine::new(FailingPromotionRepository {
        inner: SqliteRegistrationRepository::new(&conn),
    });
    let outcome = engine.cancel(&workshop_id, &email("A")).unwrap();
    assert!(!outcome.promoted());

    let reader = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));
    assert!(!reader
        .check_registration(&workshop_id, &email("A"))
        .unwrap()
        .is_registered());
    assert_eq!(status_of(&reader, &workshop_id, "B"), Some(RegistrationStatus::Waitlist));
}

fn waitlisted(workshop_id: &str, id: &str, name: &str, registered_ms: i64) -> Registration {
    Registration {
        id: id.to_string(),
        workshop_id: workshop_id.to_string(),
        participant_name: name.to_string(),
        participant_email: email(name),
        status: RegistrationStatus::Waitlist,
        registered_at: DateTime::from_timestamp_millis(registered_ms).unwrap(),
    }
}

#[test]
fn cancel_after_capacity_decrease_does_not_promote_past_capacity() {
    let conn = open_db_in_memory().unwrap();
    let workshop_id = create_workshop(&conn, 3);
    let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));
    for name in ["A", "B", "C", "D"] {
        engine.register(&workshop_id, name, &email(name)).unwrap();
    }
    set_capacity(&conn, &workshop_id, 1);

    let outcome = engine.cancel(&workshop_id, &email("A")).unwrap();
    assert!(!outcome.promoted());
    assert_eq!(status_of(&engine, &workshop_id, "D"), Some(RegistrationStatus::Waitlist));

    let outcome = engine.cancel(&workshop_id, &email("B")).unwrap();
    assert!(!outcome.promoted());
    assert_eq!(
        engine.stats(&workshop_id).unwrap(),
        RegistrationStats {
            enrolled: 1,
            waitlist: 1
        }
    );

    let outcome = engine.cancel(&workshop_id, &email("C")).unwrap();
    assert_eq!(
        outcome.promoted.map(|registration| registration.participant_email),
        Some(email("D"))
    );
    assert_eq!(
        engine.stats(&workshop_id).unwrap(),
        RegistrationStats {
            enrolled: 1,
            waitlist: 0
        }
    );
}

#[test]
fn capacity_increase_leaves_waitlist_in_place() {
    let conn = open_db_in_memory().unwrap();
    let workshop_id = create_workshop(&conn, 1);
    let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));
    engine.register(&workshop_id, "A", &email("A")).unwrap();
    engine.register(&workshop_id, "B", &email("B")).unwrap();

    set_capacity(&conn, &workshop_id, 2);
    assert_eq!(status_of(&engine, &workshop_id, "B"), Some(RegistrationStatus::Waitlist));

    let late = engine.register(&workshop_id, "C", &email("C")).unwrap();
    assert_eq!(late.status, RegistrationStatus::Enrolled);
    assert_eq!(status_of(&engine, &workshop_id, "B"), Some(RegistrationStatus::Waitlist));
}

#[test]
fn concurrent_registrations_on_separate_connections_respect_capacity() {
    const CAPACITY: u32 = 5;
    const THREADS: usize = 8;
    const PER_THREAD: usize = 5;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workshop.db");
    let workshop_id = create_workshop(&open_db(&path).unwrap(), i64::from(CAPACITY));

    std::thread::scope(|scope| {
        for thread in 0..THREADS {
            let path = &path;
            let workshop_id = &workshop_id;
            scope.spawn(move || {
                let conn = open_db(path).unwrap();
                let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));
                for n in 0..PER_THREAD {
                    let name = format!("t{thread}n{n}");
                    engine.register(workshop_id, &name, &email(&name)).unwrap();
                }
            });
        }
    });

    let conn = open_db(&path).unwrap();
    let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(&conn));
    let total = u32::try_from(THREADS * PER_THREAD).unwrap();
    assert_eq!(
        engine.stats(&workshop_id).unwrap(),
        RegistrationStats {
            enrolled: CAPACITY,
            waitlist: total - CAPACITY
        }
    );
}

/// Delegates to SQLite but fails the status update of a promotion.
struct FailingPromotionRepository<'conn> {
    inner: SqliteRegistrationRepository<'conn>,
}

impl RegistrationRepository for FailingPromotionRepository<'_> {
    fn in_write_tx<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>,
    {
        self.inner.in_write_tx(|_| f(self))
    }

    fn in_savepoint<T, E, F>(&self, name: &'static str, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>,
    {
        self.inner.in_savepoint(name, |_| f(self))
    }

    fn workshop_capacity(&self, workshop_id: &str) -> RepoResult<Option<u32>> {
        self.inner.workshop_capacity(workshop_id)
    }

    fn find_registration(
        &self,
        workshop_id: &str,
        email: &str,
    ) -> RepoResult<Option<Registration>> {
        self.inner.find_registration(workshop_id, email)
    }

    fn list_registrations(&self, workshop_id: &str) -> RepoResult<Vec<Registration>> {
        self.inner.list_registrations(workshop_id)
    }

    fn registration_stats(&self, workshop_id: &str) -> RepoResult<RegistrationStats> {
        self.inner.registration_stats(workshop_id)
    }

    fn insert_registration(&self, registration: &Registration) -> RepoResult<()> {
        self.inner.insert_registration(registration)
    }

    fn delete_registration(&self, registration_id: &str) -> RepoResult<()> {
        self.inner.delete_registration(registration_id)
    }

    fn oldest_waitlisted(&self, workshop_id: &str) -> RepoResult<Option<Registration>> {
        self.inner.oldest_waitlisted(workshop_id)
    }

    fn set_status(&self, _registration_id: &str, _status: RegistrationStatus) -> RepoResult<()> {
        Err(RepoError::InvalidData("simulated promotion failure".to_string()))
    }
}
