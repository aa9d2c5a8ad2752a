use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use coachcal_core::db::open_db_in_memory;
use coachcal_core::service::session_service::filter_by_status;
use coachcal_core::{
    Client, ClientId, ClientRepository, DateRangeFilter, FixedClock, ScheduleSessionRequest,
    Session, SessionRepository, SessionService, SessionServiceError, SessionStatus,
    SqliteClientRepository, SqliteSessionRepository, ValidationError,
};
use rusqlite::Connection;
use uuid::Uuid;

/// Wednesday noon.
fn now() -> NaiveDateTime {
    at(12, 11, 12, 0)
}

fn at(month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn seed_client(conn: &Connection, name: &str) -> ClientId {
    let repo = SqliteClientRepository::try_new(conn).unwrap();
    repo.create_client(&Client::new(name, at(11, 1, 9, 0)))
        .unwrap()
}

fn seed_session(
    conn: &Connection,
    client_id: ClientId,
    date_time: NaiveDateTime,
    status: SessionStatus,
) -> Session {
    let repo = SqliteSessionRepository::try_new(conn).unwrap();
    let mut session = Session::new(client_id, date_time, 60, "Zoom");
    session.status = status;
    repo.create_session(&session).unwrap();
    session
}

fn service(conn: &Connection) -> SessionService<SqliteSessionRepository<'_>, FixedClock> {
    SessionService::new(
        SqliteSessionRepository::try_new(conn).unwrap(),
        FixedClock(now()),
    )
}

fn request(client_id: ClientId) -> ScheduleSessionRequest {
    ScheduleSessionRequest {
        client_id,
        program_id: Some("  ".to_string()),
        date: NaiveDate::from_ymd_opt(2024, 12, 13).unwrap(),
        time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        duration_minutes: 90,
        location: " In-person ".to_string(),
    }
}

#[test]
fn schedule_session_combines_date_and_time() {
    let conn = open_db_in_memory().unwrap();
    let client_id = seed_client(&conn, "Sarah Chen");
    let service = service(&conn);

    let scheduled = service.schedule_session(&request(client_id)).unwrap();
    assert_eq!(scheduled.date_time, at(12, 13, 14, 0));
    assert_eq!(scheduled.status, SessionStatus::Scheduled);
    assert_eq!(scheduled.location, "In-person");
    assert_eq!(scheduled.program_id, None);
    assert_eq!(service.get_session(scheduled.id).unwrap(), scheduled);
}

#[test]
fn schedule_session_maps_validation_and_missing_client() {
    let conn = open_db_in_memory().unwrap();
    let client_id = seed_client(&conn, "Sarah Chen");
    let service = service(&conn);

    let mut zero = request(client_id);
    zero.duration_minutes = 0;
    assert!(matches!(
        service.schedule_session(&zero),
        Err(SessionServiceError::InvalidRequest(ValidationError::ZeroDuration))
    ));

    let orphan = Uuid::new_v4();
    assert!(matches!(
        service.schedule_session(&request(orphan)),
        Err(SessionServiceError::ClientNotFound(id)) if id == orphan
    ));
}

#[test]
fn set_status_and_reschedule_persist() {
    let conn = open_db_in_memory().unwrap();
    let client_id = seed_client(&conn, "Sarah Chen");
    let service = service(&conn);
    let scheduled = service.schedule_session(&request(client_id)).unwrap();

    let completed = service
        .set_status(scheduled.id, SessionStatus::Completed)
        .unwrap();
    assert_eq!(completed.status, SessionStatus::Completed);

    let moved = service
        .reschedule(scheduled.id, at(12, 20, 8, 15), Some(30))
        .unwrap();
    assert_eq!(moved.date_time, at(12, 20, 8, 15));
    assert_eq!(moved.duration_minutes, 30);
    assert_eq!(moved.status, SessionStatus::Completed);

    let missing = Uuid::new_v4();
    assert!(matches!(
        service.set_status(missing, SessionStatus::Cancelled),
        Err(SessionServiceError::SessionNotFound(id)) if id == missing
    ));

    service.delete_session(scheduled.id).unwrap();
    assert!(matches!(
        service.delete_session(scheduled.id),
        Err(SessionServiceError::SessionNotFound(_))
    ));
}

#[test]
fn upcoming_and_past_split_on_now() {
    let conn = open_db_in_memory().unwrap();
    let sarah = seed_client(&conn, "Sarah Chen");
    let michael = seed_client(&conn, "Michael Rodriguez");

    let later = seed_session(&conn, sarah, at(12, 18, 14, 0), SessionStatus::Scheduled);
    let soon = seed_session(&conn, sarah, at(12, 11, 14, 0), SessionStatus::Scheduled);
    seed_session(&conn, sarah, at(12, 12, 9, 0), SessionStatus::Cancelled);
    let exactly_now = seed_session(&conn, michael, now(), SessionStatus::Scheduled);
    let last_week = seed_session(&conn, sarah, at(12, 4, 14, 0), SessionStatus::Completed);
    let this_morning = seed_session(&conn, sarah, at(12, 11, 10, 0), SessionStatus::Scheduled);

    let service = service(&conn);

    let upcoming: Vec<_> = service
        .upcoming_sessions(None)
        .unwrap()
        .into_iter()
        .map(|session| session.id)
        .collect();
    assert_eq!(upcoming, vec![exactly_now.id, soon.id, later.id]);

    let past: Vec<_> = service
        .past_sessions(Some(sarah))
        .unwrap()
        .into_iter()
        .map(|session| session.id)
        .collect();
    assert_eq!(past, vec![this_morning.id, last_week.id]);

    assert_eq!(
        service.next_session_for_client(sarah).unwrap().map(|s| s.id),
        Some(soon.id)
    );
    assert_eq!(
        service.last_session_for_client(sarah).unwrap().map(|s| s.id),
        Some(this_morning.id)
    );
    assert_eq!(service.last_session_for_client(michael).unwrap(), None);
}

#[test]
fn today_week_and_month_use_calendar_boundaries() {
    let conn = open_db_in_memory().unwrap();
    let client = seed_client(&conn, "Sarah Chen");
    seed_session(&conn, client, at(12, 11, 7, 0), SessionStatus::Completed);
    seed_session(&conn, client, at(12, 11, 23, 0), SessionStatus::Scheduled);
    seed_session(&conn, client, at(12, 8, 0, 0), SessionStatus::Completed);
    seed_session(&conn, client, at(12, 14, 23, 0), SessionStatus::Scheduled);
    seed_session(&conn, client, at(12, 15, 0, 0), SessionStatus::Scheduled);
    seed_session(&conn, client, at(11, 30, 18, 0), SessionStatus::Completed);

    let service = service(&conn);
    assert_eq!(service.today_sessions().unwrap().len(), 2);
    assert_eq!(service.this_week_sessions().unwrap().len(), 4);
    assert_eq!(service.this_month_sessions().unwrap().len(), 5);
}

#[test]
fn rolling_filters_and_status_filter_compose() {
    let conn = open_db_in_memory().unwrap();
    let client = seed_client(&conn, "Sarah Chen");
    seed_session(&conn, client, at(12, 11, 8, 0), SessionStatus::Completed);
    seed_session(&conn, client, at(12, 17, 23, 0), SessionStatus::Scheduled);
    seed_session(&conn, client, at(12, 18, 0, 0), SessionStatus::Scheduled);
    seed_session(&conn, client, at(12, 10, 9, 0), SessionStatus::Completed);

    let service = service(&conn);
    let all = service.list_sessions(&Default::default()).unwrap();

    let week = service.filter_by_date_range(&all, DateRangeFilter::Week);
    assert_eq!(week.len(), 2);
    assert_eq!(filter_by_status(&week, Some(SessionStatus::Scheduled)).len(), 1);
    assert_eq!(
        service
            .filter_by_date_range(&all, DateRangeFilter::All)
            .len(),
        4
    );
}
