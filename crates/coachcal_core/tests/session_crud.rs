use chrono::{NaiveDate, NaiveDateTime};
use coachcal_core::calendar::range::Period;
use coachcal_core::db::open_db_in_memory;
use coachcal_core::{
    Client, ClientRepository, RepoError, Session, SessionListQuery, SessionRepository,
    SessionStatus, SqliteClientRepository, SqliteSessionRepository, ValidationError,
};
use rusqlite::Connection;
use uuid::Uuid;

fn at(month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn seed_client(conn: &Connection, name: &str) -> Client {
    let repo = SqliteClientRepository::try_new(conn).unwrap();
    let client = Client::new(name, at(11, 1, 9, 0));
    repo.create_client(&client).unwrap();
    client
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let client = seed_client(&conn, "Sarah Chen");
    let repo = SqliteSessionRepository::try_new(&conn).unwrap();

    let mut session = Session::new(client.id, at(12, 11, 9, 30), 45, "Zoom");
    session.program_id = Some("leadership-90".to_string());
    let id = repo.create_session(&session).unwrap();

    let loaded = repo.get_session(id).unwrap().unwrap();
    assert_eq!(loaded, session);
    assert_eq!(loaded.status, SessionStatus::Scheduled);
}

#[test]
fn get_missing_session_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSessionRepository::try_new(&conn).unwrap();
    assert!(repo.get_session(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn update_persists_status_and_time() {
    let conn = open_db_in_memory().unwrap();
    let client = seed_client(&conn, "Sarah Chen");
    let repo = SqliteSessionRepository::try_new(&conn).unwrap();

    let mut session = Session::new(client.id, at(12, 11, 9, 30), 45, "Zoom");
    repo.create_session(&session).unwrap();

    session.complete();
    session.date_time = at(12, 12, 10, 0);
    repo.update_session(&session).unwrap();

    let loaded = repo.get_session(session.id).unwrap().unwrap();
    assert_eq!(loaded.status, SessionStatus::Completed);
    assert_eq!(loaded.date_time, at(12, 12, 10, 0));
}

#[test]
fn update_and_delete_missing_session_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let client = seed_client(&conn, "Sarah Chen");
    let repo = SqliteSessionRepository::try_new(&conn).unwrap();
    let session = Session::new(client.id, at(12, 11, 9, 30), 45, "Zoom");

    assert!(matches!(
        repo.update_session(&session),
        Err(RepoError::NotFound { entity: "session", id }) if id == session.id
    ));
    assert!(matches!(
        repo.delete_session(session.id),
        Err(RepoError::NotFound { entity: "session", .. })
    ));
}

#[test]
fn create_for_unknown_client_returns_client_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSessionRepository::try_new(&conn).unwrap();
    let orphan = Uuid::new_v4();
    let session = Session::new(orphan, at(12, 11, 9, 30), 45, "Zoom");

    assert!(matches!(
        repo.create_session(&session),
        Err(RepoError::NotFound { entity: "client", id }) if id == orphan
    ));
}

#[test]
fn invalid_sessions_are_rejected_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let client = seed_client(&conn, "Sarah Chen");
    let repo = SqliteSessionRepository::try_new(&conn).unwrap();

    let zero = Session::new(client.id, at(12, 11, 9, 30), 0, "Zoom");
    assert!(matches!(
        repo.create_session(&zero),
        Err(RepoError::Validation(ValidationError::ZeroDuration))
    ));

    let blank = Session::new(client.id, at(12, 11, 9, 30), 30, "  ");
    assert!(matches!(
        repo.create_session(&blank),
        Err(RepoError::Validation(ValidationError::BlankLocation))
    ));
}

#[test]
fn list_filters_by_inclusive_week_range_and_sorts_by_time() {
    let conn = open_db_in_memory().unwrap();
    let client = seed_client(&conn, "Sarah Chen");
    let repo = SqliteSessionRepository::try_new(&conn).unwrap();

    let late_saturday = Session::new(client.id, at(12, 14, 23, 0), 60, "Zoom");
    let next_sunday = Session::new(client.id, at(12, 15, 0, 0), 60, "Zoom");
    let sunday_start = Session::new(client.id, at(12, 8, 0, 0), 30, "Zoom");
    let wednesday = Session::new(client.id, at(12, 11, 9, 30), 45, "Zoom");
    for session in [&late_saturday, &next_sunday, &sunday_start, &wednesday] {
        repo.create_session(session).unwrap();
    }

    let week = Period::Week.bounds(at(12, 11, 12, 0));
    let listed = repo
        .list_sessions(&SessionListQuery::in_range(week))
        .unwrap();
    let times: Vec<NaiveDateTime> = listed.iter().map(|session| session.date_time).collect();
    assert_eq!(
        times,
        vec![at(12, 8, 0, 0), at(12, 11, 9, 30), at(12, 14, 23, 0)]
    );
}

#[test]
fn list_filters_by_client_status_and_limit() {
    let conn = open_db_in_memory().unwrap();
    let sarah = seed_client(&conn, "Sarah Chen");
    let michael = seed_client(&conn, "Michael Rodriguez");
    let repo = SqliteSessionRepository::try_new(&conn).unwrap();

    let mut cancelled = Session::new(sarah.id, at(12, 2, 9, 0), 60, "Zoom");
    cancelled.cancel();
    repo.create_session(&cancelled).unwrap();
    repo.create_session(&Session::new(sarah.id, at(12, 3, 9, 0), 60, "Zoom"))
        .unwrap();
    repo.create_session(&Session::new(sarah.id, at(12, 4, 9, 0), 60, "Zoom"))
        .unwrap();
    repo.create_session(&Session::new(michael.id, at(12, 1, 9, 0), 60, "Zoom"))
        .unwrap();

    let sarah_all = repo
        .list_sessions(&SessionListQuery::for_client(sarah.id))
        .unwrap();
    assert_eq!(sarah_all.len(), 3);

    let sarah_scheduled = repo
        .list_sessions(&SessionListQuery {
            client_id: Some(sarah.id),
            status: Some(SessionStatus::Scheduled),
            limit: Some(1),
            ..SessionListQuery::default()
        })
        .unwrap();
    assert_eq!(sarah_scheduled.len(), 1);
    assert_eq!(sarah_scheduled[0].date_time, at(12, 3, 9, 0));
}

#[test]
fn deleting_client_cascades_to_sessions() {
    let conn = open_db_in_memory().unwrap();
    let client = seed_client(&conn, "Sarah Chen");
    let sessions = SqliteSessionRepository::try_new(&conn).unwrap();
    let session = Session::new(client.id, at(12, 11, 9, 30), 45, "Zoom");
    sessions.create_session(&session).unwrap();

    SqliteClientRepository::try_new(&conn)
        .unwrap()
        .delete_client(client.id)
        .unwrap();

    assert!(sessions.get_session(session.id).unwrap().is_none());
}

#[test]
fn invalid_persisted_rows_are_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    let client = seed_client(&conn, "Sarah Chen");
    let repo = SqliteSessionRepository::try_new(&conn).unwrap();
    let session = Session::new(client.id, at(12, 11, 9, 30), 45, "Zoom");
    repo.create_session(&session).unwrap();

    conn.execute(
        "UPDATE sessions SET date_time = 'not-a-date' WHERE id = ?1;",
        [session.id.to_string()],
    )
    .unwrap();

    assert!(matches!(
        repo.get_session(session.id),
        Err(RepoError::InvalidData(_))
    ));
}

#[test]
fn repository_requires_migrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    assert!(matches!(
        SqliteSessionRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("sessions"))
    ));
}
