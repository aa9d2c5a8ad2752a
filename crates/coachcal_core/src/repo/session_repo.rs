//! Session repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `sessions` storage.
//! - Push client/status/date-range filtering into SQL.
//!
//! # Invariants
//! - Write paths call `Session::validate()` before SQL mutations.
//! - Lists are ordered by `date_time ASC, id ASC`.
//! - Range filters are inclusive on both ends.

use super::{ensure_tables, parse_uuid, RepoError, RepoResult};
use crate::calendar::range::DateRange;
use crate::db::{instant_to_db, parse_db_instant};
use crate::model::client::ClientId;
use crate::model::session::{Session, SessionId, SessionStatus};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const SESSION_SELECT_SQL: &str = "SELECT
    id,
    client_id,
    program_id,
    date_time,
    duration_minutes,
    status,
    location
FROM sessions";

/// Query options for listing sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionListQuery {
    pub client_id: Option<ClientId>,
    pub status: Option<SessionStatus>,
    /// Inclusive start-instant window.
    pub range: Option<DateRange>,
    pub limit: Option<u32>,
}

impl SessionListQuery {
    pub fn for_client(client_id: ClientId) -> Self {
        Self {
            client_id: Some(client_id),
            ..Self::default()
        }
    }

    pub fn in_range(range: DateRange) -> Self {
        Self {
            range: Some(range),
            ..Self::default()
        }
    }
}

/// Repository interface for session CRUD operations.
pub trait SessionRepository {
    fn create_session(&self, session: &Session) -> RepoResult<SessionId>;
    fn update_session(&self, session: &Session) -> RepoResult<()>;
    fn get_session(&self, id: SessionId) -> RepoResult<Option<Session>>;
    fn list_sessions(&self, query: &SessionListQuery) -> RepoResult<Vec<Session>>;
    fn delete_session(&self, id: SessionId) -> RepoResult<()>;
}

/// SQLite-backed session repository.
pub struct SqliteSessionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSessionRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when migrations have not been applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["sessions"])?;
        Ok(Self { conn })
    }
}

impl SessionRepository for SqliteSessionRepository<'_> {
    fn create_session(&self, session: &Session) -> RepoResult<SessionId> {
        session.validate()?;

        self.conn.execute(
            "INSERT INTO sessions (
                id,
                client_id,
                program_id,
                date_time,
                duration_minutes,
                status,
                location
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                session.id.to_string(),
                session.client_id.to_string(),
                session.program_id.as_deref(),
                instant_to_db(session.date_time),
                session.duration_minutes,
                session.status.as_str(),
                session.location.as_str(),
            ],
        )
        .map_err(|err| map_client_fk(err, session))?;

        Ok(session.id)
    }

    fn update_session(&self, session: &Session) -> RepoResult<()> {
        session.validate()?;

        let changed = self.conn.execute(
            "UPDATE sessions
             SET
                client_id = ?1,
                program_id = ?2,
                date_time = ?3,
                duration_minutes = ?4,
                status = ?5,
                location = ?6
             WHERE id = ?7;",
            params![
                session.client_id.to_string(),
                session.program_id.as_deref(),
                instant_to_db(session.date_time),
                session.duration_minutes,
                session.status.as_str(),
                session.location.as_str(),
                session.id.to_string(),
            ],
        )
        .map_err(|err| map_client_fk(err, session))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "session",
                id: session.id,
            });
        }

        Ok(())
    }

    fn get_session(&self, id: SessionId) -> RepoResult<Option<Session>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SESSION_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_session_row(row)?));
        }

        Ok(None)
    }

    fn list_sessions(&self, query: &SessionListQuery) -> RepoResult<Vec<Session>> {
        let mut sql = format!("{SESSION_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(client_id) = query.client_id {
            sql.push_str(" AND client_id = ?");
            bind_values.push(Value::Text(client_id.to_string()));
        }

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }

        if let Some(range) = query.range {
            sql.push_str(" AND date_time >= ? AND date_time <= ?");
            bind_values.push(Value::Text(instant_to_db(range.start)));
            bind_values.push(Value::Text(instant_to_db(range.end)));
        }

        sql.push_str(" ORDER BY date_time ASC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut sessions = Vec::new();

        while let Some(row) = rows.next()? {
            sessions.push(parse_session_row(row)?);
        }

        Ok(sessions)
    }

    fn delete_session(&self, id: SessionId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM sessions WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "session",
                id,
            });
        }

        Ok(())
    }
}

/// Foreign-key failures on `client_id` surface as a missing client.
fn map_client_fk(err: rusqlite::Error, session: &Session) -> RepoError {
    match err {
        rusqlite::Error::SqliteFailure(code, _)
            if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            RepoError::NotFound {
                entity: "client",
                id: session.client_id,
            }
        }
        other => other.into(),
    }
}

fn parse_session_row(row: &Row<'_>) -> RepoResult<Session> {
    let id_text: String = row.get("id")?;
    let client_text: String = row.get("client_id")?;

    let date_text: String = row.get("date_time")?;
    let date_time = parse_db_instant(&date_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid instant `{date_text}` in sessions.date_time"
        ))
    })?;

    let raw_duration: i64 = row.get("duration_minutes")?;
    let duration_minutes = u32::try_from(raw_duration).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid duration `{raw_duration}` in sessions.duration_minutes"
        ))
    })?;

    let status_text: String = row.get("status")?;
    let status = SessionStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid session status `{status_text}` in sessions.status"
        ))
    })?;

    let session = Session {
        id: parse_uuid(&id_text, "sessions.id")?,
        client_id: parse_uuid(&client_text, "sessions.client_id")?,
        program_id: row.get("program_id")?,
        date_time,
        duration_minutes,
        status,
        location: row.get("location")?,
    };
    session.validate()?;
    Ok(session)
}
