//! Session use-case service.
//!
//! # Responsibility
//! - Schedule, reschedule, complete/cancel and delete sessions.
//! - Answer "upcoming", "past", "today" style questions against an
//!   injected clock.
//!
//! # Invariants
//! - Newly scheduled sessions always start as `Scheduled`.
//! - Relative queries never read the system clock directly.
//! - Returned lists are sorted explicitly; callers never rely on storage order.

use crate::calendar::range::{
    end_of_day, is_past, is_this_week, month_end, month_start, start_of_day, DateRange,
};
use crate::clock::Clock;
use crate::model::client::ClientId;
use crate::model::session::{Session, SessionId, SessionStatus};
use crate::model::ValidationError;
use crate::repo::session_repo::{SessionListQuery, SessionRepository};
use crate::repo::RepoError;
use chrono::{Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for session use-cases.
#[derive(Debug)]
pub enum SessionServiceError {
    /// Request fields fail model validation.
    InvalidRequest(ValidationError),
    /// Target session does not exist.
    SessionNotFound(SessionId),
    /// Referenced client does not exist.
    ClientNotFound(ClientId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for SessionServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest(err) => write!(f, "invalid session request: {err}"),
            Self::SessionNotFound(id) => write!(f, "session not found: {id}"),
            Self::ClientNotFound(id) => write!(f, "client not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRequest(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for SessionServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::InvalidRequest(err),
            RepoError::NotFound {
                entity: "client",
                id,
            } => Self::ClientNotFound(id),
            RepoError::NotFound { id, .. } => Self::SessionNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type SessionServiceResult<T> = Result<T, SessionServiceError>;

/// Request model for scheduling a session from a date + time form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSessionRequest {
    pub client_id: ClientId,
    pub program_id: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: u32,
    pub location: String,
}

/// Rolling windows used by session list filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangeFilter {
    All,
    /// `[today 00:00, tomorrow 00:00)`.
    Today,
    /// `[today 00:00, today + 7 days)`.
    Week,
    /// `[today 00:00, today + 1 month)`.
    Month,
}

impl DateRangeFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            "today" => Some(Self::Today),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }
}

/// Session service facade over repository implementations.
pub struct SessionService<R: SessionRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: SessionRepository, C: Clock> SessionService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Creates a scheduled session at `request.date` + `request.time`.
    pub fn schedule_session(
        &self,
        request: &ScheduleSessionRequest,
    ) -> SessionServiceResult<Session> {
        let mut session = Session::new(
            request.client_id,
            request.date.and_time(request.time),
            request.duration_minutes,
            request.location.trim(),
        );
        session.program_id = request
            .program_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        self.repo.create_session(&session)?;
        info!(
            "event=session_schedule module=service status=ok duration_minutes={}",
            session.duration_minutes
        );
        Ok(session)
    }

    pub fn get_session(&self, id: SessionId) -> SessionServiceResult<Session> {
        self.repo
            .get_session(id)?
            .ok_or(SessionServiceError::SessionNotFound(id))
    }

    /// Transitions a session to `status` and returns the stored result.
    pub fn set_status(
        &self,
        id: SessionId,
        status: SessionStatus,
    ) -> SessionServiceResult<Session> {
        let mut session = self.get_session(id)?;
        session.status = status;
        self.repo.update_session(&session)?;
        info!(
            "event=session_status module=service status=ok new_status={}",
            status.as_str()
        );
        Ok(session)
    }

    /// Moves a session to a new start, optionally changing its length.
    pub fn reschedule(
        &self,
        id: SessionId,
        date_time: NaiveDateTime,
        duration_minutes: Option<u32>,
    ) -> SessionServiceResult<Session> {
        let mut session = self.get_session(id)?;
        session.date_time = date_time;
        if let Some(duration) = duration_minutes {
            session.duration_minutes = duration;
        }
        self.repo.update_session(&session)?;
        Ok(session)
    }

    pub fn delete_session(&self, id: SessionId) -> SessionServiceResult<()> {
        self.repo.delete_session(id)?;
        Ok(())
    }

    pub fn list_sessions(&self, query: &SessionListQuery) -> SessionServiceResult<Vec<Session>> {
        Ok(self.repo.list_sessions(query)?)
    }

    /// Scheduled sessions at or after now, soonest first.
    pub fn upcoming_sessions(
        &self,
        client_id: Option<ClientId>,
    ) -> SessionServiceResult<Vec<Session>> {
        let now = self.clock.now();
        let query = SessionListQuery {
            client_id,
            status: Some(SessionStatus::Scheduled),
            ..SessionListQuery::default()
        };
        let mut sessions: Vec<Session> = self
            .repo
            .list_sessions(&query)?
            .into_iter()
            .filter(|session| !is_past(session.date_time, now))
            .collect();
        sort_ascending(&mut sessions);
        Ok(sessions)
    }

    /// Sessions strictly before now in any status, most recent first.
    pub fn past_sessions(&self, client_id: Option<ClientId>) -> SessionServiceResult<Vec<Session>> {
        let now = self.clock.now();
        let query = SessionListQuery {
            client_id,
            ..SessionListQuery::default()
        };
        let mut sessions: Vec<Session> = self
            .repo
            .list_sessions(&query)?
            .into_iter()
            .filter(|session| is_past(session.date_time, now))
            .collect();
        sort_descending(&mut sessions);
        Ok(sessions)
    }

    pub fn today_sessions(&self) -> SessionServiceResult<Vec<Session>> {
        let today = self.clock.now().date();
        self.sessions_in(DateRange::new(start_of_day(today), end_of_day(today)))
    }

    /// Sessions in the calendar week (Sunday..Saturday) containing now.
    pub fn this_week_sessions(&self) -> SessionServiceResult<Vec<Session>> {
        let now = self.clock.now();
        let mut sessions: Vec<Session> = self
            .repo
            .list_sessions(&SessionListQuery::default())?
            .into_iter()
            .filter(|session| is_this_week(session.date_time, now))
            .collect();
        sort_ascending(&mut sessions);
        Ok(sessions)
    }

    pub fn this_month_sessions(&self) -> SessionServiceResult<Vec<Session>> {
        let now = self.clock.now();
        self.sessions_in(DateRange::new(month_start(now), month_end(now)))
    }

    pub fn next_session_for_client(
        &self,
        client_id: ClientId,
    ) -> SessionServiceResult<Option<Session>> {
        Ok(self.upcoming_sessions(Some(client_id))?.into_iter().next())
    }

    pub fn last_session_for_client(
        &self,
        client_id: ClientId,
    ) -> SessionServiceResult<Option<Session>> {
        Ok(self.past_sessions(Some(client_id))?.into_iter().next())
    }

    /// Applies a rolling date filter anchored at the clock's current day.
    pub fn filter_by_date_range(
        &self,
        sessions: &[Session],
        filter: DateRangeFilter,
    ) -> Vec<Session> {
        filter_by_date_range(sessions, filter, self.clock.now())
    }

    fn sessions_in(&self, range: DateRange) -> SessionServiceResult<Vec<Session>> {
        let mut sessions = self.repo.list_sessions(&SessionListQuery::in_range(range))?;
        sort_ascending(&mut sessions);
        Ok(sessions)
    }
}

/// Keeps sessions with `status`; `None` keeps everything.
pub fn filter_by_status(sessions: &[Session], status: Option<SessionStatus>) -> Vec<Session> {
    sessions
        .iter()
        .filter(|session| status.map_or(true, |wanted| session.status == wanted))
        .cloned()
        .collect()
}

/// Keeps sessions inside the rolling window `filter` describes.
pub fn filter_by_date_range(
    sessions: &[Session],
    filter: DateRangeFilter,
    now: NaiveDateTime,
) -> Vec<Session> {
    let today = start_of_day(now.date());
    let end = match filter {
        DateRangeFilter::All => return sessions.to_vec(),
        DateRangeFilter::Today => today + Duration::days(1),
        DateRangeFilter::Week => today + Duration::days(7),
        DateRangeFilter::Month => today.checked_add_months(Months::new(1)).unwrap_or(today),
    };
    sessions
        .iter()
        .filter(|session| today <= session.date_time && session.date_time < end)
        .cloned()
        .collect()
}

fn sort_ascending(sessions: &mut [Session]) {
    sessions.sort_by(|a, b| a.date_time.cmp(&b.date_time).then_with(|| a.id.cmp(&b.id)));
}

fn sort_descending(sessions: &mut [Session]) {
    sessions.sort_by(|a, b| b.date_time.cmp(&a.date_time).then_with(|| a.id.cmp(&b.id)));
}
